//! Configuration for the meta-transaction relay.
//!
//! A single typed [`Settings`] loaded from environment variables (with an
//! optional `.env` file pre-loaded via `dotenvy`), validated once at
//! startup. An invalid or incomplete configuration is a fatal startup
//! error, never a per-tick one.

use std::time::Duration;

use clap::{Parser, Subcommand};
use url::Url;

/// Top-level CLI: a daemon by default, or one of a few operational
/// subcommands that exit after running.
#[derive(Parser, Debug)]
#[command(name = "meta-transaction-processor")]
#[command(about = "Relays meta-transaction requests to an EVM chain via relayer wallets")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub settings: Settings,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Applies or rolls back request-store schema migrations.
    Migrate {
        #[command(subcommand)]
        direction: MigrateDirection,
    },
    /// Derives and prints the address behind a KMS key id, without booting the daemon.
    PrintKmsAddress {
        key_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MigrateDirection {
    Up,
    Down,
    UpTo { version: i64 },
    DownTo { version: i64 },
}

/// Which variant of [`relay_signer::RemoteSigner`] the daemon constructs.
#[derive(Debug, Clone)]
pub enum SignerMode {
    /// `SENDER_PRIVATE_KEYS`: one hex-encoded key per wallet, development only.
    PrivateKeys(Vec<String>),
    /// `KMS_KEY_IDS`: one AWS KMS key id per wallet.
    Kms { key_ids: Vec<String>, region: Option<String>, endpoint: Option<String> },
}

/// The full environment-driven settings surface (`§6` of the design).
#[derive(Parser, Debug, Clone)]
pub struct Settings {
    /// Tick interval, in seconds — should match the chain's average block time.
    #[arg(long, env = "BLOCK_TIME", default_value = "12")]
    pub block_time_seconds: u64,

    /// Confirmation depth: blocks after inclusion before a row is Confirmed.
    #[arg(long, env = "CONFIRMATION_BLOCKS", default_value = "12")]
    pub confirmation_blocks: u64,

    /// Blocks to wait with no receipt before boosting a stuck transaction.
    #[arg(long, env = "BOOST_AFTER_BLOCKS", default_value = "5")]
    pub boost_after_blocks: u64,

    /// Disables the boost broadcast; the worker still logs boost intent.
    #[arg(long, env = "DISABLE_BOOSTING", default_value = "false")]
    pub disable_boosting: bool,

    #[arg(long, env = "ETHEREUM_RPC_URL")]
    pub ethereum_rpc_url: Url,

    #[arg(long, env = "ETHEREUM_CHAIN_ID")]
    pub ethereum_chain_id: u64,

    #[arg(long, env = "PRIVATE_KEY_MODE", default_value = "false")]
    pub private_key_mode: bool,

    /// CSV, one key per wallet. Required when `PRIVATE_KEY_MODE=true`.
    #[arg(long, env = "SENDER_PRIVATE_KEYS")]
    pub sender_private_keys: Option<String>,

    /// CSV, one KMS key id per wallet. Required when `PRIVATE_KEY_MODE=false`.
    #[arg(long, env = "KMS_KEY_IDS")]
    pub kms_key_ids: Option<String>,

    #[arg(long, env = "AWS_REGION")]
    pub aws_region: Option<String>,

    /// Overrides the KMS endpoint, for local emulators (e.g. LocalStack).
    #[arg(long, env = "AWS_ENDPOINT")]
    pub aws_endpoint: Option<String>,

    /// CSV bootstrap list.
    #[arg(long, env = "KAFKA_BOOTSTRAP_SERVERS")]
    pub kafka_bootstrap_servers: String,

    #[arg(long, env = "TRANSACTION_REQUEST_TOPIC")]
    pub transaction_request_topic: String,

    #[arg(long, env = "TRANSACTION_STATUS_TOPIC")]
    pub transaction_status_topic: String,

    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "MONITORING_PORT", default_value = "8080")]
    pub monitoring_port: u16,

    #[arg(long, env = "ADMIN_RPC_PORT", default_value = "8081")]
    pub admin_rpc_port: u16,
}

impl Settings {
    pub fn block_time(&self) -> Duration {
        Duration::from_secs(self.block_time_seconds)
    }

    /// The number of relayer wallets, derived from whichever signer-mode
    /// CSV is populated. Both lists, if present, must agree in length.
    pub fn wallet_count(&self) -> Result<usize, ConfigError> {
        match self.signer_mode()? {
            SignerMode::PrivateKeys(keys) => Ok(keys.len()),
            SignerMode::Kms { key_ids, .. } => Ok(key_ids.len()),
        }
    }

    pub fn signer_mode(&self) -> Result<SignerMode, ConfigError> {
        if self.private_key_mode {
            let csv = self.sender_private_keys.as_deref().ok_or(ConfigError::MissingField("SENDER_PRIVATE_KEYS"))?;
            let keys: Vec<String> = csv.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
            if keys.is_empty() {
                return Err(ConfigError::MissingField("SENDER_PRIVATE_KEYS"));
            }
            Ok(SignerMode::PrivateKeys(keys))
        } else {
            let csv = self.kms_key_ids.as_deref().ok_or(ConfigError::MissingField("KMS_KEY_IDS"))?;
            let key_ids: Vec<String> = csv.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
            if key_ids.is_empty() {
                return Err(ConfigError::MissingField("KMS_KEY_IDS"));
            }
            Ok(SignerMode::Kms {
                key_ids,
                region: self.aws_region.clone(),
                endpoint: self.aws_endpoint.clone(),
            })
        }
    }

    pub fn kafka_bootstrap_servers(&self) -> &str {
        &self.kafka_bootstrap_servers
    }

    /// Validates cross-field constraints clap's per-field parsing can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.signer_mode()?;
        if self.confirmation_blocks == 0 {
            return Err(ConfigError::Invalid("CONFIRMATION_BLOCKS must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration field: {0}")]
    MissingField(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}
