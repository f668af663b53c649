//! Boots every long-running subsystem and wires them to a shared
//! cancellation token, per `§4.11`.

use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use prometheus::Registry;
use relay_admin::{AdminService, GrpcMetricsLayer, MetaTransactionServiceServer};
use relay_chain::{AlloyChainClient, ChainClient};
use relay_kafka::{IngestConsumer, KafkaStatusSink, StatusSink};
use relay_signer::{KmsSigner, LocalSigner, RemoteSigner};
use relay_store::{PostgresRequestStore, RequestStore};
use relay_worker::{TickerWorker, WorkerConfig, WorkerMetrics};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::{ConfigError, Settings, SignerMode};
use crate::sig_down::SigDown;

#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Store(#[from] relay_store::StoreError),
    #[error("signer error: {0}")]
    Signer(#[from] relay_signer::SignerError),
    #[error("kafka sink error: {0}")]
    Sink(#[from] relay_kafka::SinkError),
    #[error("kafka ingest error: {0}")]
    Ingest(#[from] relay_kafka::IngestError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("grpc transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

/// Runs the daemon until a shutdown signal, returning once every spawned
/// task has finished its in-flight unit of work.
pub async fn run(settings: Settings) -> Result<(), SupervisorError> {
    settings.validate()?;

    let sig_down = SigDown::try_new()?;
    let cancellation = sig_down.cancellation_token();
    let tasks = TaskTracker::new();

    let store: Arc<dyn RequestStore> = Arc::new(PostgresRequestStore::connect(&settings.database_url).await?);
    let chain: Arc<dyn ChainClient> =
        Arc::new(AlloyChainClient::new(settings.ethereum_rpc_url.clone(), settings.ethereum_chain_id));
    let sink: Arc<dyn StatusSink> =
        Arc::new(KafkaStatusSink::new(&settings.kafka_bootstrap_servers, settings.transaction_status_topic.clone())?);

    let signers = build_signers(&settings).await?;
    let registry = Arc::new(Registry::new());
    let worker_metrics = WorkerMetrics::register(&registry);

    for (wallet_index, signer) in signers.into_iter().enumerate() {
        let worker = TickerWorker::new(
            WorkerConfig {
                wallet_index: wallet_index as u32,
                chain_id: settings.ethereum_chain_id,
                block_time: settings.block_time(),
                confirmation_blocks: settings.confirmation_blocks,
                boost_after_blocks: settings.boost_after_blocks,
                disable_boosting: settings.disable_boosting,
            },
            store.clone(),
            chain.clone(),
            signer,
            sink.clone(),
            worker_metrics.clone(),
        );
        let cancellation = cancellation.clone();
        tasks.spawn(async move { worker.run(cancellation).await });
    }

    let wallet_count = settings.wallet_count()?;
    let ingest = IngestConsumer::new(
        &settings.kafka_bootstrap_servers,
        "meta-transaction-processor",
        &settings.transaction_request_topic,
        store.clone(),
        wallet_count as u32,
    )?;
    let ingest_cancellation = cancellation.clone();
    tasks.spawn(async move {
        if let Err(error) = ingest.run(ingest_cancellation).await {
            tracing::error!(%error, "ingest consumer exited with an error");
        }
    });

    let admin_metrics = relay_admin::AdminMetrics::register(&registry);
    let admin_addr = format!("0.0.0.0:{}", settings.admin_rpc_port).parse().expect("valid socket address");
    let admin_service = AdminService::new(store.clone());
    let admin_cancellation = cancellation.clone();
    tasks.spawn(async move {
        let result = tonic::transport::Server::builder()
            .layer(GrpcMetricsLayer::new(admin_metrics))
            .add_service(MetaTransactionServiceServer::new(admin_service))
            .serve_with_shutdown(admin_addr, admin_cancellation.cancelled())
            .await;
        if let Err(error) = result {
            tracing::error!(%error, "admin rpc server exited with an error");
        }
    });

    let monitoring_addr = format!("0.0.0.0:{}", settings.monitoring_port);
    let monitoring_cancellation = cancellation.clone();
    let monitoring_registry = registry.clone();
    tasks.spawn(async move {
        let listener = match tokio::net::TcpListener::bind(&monitoring_addr).await {
            Ok(listener) => listener,
            Err(error) => {
                tracing::error!(%error, addr = %monitoring_addr, "failed to bind monitoring listener");
                return;
            }
        };
        let router = crate::monitoring::router(monitoring_registry);
        let shutdown = async move { monitoring_cancellation.cancelled().await };
        if let Err(error) = axum::serve(listener, router).with_graceful_shutdown(shutdown).await {
            tracing::error!(%error, "monitoring server exited with an error");
        }
    });

    tasks.close();
    tasks.wait().await;
    Ok(())
}

async fn build_signers(settings: &Settings) -> Result<Vec<Arc<dyn RemoteSigner>>, SupervisorError> {
    match settings.signer_mode()? {
        SignerMode::PrivateKeys(keys) => keys
            .iter()
            .map(|key| LocalSigner::from_hex(key).map(|s| Arc::new(s) as Arc<dyn RemoteSigner>).map_err(Into::into))
            .collect(),
        SignerMode::Kms { key_ids, region, endpoint } => {
            let region_provider =
                RegionProviderChain::first_try(region.map(aws_config::Region::new)).or_default_provider();
            let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
            if let Some(endpoint) = endpoint {
                loader = loader.endpoint_url(endpoint);
            }
            let sdk_config = loader.load().await;
            let client = aws_sdk_kms::Client::new(&sdk_config);

            let mut signers = Vec::with_capacity(key_ids.len());
            for key_id in key_ids {
                let signer = KmsSigner::new(client.clone(), key_id).await?;
                signers.push(Arc::new(signer) as Arc<dyn RemoteSigner>);
            }
            Ok(signers)
        }
    }
}
