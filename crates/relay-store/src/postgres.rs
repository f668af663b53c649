use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use relay_types::{Block, NewRequest, Request};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::StoreError;
use crate::numeric::{decimal_to_u256, decimal_to_u64, u256_to_decimal, u64_to_decimal};
use crate::store::RequestStore;

/// `sqlx`-backed [`RequestStore`] against a dedicated `meta_transaction_processor` schema.
pub struct PostgresRequestStore {
    pool: PgPool,
}

impl PostgresRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool against `database_url` with the crate's
    /// default pool sizing.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct Row {
    id: String,
    wallet_index: i32,
    to_address: Vec<u8>,
    data: Vec<u8>,
    nonce: Option<Decimal>,
    gas_price: Option<Decimal>,
    hash: Option<Vec<u8>>,
    submitted_block_number: Option<Decimal>,
    submitted_block_hash: Option<Vec<u8>>,
    boosted_block_number: Option<Decimal>,
    boosted_block_hash: Option<Vec<u8>>,
    mined_block_number: Option<Decimal>,
    mined_block_hash: Option<Vec<u8>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn block_of(number: Option<Decimal>, hash: Option<Vec<u8>>) -> Result<Option<Block>, StoreError> {
    match (number, hash) {
        (Some(number), Some(hash)) => {
            Ok(Some(Block::new(decimal_to_u256(number)?, B256::from_slice(&hash))))
        }
        _ => Ok(None),
    }
}

impl TryFrom<Row> for Request {
    type Error = StoreError;

    fn try_from(row: Row) -> Result<Self, Self::Error> {
        Ok(Request {
            id: row.id,
            wallet_index: row.wallet_index as u32,
            to: Address::from_slice(&row.to_address),
            data: Bytes::from(row.data),
            nonce: row.nonce.map(decimal_to_u64).transpose()?,
            gas_price: row.gas_price.map(decimal_to_u256).transpose()?,
            hash: row.hash.map(|h| B256::from_slice(&h)),
            submitted_block: block_of(row.submitted_block_number, row.submitted_block_hash)?,
            boosted_block: block_of(row.boosted_block_number, row.boosted_block_hash)?,
            mined_block: block_of(row.mined_block_number, row.mined_block_hash)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str = "id, wallet_index, to_address, data, nonce, gas_price, hash, \
     submitted_block_number, submitted_block_hash, boosted_block_number, boosted_block_hash, \
     mined_block_number, mined_block_hash, created_at, updated_at";

#[async_trait]
impl RequestStore for PostgresRequestStore {
    async fn insert_new(&self, request: NewRequest) -> Result<(), StoreError> {
        sqlx::query(
            "insert into meta_transaction_processor.meta_transaction_requests \
             (id, wallet_index, to_address, data) values ($1, $2, $3, $4) \
             on conflict (id) do nothing",
        )
        .bind(&request.id)
        .bind(request.wallet_index as i32)
        .bind(request.to.as_slice())
        .bind(request.data.as_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn active_request(&self, wallet_index: u32) -> Result<Option<Request>, StoreError> {
        let row: Option<Row> = sqlx::query_as(&format!(
            "select {COLUMNS} from meta_transaction_processor.meta_transaction_requests \
             where wallet_index = $1 and submitted_block_number is not null"
        ))
        .bind(wallet_index as i32)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Request::try_from).transpose()
    }

    async fn next_queued_request(&self, wallet_index: u32) -> Result<Option<Request>, StoreError> {
        let row: Option<Row> = sqlx::query_as(&format!(
            "select {COLUMNS} from meta_transaction_processor.meta_transaction_requests \
             where wallet_index = $1 and submitted_block_number is null \
             order by id asc limit 1"
        ))
        .bind(wallet_index as i32)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Request::try_from).transpose()
    }

    async fn mark_submitted(
        &self,
        id: &str,
        nonce: u64,
        gas_price: U256,
        hash: B256,
        submitted_block: Block,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "update meta_transaction_processor.meta_transaction_requests \
             set nonce = $2, gas_price = $3, hash = $4, \
                 submitted_block_number = $5, submitted_block_hash = $6, updated_at = now() \
             where id = $1",
        )
        .bind(id)
        .bind(u64_to_decimal(nonce))
        .bind(u256_to_decimal(gas_price)?)
        .bind(hash.as_slice())
        .bind(u256_to_decimal(submitted_block.number)?)
        .bind(submitted_block.hash.as_slice())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_boosted(
        &self,
        id: &str,
        gas_price: U256,
        hash: B256,
        boosted_block: Block,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "update meta_transaction_processor.meta_transaction_requests \
             set gas_price = $2, hash = $3, \
                 boosted_block_number = $4, boosted_block_hash = $5, updated_at = now() \
             where id = $1",
        )
        .bind(id)
        .bind(u256_to_decimal(gas_price)?)
        .bind(hash.as_slice())
        .bind(u256_to_decimal(boosted_block.number)?)
        .bind(boosted_block.hash.as_slice())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_mined(&self, id: &str, mined_block: Block, hash: B256) -> Result<(), StoreError> {
        sqlx::query(
            "update meta_transaction_processor.meta_transaction_requests \
             set mined_block_number = $2, mined_block_hash = $3, hash = $4, updated_at = now() \
             where id = $1",
        )
        .bind(id)
        .bind(u256_to_decimal(mined_block.number)?)
        .bind(mined_block.hash.as_slice())
        .bind(hash.as_slice())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear_mined(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query(
            "update meta_transaction_processor.meta_transaction_requests \
             set mined_block_number = null, mined_block_hash = null, updated_at = now() \
             where id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("delete from meta_transaction_processor.meta_transaction_requests where id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_oldest(&self) -> Result<Request, StoreError> {
        let row: Option<Row> = sqlx::query_as(&format!(
            "delete from meta_transaction_processor.meta_transaction_requests \
             where id = (select id from meta_transaction_processor.meta_transaction_requests \
                         order by created_at asc limit 1) \
             returning {COLUMNS}"
        ))
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::Empty).and_then(Request::try_from)
    }
}
