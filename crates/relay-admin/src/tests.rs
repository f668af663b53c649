use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use chrono::Utc;
use relay_store::{RequestStore, StoreError};
use relay_types::{Block, NewRequest, Request};
use tonic::Request as GrpcRequest;

use crate::generated::meta_transaction_service_server::MetaTransactionService;
use super::*;

#[derive(Default)]
struct FakeStore {
    rows: Mutex<Vec<Request>>,
}

#[async_trait]
impl RequestStore for FakeStore {
    async fn insert_new(&self, new: NewRequest) -> Result<(), StoreError> {
        self.rows.lock().unwrap().push(Request {
            id: new.id,
            wallet_index: new.wallet_index,
            to: new.to,
            data: new.data,
            nonce: None,
            gas_price: None,
            hash: None,
            submitted_block: None,
            boosted_block: None,
            mined_block: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        Ok(())
    }

    async fn active_request(&self, _wallet_index: u32) -> Result<Option<Request>, StoreError> {
        unimplemented!("not exercised by the admin rpc")
    }

    async fn next_queued_request(&self, _wallet_index: u32) -> Result<Option<Request>, StoreError> {
        unimplemented!("not exercised by the admin rpc")
    }

    async fn mark_submitted(
        &self,
        _id: &str,
        _nonce: u64,
        _gas_price: U256,
        _hash: B256,
        _submitted_block: Block,
    ) -> Result<(), StoreError> {
        unimplemented!("not exercised by the admin rpc")
    }

    async fn mark_boosted(&self, _id: &str, _gas_price: U256, _hash: B256, _boosted_block: Block) -> Result<(), StoreError> {
        unimplemented!("not exercised by the admin rpc")
    }

    async fn mark_mined(&self, _id: &str, _mined_block: Block, _hash: B256) -> Result<(), StoreError> {
        unimplemented!("not exercised by the admin rpc")
    }

    async fn clear_mined(&self, _id: &str) -> Result<(), StoreError> {
        unimplemented!("not exercised by the admin rpc")
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        unimplemented!("not exercised by the admin rpc")
    }

    async fn delete_oldest(&self) -> Result<Request, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.is_empty() {
            return Err(StoreError::Empty);
        }
        let oldest_index = rows
            .iter()
            .enumerate()
            .min_by_key(|(_, r)| r.created_at)
            .map(|(i, _)| i)
            .unwrap();
        Ok(rows.remove(oldest_index))
    }
}

fn request(id: &str) -> NewRequest {
    NewRequest { id: id.into(), wallet_index: 0, to: Address::ZERO, data: Bytes::new() }
}

#[tokio::test]
async fn deletes_and_returns_the_oldest_row() {
    let store = Arc::new(FakeStore::default());
    store.insert_new(request("r1")).await.unwrap();
    store.insert_new(request("r2")).await.unwrap();

    let service = AdminService::new(store.clone() as Arc<dyn RequestStore>);
    let response = service.clean_stuck_meta_transactions(GrpcRequest::new(())).await.unwrap();
    assert_eq!(response.into_inner().id, "r1");
    assert_eq!(store.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_store_surfaces_as_a_not_found_status() {
    let store = Arc::new(FakeStore::default());
    let service = AdminService::new(store as Arc<dyn RequestStore>);
    let error = service.clean_stuck_meta_transactions(GrpcRequest::new(())).await.unwrap_err();
    assert_eq!(error.code(), tonic::Code::NotFound);
}
