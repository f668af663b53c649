use std::sync::Arc;

use relay_store::{RequestStore, StoreError};
use tonic::{Request, Response, Status};

use crate::generated::meta_transaction_service_server::MetaTransactionService;
use crate::generated::CleanStuckMetaTransactionsResponse;

/// The admin gRPC surface: one escape-hatch RPC, backed directly by the
/// store's `delete_oldest`.
pub struct AdminService {
    store: Arc<dyn RequestStore>,
}

impl AdminService {
    pub fn new(store: Arc<dyn RequestStore>) -> Self {
        Self { store }
    }
}

#[tonic::async_trait]
impl MetaTransactionService for AdminService {
    #[tracing::instrument(skip(self, _request))]
    async fn clean_stuck_meta_transactions(
        &self,
        _request: Request<()>,
    ) -> Result<Response<CleanStuckMetaTransactionsResponse>, Status> {
        let deleted = self.store.delete_oldest().await.map_err(|error| match error {
            StoreError::Empty => Status::not_found(error.to_string()),
            other => Status::internal(other.to_string()),
        })?;

        tracing::warn!(request_id = %deleted.id, "deleted stuck meta-transaction request via admin rpc");
        Ok(Response::new(CleanStuckMetaTransactionsResponse { id: deleted.id }))
    }
}
