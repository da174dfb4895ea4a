use std::net::IpAddr;
use std::sync::Arc;

use chrono::Utc;
use sentinel_fw_domain::{validate_comment, Comment, DomainError};
use tracing::instrument;

use crate::ports::StorePort;

pub struct AddCommentUseCase {
    store: Arc<dyn StorePort>,
}

impl AddCommentUseCase {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, addr: IpAddr, text: &str) -> Result<(), DomainError> {
        validate_comment(text).map_err(DomainError::InvalidArguments)?;
        let address_id = self.store.get_or_create_address_id(addr).await?;
        self.store
            .insert_comment(Comment {
                address_id,
                time: Utc::now(),
                text: text.to_string(),
            })
            .await
    }
}

pub struct ListCommentsUseCase {
    store: Arc<dyn StorePort>,
}

impl ListCommentsUseCase {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, addr: IpAddr) -> Result<Vec<Comment>, DomainError> {
        let address_id = self.store.get_or_create_address_id(addr).await?;
        self.store.list_comments(address_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn add_then_list_round_trips() {
        let store = Arc::new(MockStore::default());
        let add = AddCommentUseCase::new(store.clone());
        let list = ListCommentsUseCase::new(store.clone());
        add.execute(addr("10.0.0.1"), "known scanner").await.unwrap();
        let comments = list.execute(addr("10.0.0.1")).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "known scanner");
    }

    #[tokio::test]
    async fn empty_comment_is_rejected() {
        let use_case = AddCommentUseCase::new(Arc::new(MockStore::default()));
        let err = use_case.execute(addr("10.0.0.1"), "  ").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidArguments(_)));
    }
}
