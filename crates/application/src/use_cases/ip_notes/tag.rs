use std::net::IpAddr;
use std::sync::Arc;

use sentinel_fw_domain::{validate_tag, DomainError, Tag};
use tracing::instrument;

use crate::ports::StorePort;

pub struct AddTagUseCase {
    store: Arc<dyn StorePort>,
}

impl AddTagUseCase {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, addr: IpAddr, value: &str) -> Result<(), DomainError> {
        validate_tag(value).map_err(DomainError::InvalidArguments)?;
        let address_id = self.store.get_or_create_address_id(addr).await?;
        self.store
            .insert_tag(Tag {
                address_id,
                value: value.to_string(),
            })
            .await
    }
}

pub struct RemoveTagUseCase {
    store: Arc<dyn StorePort>,
}

impl RemoveTagUseCase {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, addr: IpAddr, value: &str) -> Result<(), DomainError> {
        let address_id = self.store.get_or_create_address_id(addr).await?;
        self.store.delete_tag(address_id, value).await
    }
}

pub struct ListTagsUseCase {
    store: Arc<dyn StorePort>,
}

impl ListTagsUseCase {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, addr: IpAddr) -> Result<Vec<Tag>, DomainError> {
        let address_id = self.store.get_or_create_address_id(addr).await?;
        self.store.list_tags(address_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn empty_tag_is_rejected() {
        let use_case = AddTagUseCase::new(Arc::new(MockStore::default()));
        let err = use_case.execute(addr("10.0.0.1"), "  ").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn add_list_remove_round_trips() {
        let store = Arc::new(MockStore::default());
        let add = AddTagUseCase::new(store.clone());
        let list = ListTagsUseCase::new(store.clone());
        let remove = RemoveTagUseCase::new(store.clone());
        add.execute(addr("10.0.0.1"), "bruteforce").await.unwrap();
        assert_eq!(list.execute(addr("10.0.0.1")).await.unwrap().len(), 1);
        remove
            .execute(addr("10.0.0.1"), "bruteforce")
            .await
            .unwrap();
        assert!(list.execute(addr("10.0.0.1")).await.unwrap().is_empty());
    }
}
