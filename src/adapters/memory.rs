use crate::domain::model::{MeetingEvent, User};
use crate::domain::ports::{Criteria, Entity, MeetingEventRepository, Repository, UserRepository};
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// 以 `Vec` 保存資料的 repository，保留插入順序
#[derive(Debug)]
pub struct InMemoryRepository<T: Entity> {
    items: RwLock<Vec<T>>,
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn find_all(&self) -> Result<Vec<T>> {
        Ok(self.items.read().await.clone())
    }

    async fn find_by(&self, criteria: &Criteria) -> Result<Option<T>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| criteria.matches(*item)).cloned())
    }

    async fn save(&self, entity: T) -> Result<()> {
        let mut items = self.items.write().await;
        let id = entity.id();
        match items.iter_mut().find(|item| item.id() == id) {
            Some(existing) => *existing = entity,
            None => items.push(entity),
        }
        Ok(())
    }

    async fn delete(&self, entity: &T) -> Result<bool> {
        let mut items = self.items.write().await;
        let id = entity.id();
        let before = items.len();
        items.retain(|item| item.id() != id);
        Ok(items.len() != before)
    }
}

macro_rules! delegate_repository {
    ($name:ident, $entity:ty) => {
        #[derive(Debug, Default)]
        pub struct $name {
            inner: InMemoryRepository<$entity>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn with_items(items: Vec<$entity>) -> Self {
                Self {
                    inner: InMemoryRepository::with_items(items),
                }
            }
        }

        #[async_trait]
        impl Repository<$entity> for $name {
            async fn find_all(&self) -> Result<Vec<$entity>> {
                self.inner.find_all().await
            }

            async fn find_by(&self, criteria: &Criteria) -> Result<Option<$entity>> {
                self.inner.find_by(criteria).await
            }

            async fn save(&self, entity: $entity) -> Result<()> {
                self.inner.save(entity).await
            }

            async fn delete(&self, entity: &$entity) -> Result<bool> {
                self.inner.delete(entity).await
            }
        }
    };
}

delegate_repository!(InMemoryUserRepository, User);
delegate_repository!(InMemoryMeetingEventRepository, MeetingEvent);

impl UserRepository for InMemoryUserRepository {}

impl MeetingEventRepository for InMemoryMeetingEventRepository {}
