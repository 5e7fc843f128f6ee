use crate::error::Result;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use tokio::sync::Mutex;

/// A value created asynchronously on first use and shared afterwards.
///
/// A failed creation is not cached; the next `get` tries again.
pub(crate) struct InitOnce<T, AsyncCreatorType: AsyncCreator<T>> {
    creating: Mutex<()>,
    value: OnceCell<T>,
    creator: AsyncCreatorType,
}

#[async_trait]
pub(crate) trait AsyncCreator<T>: Send + Sync {
    async fn create(&self) -> Result<T>;
}

impl<T, AsyncCreatorType: AsyncCreator<T>> InitOnce<T, AsyncCreatorType> {
    pub(crate) fn new(creator: AsyncCreatorType) -> Self {
        InitOnce {
            creating: Mutex::new(()),
            value: OnceCell::new(),
            creator,
        }
    }

    pub(crate) async fn get(&self) -> Result<&T> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        let _creating = self.creating.lock().await;
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        let value = self.creator.create().await?;
        Ok(self.value.get_or_init(|| value))
    }
}
