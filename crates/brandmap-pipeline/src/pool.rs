//! Fixed-width pool for generation calls.

use std::sync::Arc;

use async_trait::async_trait;
use brandmap_gemini::{BlockingTextGenerator, TextGenerator};
use tokio::sync::Semaphore;

use crate::error::StageError;

/// Bounds how many generation calls run at once, independent of how many
/// units a stage fans out.
///
/// Cloning shares the same permits.
#[derive(Clone)]
pub struct GenerationPool {
    generator: Arc<dyn TextGenerator>,
    permits: Arc<Semaphore>,
    width: usize,
}

impl GenerationPool {
    /// Wraps a non-blocking generator. A `width` of zero is treated as one.
    pub fn new(generator: Arc<dyn TextGenerator>, width: usize) -> Self {
        let width = width.max(1);
        Self {
            generator,
            permits: Arc::new(Semaphore::new(width)),
            width,
        }
    }

    /// Wraps a generator whose calls block the thread. Each call runs on the
    /// blocking thread pool while holding one of `width` permits.
    pub fn blocking<B: BlockingTextGenerator>(generator: B, width: usize) -> Self {
        Self::new(
            Arc::new(BlockingAdapter {
                inner: Arc::new(generator),
            }),
            width,
        )
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Runs one prompt once a permit is free.
    ///
    /// Empty text is a successful answer.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::Failed`] only if the pool has been closed.
    pub async fn complete(&self, prompt: &str) -> Result<String, StageError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| StageError::failed(format!("generation pool closed: {e}")))?;
        Ok(self.generator.complete(prompt).await)
    }
}

impl std::fmt::Debug for GenerationPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationPool")
            .field("width", &self.width)
            .field("available", &self.permits.available_permits())
            .finish_non_exhaustive()
    }
}

struct BlockingAdapter<B> {
    inner: Arc<B>,
}

#[async_trait]
impl<B: BlockingTextGenerator> TextGenerator for BlockingAdapter<B> {
    async fn complete(&self, prompt: &str) -> String {
        let inner = Arc::clone(&self.inner);
        let prompt = prompt.to_owned();
        match tokio::task::spawn_blocking(move || inner.complete_blocking(&prompt)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "blocking generation call did not complete");
                String::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod tests;
