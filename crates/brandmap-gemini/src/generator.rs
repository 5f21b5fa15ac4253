use async_trait::async_trait;

/// Prompt-in, text-out generation.
///
/// Implementations swallow their own failures and return an empty string.
/// Callers treat empty text as a successful, empty answer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> String;
}

/// A generator backed by a call that blocks the current thread, such as a
/// synchronous vendor SDK. Same empty-on-failure contract as
/// [`TextGenerator`].
///
/// Must never be called directly from async code; run it on a worker thread.
pub trait BlockingTextGenerator: Send + Sync + 'static {
    fn complete_blocking(&self, prompt: &str) -> String;
}
