use std::time::Duration;

use thiserror::Error;

/// Why a single unit of work produced no value.
///
/// Never crosses a stage boundary as control flow: the join combinators turn
/// it into [`TaskResult::Error`](crate::TaskResult::Error) for that unit only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("{0}")]
    Failed(String),

    #[error("task panicked: {0}")]
    Panicked(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

impl StageError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Errors constructing the production collaborators from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("cultural insights client: {0}")]
    Qloo(#[from] brandmap_qloo::QlooError),

    #[error("generation client: {0}")]
    Gemini(#[from] brandmap_gemini::GeminiError),
}
