use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("run has not finished")]
    NotFinished,
    #[error("worker is still running")]
    StillRunning,
    #[error("runner was already torn down")]
    AlreadyTornDown,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("task failed: {0}")]
    Task(anyhow::Error),
    #[error(transparent)]
    Usage(#[from] UsageError),
}
