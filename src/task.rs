use crate::context::TaskContext;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;

pub type TaskArg = Box<dyn Any + Send>;

type PlainWork = Box<dyn FnOnce(&TaskContext) -> Result<()> + Send>;
type ArgWork = Box<dyn FnOnce(&TaskContext, TaskArg) -> Result<()> + Send>;

pub enum Task {
    Plain(PlainWork),
    WithArg { work: ArgWork, arg: TaskArg },
}

impl Task {
    pub fn plain<F>(work: F) -> Self
    where
        F: FnOnce(&TaskContext) -> Result<()> + Send + 'static,
    {
        Task::Plain(Box::new(work))
    }

    pub fn with_arg<F, A>(work: F, arg: A) -> Self
    where
        F: FnOnce(&TaskContext, TaskArg) -> Result<()> + Send + 'static,
        A: Any + Send,
    {
        Task::WithArg {
            work: Box::new(work),
            arg: Box::new(arg),
        }
    }

    pub(crate) fn run(self, ctx: &TaskContext) -> Result<()> {
        match self {
            Task::Plain(work) => work(ctx),
            Task::WithArg { work, arg } => work(ctx, arg),
        }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed,
    Cancelled,
    Failed(anyhow::Error),
}

impl RunOutcome {
    pub fn status(&self) -> RunStatus {
        match self {
            RunOutcome::Completed => RunStatus::Completed,
            RunOutcome::Cancelled => RunStatus::Cancelled,
            RunOutcome::Failed(_) => RunStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Cancelled | RunStatus::Failed
        )
    }

    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunControl;
    use anyhow::anyhow;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc,
    };

    #[test]
    fn test_status_terminal_classification() {
        assert!(!RunStatus::Idle.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Cancelled.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Running.is_active());
        assert!(!RunStatus::Failed.is_active());
    }

    #[test]
    fn test_outcome_status_mapping() {
        assert_eq!(RunOutcome::Completed.status(), RunStatus::Completed);
        assert_eq!(RunOutcome::Cancelled.status(), RunStatus::Cancelled);
        assert_eq!(
            RunOutcome::Failed(anyhow!("broken")).status(),
            RunStatus::Failed
        );
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let value = serde_json::to_value(RunStatus::Running).unwrap();
        assert_eq!(value, serde_json::json!("running"));
        let back: RunStatus = serde_json::from_value(value).unwrap();
        assert_eq!(back, RunStatus::Running);
    }

    #[test]
    fn test_with_arg_passes_bound_argument() {
        let (tx, _rx) = mpsc::channel();
        let ctx = TaskContext::new(tx, Arc::new(RunControl::default()));
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&seen);
        let task = Task::with_arg(
            move |_ctx, arg| {
                let value = *arg.downcast::<usize>().expect("usize argument");
                sink.store(value, Ordering::SeqCst);
                Ok(())
            },
            42usize,
        );
        task.run(&ctx).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }
}
