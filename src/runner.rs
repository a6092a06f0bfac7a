use crate::{
    context::TaskContext,
    error::{RunnerError, UsageError},
    progress::{ProgressBar, ProgressDisplay, ProgressUpdate},
    task::{RunOutcome, RunStatus, Task},
};
use anyhow::anyhow;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender, TryRecvError},
        Arc,
    },
    thread::{self, JoinHandle},
};

#[derive(Debug, Default)]
pub(crate) struct RunControl {
    cancel_requested: AtomicBool,
    cancel_acknowledged: AtomicBool,
}

impl RunControl {
    pub(crate) fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);
    }

    pub(crate) fn cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }

    pub(crate) fn acknowledge_cancel(&self) {
        self.cancel_acknowledged.store(true, Ordering::Release);
    }

    pub(crate) fn cancel_acknowledged(&self) -> bool {
        self.cancel_acknowledged.load(Ordering::Acquire)
    }
}

pub(crate) enum WorkerMessage {
    Progress(ProgressUpdate),
    Finished(RunOutcome),
}

pub struct TaskRunner {
    task: Option<Task>,
    state: RunStatus,
    outcome: Option<RunOutcome>,
    cancelling: bool,
    torn_down: bool,
    display: ProgressDisplay,
    control: Arc<RunControl>,
    updates_tx: Option<Sender<WorkerMessage>>,
    updates_rx: Receiver<WorkerMessage>,
    worker: Option<JoinHandle<()>>,
}

impl TaskRunner {
    pub fn new(task: Task) -> Self {
        let (updates_tx, updates_rx) = mpsc::channel();
        Self {
            task: Some(task),
            state: RunStatus::Idle,
            outcome: None,
            cancelling: false,
            torn_down: false,
            display: ProgressDisplay::default(),
            control: Arc::new(RunControl::default()),
            updates_tx: Some(updates_tx),
            updates_rx,
            worker: None,
        }
    }

    pub fn activate(&mut self) {
        if self.state != RunStatus::Idle {
            return;
        }
        let Some(task) = self.task.take() else {
            return;
        };
        let Some(tx) = self.updates_tx.take() else {
            return;
        };
        self.state = RunStatus::Running;
        let control = Arc::clone(&self.control);
        tracing::debug!("worker started");
        self.worker = Some(thread::spawn(move || {
            let ctx = TaskContext::new(tx.clone(), Arc::clone(&control));
            let outcome = match task.run(&ctx) {
                Ok(()) if control.cancel_acknowledged() => RunOutcome::Cancelled,
                Ok(()) => RunOutcome::Completed,
                Err(err) => RunOutcome::Failed(err),
            };
            let _ = tx.send(WorkerMessage::Finished(outcome));
        }));
    }

    pub fn request_cancel(&mut self) {
        if self.cancelling || self.state.is_terminal() {
            return;
        }
        self.cancelling = true;
        self.control.request_cancel();
        tracing::debug!("cancellation requested");
    }

    pub fn is_cancelling(&self) -> bool {
        self.cancelling
    }

    pub fn state(&self) -> RunStatus {
        self.state
    }

    pub fn display(&self) -> &ProgressDisplay {
        &self.display
    }

    pub fn overall(&self) -> &ProgressBar {
        self.display.overall()
    }

    pub fn item(&self) -> &ProgressBar {
        self.display.item()
    }

    pub fn poll(&mut self) -> RunStatus {
        loop {
            match self.updates_rx.try_recv() {
                Ok(message) => self.handle_worker_message(message),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.handle_disconnect();
                    break;
                }
            }
        }
        self.state
    }

    pub fn wait(&mut self) -> RunStatus {
        while self.state == RunStatus::Running {
            match self.updates_rx.recv() {
                Ok(message) => self.handle_worker_message(message),
                Err(_) => {
                    self.handle_disconnect();
                    break;
                }
            }
        }
        self.state
    }

    pub fn outcome(&self) -> Result<&RunOutcome, UsageError> {
        if self.torn_down {
            return Err(UsageError::AlreadyTornDown);
        }
        self.outcome.as_ref().ok_or(UsageError::NotFinished)
    }

    pub fn teardown(&mut self) -> Result<(), RunnerError> {
        if self.torn_down {
            return Err(RunnerError::Usage(UsageError::AlreadyTornDown));
        }
        if self.state == RunStatus::Running {
            self.poll();
        }
        if self.state == RunStatus::Running {
            // The close attempt is vetoed; the run keeps going untouched.
            return Err(RunnerError::Usage(UsageError::StillRunning));
        }
        self.torn_down = true;
        match self.outcome.take() {
            Some(RunOutcome::Failed(err)) => Err(RunnerError::Task(err)),
            _ => Ok(()),
        }
    }

    fn handle_worker_message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::Progress(update) => self.display.apply(&update),
            WorkerMessage::Finished(outcome) => self.finish(outcome),
        }
    }

    fn handle_disconnect(&mut self) {
        // A worker that went away without a terminal message died mid-task.
        if self.state == RunStatus::Running {
            self.finish(RunOutcome::Failed(anyhow!(
                "worker thread exited without reporting an outcome"
            )));
        }
    }

    fn finish(&mut self, outcome: RunOutcome) {
        if self.state.is_terminal() {
            return;
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        self.state = outcome.status();
        tracing::debug!(status = ?self.state, "worker finished");
        self.outcome = Some(outcome);
    }
}

impl Drop for TaskRunner {
    fn drop(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(RunOutcome::Failed(err)) = &self.outcome {
            tracing::warn!(error = %err, "runner dropped with unreported task failure");
        }
    }
}
