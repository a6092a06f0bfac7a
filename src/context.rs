use crate::{
    progress::{ProgressChannel, ProgressUpdate},
    runner::{RunControl, WorkerMessage},
};
use std::sync::{mpsc::Sender, Arc};

pub struct TaskContext {
    updates: Sender<WorkerMessage>,
    control: Arc<RunControl>,
}

impl TaskContext {
    pub(crate) fn new(updates: Sender<WorkerMessage>, control: Arc<RunControl>) -> Self {
        Self { updates, control }
    }

    pub fn report_overall(&self, percent: i32) {
        self.report(ProgressChannel::Overall, percent);
    }

    pub fn report_item(&self, percent: i32) {
        self.report(ProgressChannel::Item, percent);
    }

    pub fn step_overall(&self) {
        self.send(ProgressUpdate::Step {
            channel: ProgressChannel::Overall,
        });
    }

    pub fn step_item(&self) {
        self.send(ProgressUpdate::Step {
            channel: ProgressChannel::Item,
        });
    }

    pub fn set_overall_message(&self, text: impl Into<String>) {
        self.send(ProgressUpdate::Message {
            channel: ProgressChannel::Overall,
            text: text.into(),
        });
    }

    pub fn set_item_message(&self, text: impl Into<String>) {
        self.send(ProgressUpdate::Message {
            channel: ProgressChannel::Item,
            text: text.into(),
        });
    }

    pub fn set_overall_range(&self, min: i32, max: i32) {
        self.send(ProgressUpdate::Range {
            channel: ProgressChannel::Overall,
            min,
            max,
        });
    }

    pub fn set_item_range(&self, min: i32, max: i32) {
        self.send(ProgressUpdate::Range {
            channel: ProgressChannel::Item,
            min,
            max,
        });
    }

    pub fn set_overall_step(&self, step: i32) {
        self.send(ProgressUpdate::StepSize {
            channel: ProgressChannel::Overall,
            step,
        });
    }

    pub fn set_item_step(&self, step: i32) {
        self.send(ProgressUpdate::StepSize {
            channel: ProgressChannel::Item,
            step,
        });
    }

    pub fn set_marquee(&self, enabled: bool) {
        self.send(ProgressUpdate::Marquee { enabled });
    }

    pub fn show_item_progress(&self, visible: bool) {
        self.send(ProgressUpdate::ItemVisible { visible });
    }

    pub fn cancelled(&self) -> bool {
        if self.control.cancel_requested() {
            // Once observed, the run ends as cancelled no matter how much
            // more work the task decides to finish.
            self.control.acknowledge_cancel();
            return true;
        }
        false
    }

    fn report(&self, channel: ProgressChannel, percent: i32) {
        if percent < 0 {
            // Negative percentages are reserved and never reach the display;
            // step_overall/step_item carry step semantics.
            tracing::warn!(
                channel = channel.label(),
                percent,
                "dropping negative progress percentage"
            );
            return;
        }
        self.send(ProgressUpdate::Percent {
            channel,
            percent: percent.min(100),
        });
    }

    fn send(&self, update: ProgressUpdate) {
        let _ = self.updates.send(WorkerMessage::Progress(update));
    }
}
