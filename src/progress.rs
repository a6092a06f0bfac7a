use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressChannel {
    Overall,
    Item,
}

impl ProgressChannel {
    pub fn label(self) -> &'static str {
        match self {
            ProgressChannel::Overall => "overall",
            ProgressChannel::Item => "item",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressUpdate {
    Percent {
        channel: ProgressChannel,
        percent: i32,
    },
    Step {
        channel: ProgressChannel,
    },
    Message {
        channel: ProgressChannel,
        text: String,
    },
    Range {
        channel: ProgressChannel,
        min: i32,
        max: i32,
    },
    StepSize {
        channel: ProgressChannel,
        step: i32,
    },
    Marquee {
        enabled: bool,
    },
    ItemVisible {
        visible: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressBar {
    min: i32,
    max: i32,
    step: i32,
    value: i32,
    marquee: bool,
    visible: bool,
    message: String,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self {
            min: 0,
            max: 100,
            step: 1,
            value: 0,
            marquee: false,
            visible: true,
            message: String::new(),
        }
    }
}

impl ProgressBar {
    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn is_marquee(&self) -> bool {
        self.marquee
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn set_percent(&mut self, percent: i32) {
        let percent = percent.clamp(0, 100);
        let span = (self.max - self.min) as i64;
        // value always stays inside [min, max]
        self.value = ((span * percent as i64 / 100) as i32).clamp(self.min, self.max);
    }

    fn advance(&mut self) {
        self.value = self
            .value
            .saturating_add(self.step)
            .clamp(self.min, self.max);
    }

    fn set_range(&mut self, min: i32, max: i32) {
        self.min = min;
        self.max = max.max(min);
        self.value = self.value.clamp(self.min, self.max);
    }

    fn set_step(&mut self, step: i32) {
        self.step = step;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressDisplay {
    overall: ProgressBar,
    item: ProgressBar,
}

impl ProgressDisplay {
    pub fn overall(&self) -> &ProgressBar {
        &self.overall
    }

    pub fn item(&self) -> &ProgressBar {
        &self.item
    }

    pub fn apply(&mut self, update: &ProgressUpdate) {
        match update {
            ProgressUpdate::Percent { channel, percent } => {
                self.bar_mut(*channel).set_percent(*percent);
            }
            ProgressUpdate::Step { channel } => self.bar_mut(*channel).advance(),
            ProgressUpdate::Message { channel, text } => {
                self.bar_mut(*channel).message = text.clone();
            }
            ProgressUpdate::Range { channel, min, max } => {
                self.bar_mut(*channel).set_range(*min, *max);
            }
            ProgressUpdate::StepSize { channel, step } => self.bar_mut(*channel).set_step(*step),
            // Marquee style only ever applies to the overall bar.
            ProgressUpdate::Marquee { enabled } => self.overall.marquee = *enabled,
            ProgressUpdate::ItemVisible { visible } => self.item.visible = *visible,
        }
    }

    fn bar_mut(&mut self, channel: ProgressChannel) -> &mut ProgressBar {
        match channel {
            ProgressChannel::Overall => &mut self.overall,
            ProgressChannel::Item => &mut self.item,
        }
    }
}
