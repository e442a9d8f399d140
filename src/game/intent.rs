//! Movement and Action Intents
//!
//! The boolean intent frame is the only way anything - keyboard, gamepad,
//! or the CPU policy - steers a fighter.

use serde::{Serialize, Deserialize};

/// Intents sampled once per tick for one locally-controlled fighter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentFrame {
    /// Accelerate left this tick.
    pub left: bool,
    /// Accelerate right this tick.
    pub right: bool,
    /// Start a high strike.
    pub attack_high: bool,
    /// Start a low strike.
    pub attack_low: bool,
    /// Start a grab.
    pub grab: bool,
}

impl IntentFrame {
    /// Frame with nothing pressed.
    pub const IDLE: Self = Self {
        left: false,
        right: false,
        attack_high: false,
        attack_low: false,
        grab: false,
    };

    /// Pure leftward movement.
    pub const fn walk_left() -> Self {
        Self { left: true, ..Self::IDLE }
    }

    /// Pure rightward movement.
    pub const fn walk_right() -> Self {
        Self { right: true, ..Self::IDLE }
    }

    /// True when nothing is pressed.
    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

/// Per-tick intent provider for a locally-controlled fighter.
///
/// The input collaborator (key/button mapping lives outside this crate)
/// implements this; tests and the demo binary use [`ScriptedIntents`].
pub trait IntentSource {
    /// Sample the intents for the current tick.
    fn sample(&mut self) -> IntentFrame;
}

/// Plays back a fixed intent sequence, then idles forever.
#[derive(Debug, Default)]
pub struct ScriptedIntents {
    frames: Vec<IntentFrame>,
    cursor: usize,
}

impl ScriptedIntents {
    /// Script from an explicit frame list.
    pub fn new(frames: Vec<IntentFrame>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Script that holds one frame for `ticks` ticks.
    pub fn held(frame: IntentFrame, ticks: usize) -> Self {
        Self::new(vec![frame; ticks])
    }

    /// Append `ticks` ticks of `frame`.
    pub fn then(mut self, frame: IntentFrame, ticks: usize) -> Self {
        self.frames.extend(std::iter::repeat(frame).take(ticks));
        self
    }

    /// True once the script is exhausted.
    pub fn finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }
}

impl IntentSource for ScriptedIntents {
    fn sample(&mut self) -> IntentFrame {
        let frame = self.frames.get(self.cursor).copied().unwrap_or(IntentFrame::IDLE);
        self.cursor += 1;
        frame
    }
}
