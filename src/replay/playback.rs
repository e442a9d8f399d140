//! Replay Recording and Playback
//!
//! Append-only while live, read-only while playing back. Playback drives a
//! fractional cursor over the buffer and paints the frame under it onto
//! the bout's presentation state; the authoritative simulation is
//! suspended for the whole playback session, so nothing can tear.

use tracing::debug;

use crate::game::bout::Bout;
use crate::game::states::DamageKind;
use crate::replay::pool::PresentationPool;
use crate::replay::snapshot::Snapshot;

/// Playback speed, in buffered frames per tick.
///
/// There is no normal-speed reverse: scrubbing backwards is always fast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplaySpeed {
    /// Two frames back per tick.
    FastReverse,
    /// Hold the current frame.
    Paused,
    /// One frame forward per tick.
    #[default]
    Forward,
    /// Two frames forward per tick.
    FastForward,
}

impl ReplaySpeed {
    /// Cursor delta per tick.
    pub fn rate(self) -> f64 {
        match self {
            ReplaySpeed::FastReverse => -2.0,
            ReplaySpeed::Paused => 0.0,
            ReplaySpeed::Forward => 1.0,
            ReplaySpeed::FastForward => 2.0,
        }
    }

    /// Integer rate for the status frame.
    pub fn as_i32(self) -> i32 {
        self.rate() as i32
    }
}

/// The replay buffer plus its playback cursor and staging pool.
#[derive(Debug, Default)]
pub struct ReplayDeck {
    frames: Vec<Snapshot>,
    cursor: f64,
    speed: ReplaySpeed,
    pool: PresentationPool,
}

impl ReplayDeck {
    /// Empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffered frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Append one live frame. Frames are immutable once recorded.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.frames.push(snapshot);
    }

    /// A recorded frame, if it exists.
    pub fn frame(&self, index: usize) -> Option<&Snapshot> {
        self.frames.get(index)
    }

    /// Current playback speed.
    pub fn speed(&self) -> ReplaySpeed {
        self.speed
    }

    /// Set the playback speed.
    pub fn set_speed(&mut self, speed: ReplaySpeed) {
        self.speed = speed;
    }

    /// Integer frame index under the cursor.
    pub fn position(&self) -> usize {
        self.cursor.floor() as usize
    }

    /// Playback position as a fraction of the buffer.
    pub fn progress(&self) -> f64 {
        if self.frames.is_empty() {
            0.0
        } else {
            self.cursor / self.frames.len() as f64
        }
    }

    /// Rewind to the start at normal forward speed.
    pub fn begin_playback(&mut self) {
        debug!(frames = self.frames.len(), "replay playback started");
        self.cursor = 0.0;
        self.speed = ReplaySpeed::Forward;
    }

    /// Jump to `percent` of the buffer: `floor(clamp(percent, 0, 1) * (N-1))`.
    pub fn seek_to(&mut self, percent: f64) {
        if self.frames.is_empty() {
            return;
        }
        let clamped = percent.clamp(0.0, 1.0);
        self.cursor = (clamped * (self.frames.len() - 1) as f64).floor();
    }

    /// Advance one playback tick: move the cursor, clamp at both ends
    /// (forcing a pause on arrival), and paint the frame under the cursor.
    ///
    /// Returns the sounds to replay this tick. Only forward motion across
    /// frame boundaries replays sound; reverse scrubbing is silent.
    pub fn update(&mut self, bout: &mut Bout) -> Vec<DamageKind> {
        if self.frames.is_empty() {
            return Vec::new();
        }

        let prev = self.cursor.floor() as usize;
        self.cursor += self.speed.rate();

        let last = (self.frames.len() - 1) as f64;
        if self.cursor >= last {
            self.cursor = last;
            self.speed = ReplaySpeed::Paused;
        }
        if self.cursor < 0.0 {
            self.cursor = 0.0;
            self.speed = ReplaySpeed::Paused;
        }

        let current = self.cursor.floor() as usize;

        let mut sounds = Vec::new();
        if self.speed.rate() > 0.0 && current > prev {
            for frame in &self.frames[prev + 1..=current] {
                sounds.extend(frame.sounds.iter().copied());
            }
        }

        self.apply_frame(current, bout);
        sounds
    }

    /// Re-apply the final buffered frame; live simulation resumes from it
    /// when playback is toggled off.
    pub fn apply_last(&mut self, bout: &mut Bout) {
        if let Some(last) = self.frames.len().checked_sub(1) {
            self.apply_frame(last, bout);
        }
    }

    /// The staging pool playback renders transients through.
    pub fn pool(&self) -> &PresentationPool {
        &self.pool
    }

    fn apply_frame(&mut self, index: usize, bout: &mut Bout) {
        let Some(frame) = self.frames.get(index) else {
            return;
        };
        frame.a.apply_to(&mut bout.fighters[0]);
        frame.b.apply_to(&mut bout.fighters[1]);
        bout.camera = frame.camera;
        self.pool.apply(&frame.entities);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::game::bout::CameraPose;
    use crate::game::config::BoutConfig;
    use crate::game::fighter::ControlMode;
    use crate::game::states::CombatState;
    use crate::replay::snapshot::FighterSnapshot;

    fn fighter_snap(x: f64) -> FighterSnapshot {
        FighterSnapshot {
            x,
            y: 250.0,
            state: CombatState::Ready,
            sub_frame: 0,
            facing_right: true,
            health: 5,
            visible: true,
        }
    }

    fn snap(x: f64, sounds: Vec<DamageKind>) -> Snapshot {
        Snapshot {
            a: fighter_snap(x),
            b: fighter_snap(800.0 - x),
            camera: CameraPose::default(),
            entities: Vec::new(),
            sounds,
        }
    }

    fn deck_of(n: usize) -> ReplayDeck {
        let mut deck = ReplayDeck::new();
        for i in 0..n {
            deck.record(snap(i as f64, Vec::new()));
        }
        deck
    }

    fn bout() -> Bout {
        Bout::new(
            &BoutConfig::default(),
            [ControlMode::Local, ControlMode::Local],
            0,
        )
    }

    #[test]
    fn test_forward_playback_reproduces_recording() {
        let mut deck = deck_of(10);
        let mut bout = bout();

        deck.begin_playback();
        let mut seen = Vec::new();
        for _ in 0..10 {
            deck.update(&mut bout);
            seen.push(bout.fighters[0].x);
        }
        // First update moves the cursor 0 -> 1, so playback shows frames
        // 1..=9; the final frame repeats once the end clamps.
        assert_eq!(seen, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 9.0]);
    }

    #[test]
    fn test_paused_update_is_a_fixed_point() {
        let mut deck = deck_of(100);
        let mut bout = bout();

        deck.seek_to(0.5);
        deck.set_speed(ReplaySpeed::Paused);
        let before = deck.position();
        for _ in 0..20 {
            deck.update(&mut bout);
            assert_eq!(deck.position(), before);
            assert_eq!(bout.fighters[0].x, before as f64);
        }
    }

    #[test]
    fn test_forward_clamp_stops_at_end() {
        let mut deck = deck_of(5);
        let mut bout = bout();

        deck.begin_playback();
        for _ in 0..20 {
            deck.update(&mut bout);
        }
        assert_eq!(deck.position(), 4);
        assert_eq!(deck.speed(), ReplaySpeed::Paused);
    }

    #[test]
    fn test_fast_reverse_clamps_to_zero_and_pauses() {
        let mut deck = deck_of(100);
        let mut bout = bout();

        // floor(0.51 * 99) lands on frame 50.
        deck.seek_to(0.51);
        assert_eq!(deck.position(), 50);
        deck.set_speed(ReplaySpeed::FastReverse);

        let mut expected = 50i64;
        for _ in 0..25 {
            deck.update(&mut bout);
            expected = (expected - 2).max(0);
            assert_eq!(deck.position(), expected as usize);
        }
        assert_eq!(deck.position(), 0);
        assert_eq!(deck.speed(), ReplaySpeed::Paused);
    }

    #[test]
    fn test_seek_formula_endpoints() {
        let mut deck = deck_of(100);
        deck.seek_to(1.0);
        assert_eq!(deck.position(), 99);
        deck.seek_to(0.0);
        assert_eq!(deck.position(), 0);
        deck.seek_to(2.5);
        assert_eq!(deck.position(), 99, "seek clamps above 1.0");
        deck.seek_to(-0.5);
        assert_eq!(deck.position(), 0, "seek clamps below 0.0");
    }

    #[test]
    fn test_forward_skip_replays_sounds_in_order() {
        let mut deck = ReplayDeck::new();
        deck.record(snap(0.0, Vec::new()));
        deck.record(snap(1.0, vec![DamageKind::High]));
        deck.record(snap(2.0, vec![DamageKind::Low]));
        deck.record(snap(3.0, Vec::new()));
        deck.record(snap(4.0, Vec::new()));

        let mut bout = bout();
        deck.begin_playback();
        deck.set_speed(ReplaySpeed::FastForward);

        // Cursor 0 -> 2 crosses frames 1 and 2.
        let sounds = deck.update(&mut bout);
        assert_eq!(sounds, vec![DamageKind::High, DamageKind::Low]);
    }

    #[test]
    fn test_reverse_never_replays_sounds() {
        let mut deck = ReplayDeck::new();
        for i in 0..10 {
            deck.record(snap(i as f64, vec![DamageKind::High]));
        }

        let mut bout = bout();
        deck.seek_to(1.0);
        deck.set_speed(ReplaySpeed::FastReverse);
        for _ in 0..10 {
            assert!(deck.update(&mut bout).is_empty());
        }
    }

    #[test]
    fn test_apply_last_restores_resume_point() {
        let mut deck = deck_of(10);
        let mut bout = bout();

        deck.begin_playback();
        deck.update(&mut bout);
        assert_eq!(bout.fighters[0].x, 1.0);

        deck.apply_last(&mut bout);
        assert_eq!(bout.fighters[0].x, 9.0);
    }

    #[test]
    fn test_empty_deck_update_is_harmless() {
        let mut deck = ReplayDeck::new();
        let mut bout = bout();
        assert!(deck.update(&mut bout).is_empty());
        assert_eq!(deck.progress(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_seek_matches_formula(percent in -1.0f64..2.0, len in 1usize..500) {
            let mut deck = deck_of(len);
            deck.seek_to(percent);
            let expected = (percent.clamp(0.0, 1.0) * (len - 1) as f64).floor() as usize;
            prop_assert_eq!(deck.position(), expected);
            prop_assert!(deck.position() < len);
        }
    }
}
