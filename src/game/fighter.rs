//! Fighter State
//!
//! Per-fighter combat state: position, velocity, health, the animation-free
//! state machine cursor, and the one-shot flags that gate hit and effect
//! triggers. A fighter is owned exclusively by its bout; opponent
//! interaction happens through explicit references at the bout level.

use serde::{Serialize, Deserialize};

use crate::game::config::BoutConfig;
use crate::game::intent::IntentFrame;
use crate::game::states::{CombatState, DamageKind, HitKind};

// =============================================================================
// SIDES AND CONTROL
// =============================================================================

/// Which corner a fighter starts in. Side A is the host-owned fighter in a
/// networked bout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Left corner.
    A,
    /// Right corner.
    B,
}

impl Side {
    /// The opposing side.
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Index into the bout's fighter pair.
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// Who drives a fighter each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// Driven by sampled input intents on this instance.
    Local,
    /// Overwritten by SYNC messages from the remote peer; the local state
    /// machine's input path is bypassed entirely.
    Mirrored,
    /// Driven by the rule-based policy.
    Cpu,
}

// =============================================================================
// FIGHTER
// =============================================================================

/// Result of advancing a fighter's state table by one tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct StateTick {
    /// The effect sub-frame was crossed for the first time this state
    /// instance: release the dropped prop.
    pub effect: bool,
    /// The cursor sits on an un-spent hit sub-frame: evaluate the attack.
    pub hit_check: Option<HitKind>,
}

/// One of the two combatants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fighter {
    /// Which corner this fighter belongs to.
    pub side: Side,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position. Constant during a bout; carried for snapshots
    /// and the wire format.
    pub y: f64,
    /// Horizontal velocity.
    pub vx: f64,
    /// Facing toward +x.
    pub facing_right: bool,
    /// Current health, in [0, max_health].
    pub health: u8,
    /// Health ceiling.
    pub max_health: u8,
    /// Current state tag.
    pub state: CombatState,
    /// Index into the current state's duration table.
    pub sub_frame: usize,
    /// Who drives this fighter.
    pub control: ControlMode,
    /// Presentation visibility, round-tripped through snapshots.
    pub visible: bool,

    ticks_in_frame: u32,
    locked: bool,
    hit_dealt: bool,
    effect_fired: bool,
}

impl Fighter {
    /// Create a fighter at its spawn position, entering the intro state.
    pub fn new(side: Side, x: f64, y: f64, control: ControlMode, max_health: u8) -> Self {
        let mut fighter = Self {
            side,
            x,
            y,
            vx: 0.0,
            facing_right: side == Side::A,
            health: max_health,
            max_health,
            state: CombatState::Ready,
            sub_frame: 0,
            control,
            visible: true,
            ticks_in_frame: 0,
            locked: false,
            hit_dealt: false,
            effect_fired: false,
        };
        fighter.enter_state(CombatState::Intro);
        fighter
    }

    /// True while a one-shot state is still playing out.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// True when movement and new actions are accepted this tick.
    pub fn can_act(&self) -> bool {
        !self.locked
            && !matches!(
                self.state,
                CombatState::Held
                    | CombatState::Falling
                    | CombatState::Down
                    | CombatState::Victory
            )
    }

    /// A damage hit already landed this state instance.
    pub fn hit_dealt(&self) -> bool {
        self.hit_dealt
    }

    /// Spend this state instance's single hit. Called by the bout once the
    /// range check passes; the window never re-fires afterwards.
    pub fn mark_hit_dealt(&mut self) {
        self.hit_dealt = true;
    }

    // =========================================================================
    // State transitions
    // =========================================================================

    /// Enter a state, resetting the sub-frame cursor and one-shot flags.
    ///
    /// Re-entering the current state is a no-op, and nothing ever leaves
    /// `Down`.
    pub fn enter_state(&mut self, new_state: CombatState) {
        if self.state == CombatState::Down {
            return;
        }
        if self.state == new_state {
            return;
        }

        self.state = new_state;
        self.sub_frame = 0;
        self.ticks_in_frame = 0;
        self.hit_dealt = false;
        self.effect_fired = false;
        self.locked = !new_state.def().looping;

        if new_state == CombatState::Victory {
            self.vx = 0.0;
        }
    }

    /// Restore presentation state from a replay frame.
    ///
    /// Bypasses the transition guards: playback shows whatever was
    /// recorded, including frames before a `Down` that the live machine
    /// would refuse to leave. The cursor is parked (playback never calls
    /// [`advance_state`](Self::advance_state)).
    pub fn apply_presentation(&mut self, state: CombatState, sub_frame: usize) {
        self.state = state;
        self.sub_frame = sub_frame.min(state.def().len().saturating_sub(1));
        self.ticks_in_frame = 0;
    }

    /// Advance the state table by one tick.
    ///
    /// Handles sub-frame progression, loop wrap-around, and the automatic
    /// transition a completed one-shot state declares. Returns which
    /// triggers the landing sub-frame arms.
    pub fn advance_state(&mut self) -> StateTick {
        let def = self.state.def();
        self.ticks_in_frame += 1;

        if self.ticks_in_frame >= def.durations[self.sub_frame.min(def.len() - 1)] {
            self.ticks_in_frame = 0;
            if self.sub_frame + 1 < def.len() {
                self.sub_frame += 1;
            } else if def.looping {
                self.sub_frame = 0;
            } else if let Some(next) = def.next {
                self.enter_state(next);
            }
            // A one-shot state with no successor freezes on its last
            // sub-frame.
        }

        let def = self.state.def();
        let mut out = StateTick::default();

        if let Some(frame) = def.effect_frame {
            if frame == self.sub_frame && !self.effect_fired {
                self.effect_fired = true;
                out.effect = true;
            }
        }
        if let Some((frame, kind)) = def.hit {
            if frame == self.sub_frame && !self.hit_dealt {
                out.hit_check = Some(kind);
            }
        }

        out
    }

    // =========================================================================
    // Intents and physics
    // =========================================================================

    /// Apply one tick of sampled intents: movement accumulates into
    /// velocity, actions attempt a transition. Everything is rejected while
    /// locked or in a non-acting state.
    pub fn apply_intent(&mut self, intent: IntentFrame, config: &BoutConfig) {
        if !self.can_act() {
            return;
        }

        if intent.left {
            self.vx -= config.move_speed;
        }
        if intent.right {
            self.vx += config.move_speed;
        }

        if intent.attack_high {
            self.enter_state(CombatState::AttackHigh);
        }
        if intent.attack_low {
            self.enter_state(CombatState::AttackLow);
        }
        if intent.grab {
            self.enter_state(CombatState::Grab);
        }
    }

    /// Integrate velocity, apply friction, and bounce off the arena walls.
    pub fn apply_physics(&mut self, config: &BoutConfig) {
        self.x += self.vx;
        self.vx *= config.friction;

        if self.x < config.arena_min_x {
            self.x = config.arena_min_x;
            if self.vx < 0.0 {
                self.vx = -self.vx * config.bounce;
            }
        }
        if self.x > config.arena_max_x {
            self.x = config.arena_max_x;
            if self.vx > 0.0 {
                self.vx = -self.vx * config.bounce;
            }
        }
    }

    /// Enforce minimum separation from the opponent and face toward them.
    /// Skipped entirely once this fighter is falling or down.
    pub fn separate_and_face(&mut self, opponent_x: f64, config: &BoutConfig) {
        if matches!(self.state, CombatState::Down | CombatState::Falling) {
            return;
        }

        let dist = (self.x - opponent_x).abs();
        if dist < config.min_separation {
            self.x = if self.x < opponent_x {
                opponent_x - config.min_separation
            } else {
                opponent_x + config.min_separation
            };
            self.vx = 0.0;
        }

        self.facing_right = self.x < opponent_x;
    }

    // =========================================================================
    // Taking hits
    // =========================================================================

    /// Vulnerable to damage: neutral, held, mid-attack, or already reeling.
    pub fn can_be_hit(&self) -> bool {
        matches!(
            self.state,
            CombatState::Ready
                | CombatState::Held
                | CombatState::AttackHigh
                | CombatState::AttackLow
                | CombatState::Grab
                | CombatState::ReactingHigh
                | CombatState::ReactingLow
        )
    }

    /// Grabbable: anything unlocked, or standing ready.
    pub fn can_be_grabbed(&self) -> bool {
        !self.locked || self.state == CombatState::Ready
    }

    /// Lose one health and react: a reaction state while health remains,
    /// `Falling` when it reaches zero.
    pub fn take_damage(&mut self, kind: DamageKind) {
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.enter_state(CombatState::Falling);
        } else {
            self.enter_state(kind.reaction());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter() -> Fighter {
        let mut f = Fighter::new(Side::A, 250.0, 250.0, ControlMode::Local, 5);
        // Skip past the intro for combat-focused tests.
        f.enter_state(CombatState::Ready);
        f.locked = false;
        f
    }

    #[test]
    fn test_down_is_terminal() {
        let mut f = fighter();
        f.enter_state(CombatState::Falling);
        for _ in 0..64 {
            f.advance_state();
        }
        assert_eq!(f.state, CombatState::Down);

        f.enter_state(CombatState::Ready);
        assert_eq!(f.state, CombatState::Down);
        f.take_damage(DamageKind::High);
        assert_eq!(f.state, CombatState::Down);
    }

    #[test]
    fn test_entering_victory_zeroes_velocity() {
        let mut f = fighter();
        f.vx = 7.5;
        f.enter_state(CombatState::Victory);
        assert_eq!(f.vx, 0.0);
        assert!(!f.can_act());
    }

    #[test]
    fn test_state_entry_resets_one_shot_flags() {
        let mut f = fighter();
        f.enter_state(CombatState::AttackHigh);
        f.mark_hit_dealt();
        assert!(f.hit_dealt());

        f.enter_state(CombatState::ReactingLow);
        assert!(!f.hit_dealt());
    }

    #[test]
    fn test_hit_window_timing() {
        let mut f = fighter();
        f.enter_state(CombatState::AttackHigh);

        // Wind-up: 5 ticks on sub-frame 0, no hit window yet.
        for _ in 0..4 {
            let tick = f.advance_state();
            assert_eq!(tick.hit_check, None);
        }

        // Fifth tick lands on the connect sub-frame.
        let tick = f.advance_state();
        assert_eq!(f.sub_frame, 1);
        assert_eq!(tick.hit_check, Some(HitKind::High));

        // Window re-arms every tick until the hit is spent.
        let tick = f.advance_state();
        assert_eq!(tick.hit_check, Some(HitKind::High));
        f.mark_hit_dealt();
        let tick = f.advance_state();
        assert_eq!(tick.hit_check, None);
    }

    #[test]
    fn test_grab_window_opens_immediately() {
        let mut f = fighter();
        f.enter_state(CombatState::Grab);
        let tick = f.advance_state();
        assert_eq!(tick.hit_check, Some(HitKind::Grab));
    }

    #[test]
    fn test_one_shot_completion_chains_to_successor() {
        let mut f = fighter();
        f.enter_state(CombatState::AttackHigh);
        assert!(f.is_locked());

        let total: u32 = CombatState::AttackHigh.def().durations.iter().sum();
        for _ in 0..total {
            f.advance_state();
        }
        assert_eq!(f.state, CombatState::Ready);
        assert!(f.can_act());
    }

    #[test]
    fn test_intro_fires_effect_once() {
        let mut f = Fighter::new(Side::B, 550.0, 250.0, ControlMode::Local, 5);
        assert_eq!(f.state, CombatState::Intro);

        let mut effects = 0;
        for _ in 0..200 {
            if f.advance_state().effect {
                effects += 1;
            }
        }
        assert_eq!(effects, 1);
        assert_eq!(f.state, CombatState::Ready);
    }

    #[test]
    fn test_damage_reaction_and_knockout() {
        let mut f = fighter();
        f.take_damage(DamageKind::Low);
        assert_eq!(f.health, 4);
        assert_eq!(f.state, CombatState::ReactingLow);

        f.health = 1;
        f.enter_state(CombatState::Ready);
        f.take_damage(DamageKind::High);
        assert_eq!(f.health, 0);
        assert_eq!(f.state, CombatState::Falling);
    }

    #[test]
    fn test_health_clamps_at_zero() {
        let mut f = fighter();
        f.health = 0;
        f.take_damage(DamageKind::High);
        assert_eq!(f.health, 0);
    }

    #[test]
    fn test_grabbable_predicate() {
        let mut f = fighter();
        assert!(f.can_be_grabbed());

        f.enter_state(CombatState::ReactingHigh);
        assert!(!f.can_be_grabbed());
    }

    #[test]
    fn test_wall_bounce() {
        let cfg = BoutConfig::default();
        let mut f = fighter();
        f.x = cfg.arena_min_x + 1.0;
        f.vx = -10.0;
        f.apply_physics(&cfg);
        assert_eq!(f.x, cfg.arena_min_x);
        assert!(f.vx > 0.0);
    }

    #[test]
    fn test_separation_pushes_and_faces() {
        let cfg = BoutConfig::default();
        let mut f = fighter();
        f.x = 400.0;
        f.vx = 3.0;
        f.separate_and_face(410.0, &cfg);
        assert_eq!(f.x, 410.0 - cfg.min_separation);
        assert_eq!(f.vx, 0.0);
        assert!(f.facing_right);
    }

    #[test]
    fn test_locked_fighter_ignores_intents() {
        let cfg = BoutConfig::default();
        let mut f = fighter();
        f.enter_state(CombatState::AttackLow);
        let vx = f.vx;
        f.apply_intent(
            IntentFrame { left: true, grab: true, ..IntentFrame::IDLE },
            &cfg,
        );
        assert_eq!(f.vx, vx);
        assert_eq!(f.state, CombatState::AttackLow);
    }
}
