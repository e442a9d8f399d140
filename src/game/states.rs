//! Combat State Definitions
//!
//! Static timing tables for every fighter state. Hit windows and effect
//! triggers are tick offsets into a state's duration table, so the
//! simulation core carries no rendering dependency.

use serde::{Serialize, Deserialize};

// =============================================================================
// HIT KINDS
// =============================================================================

/// What an attack state checks for at its hit sub-frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    /// High strike - damages and knocks back.
    High,
    /// Low strike - damages and knocks back.
    Low,
    /// Grab - no damage, puts the target in `Held`.
    Grab,
}

impl HitKind {
    /// The damage-dealing subset. Grabs carry no damage.
    pub fn damage_kind(self) -> Option<DamageKind> {
        match self {
            HitKind::High => Some(DamageKind::High),
            HitKind::Low => Some(DamageKind::Low),
            HitKind::Grab => None,
        }
    }
}

/// Damage kind carried by hits, wire messages and sound requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    /// To the face.
    High,
    /// To the body.
    Low,
}

impl DamageKind {
    /// Reaction state a victim enters when this damage lands (and survives).
    pub fn reaction(self) -> CombatState {
        match self {
            DamageKind::High => CombatState::ReactingHigh,
            DamageKind::Low => CombatState::ReactingLow,
        }
    }
}

// =============================================================================
// STATE TAGS
// =============================================================================

/// Fighter state tags.
///
/// `Down` is terminal: no transition ever leaves it. `Victory` is terminal
/// and purely cosmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatState {
    /// Neutral stance, accepts any action.
    Ready,
    /// One-shot entry animation; releases the dropped prop mid-way.
    Intro,
    /// High strike.
    AttackHigh,
    /// Low strike.
    AttackLow,
    /// Grab attempt.
    Grab,
    /// Recoiling from a high hit.
    ReactingHigh,
    /// Recoiling from a low hit.
    ReactingLow,
    /// Caught by a grab.
    Held,
    /// Knocked out, going down.
    Falling,
    /// On the ice. Terminal.
    Down,
    /// Celebrating. Terminal.
    Victory,
}

impl CombatState {
    /// Timing table for this state.
    pub fn def(self) -> &'static StateDef {
        match self {
            CombatState::Ready => &READY,
            CombatState::Intro => &INTRO,
            CombatState::AttackHigh => &ATTACK_HIGH,
            CombatState::AttackLow => &ATTACK_LOW,
            CombatState::Grab => &GRAB,
            CombatState::ReactingHigh => &REACTING_HIGH,
            CombatState::ReactingLow => &REACTING_LOW,
            CombatState::Held => &HELD,
            CombatState::Falling => &FALLING,
            CombatState::Down => &DOWN,
            CombatState::Victory => &VICTORY,
        }
    }

    /// True for the three offensive states.
    pub fn is_attack(self) -> bool {
        matches!(
            self,
            CombatState::AttackHigh | CombatState::AttackLow | CombatState::Grab
        )
    }

    /// Display label for the status frame.
    pub fn label(self) -> &'static str {
        match self {
            CombatState::Ready => "READY",
            CombatState::Intro => "INTRO",
            CombatState::AttackHigh => "ATTACK HIGH",
            CombatState::AttackLow => "ATTACK LOW",
            CombatState::Grab => "GRAB",
            CombatState::ReactingHigh => "REACTING HIGH",
            CombatState::ReactingLow => "REACTING LOW",
            CombatState::Held => "HELD",
            CombatState::Falling => "FALLING",
            CombatState::Down => "DOWN",
            CombatState::Victory => "VICTORY",
        }
    }
}

// =============================================================================
// STATE TABLE
// =============================================================================

/// Static timing table for one state.
///
/// A state plays its sub-frames in order, spending `durations[i]` ticks on
/// sub-frame `i`. Looping states wrap; one-shot states complete and enter
/// `next` (or freeze in place when there is none).
#[derive(Debug)]
pub struct StateDef {
    /// Ticks spent on each sub-frame, in order. Never empty.
    pub durations: &'static [u32],
    /// Wrap to sub-frame 0 on completion instead of finishing.
    pub looping: bool,
    /// Successor entered automatically when a one-shot table completes.
    pub next: Option<CombatState>,
    /// Sub-frame at which the attack is evaluated, with its kind.
    pub hit: Option<(usize, HitKind)>,
    /// Sub-frame that releases the dropped prop.
    pub effect_frame: Option<usize>,
}

impl StateDef {
    const fn looped(durations: &'static [u32]) -> Self {
        Self { durations, looping: true, next: None, hit: None, effect_frame: None }
    }

    const fn one_shot(durations: &'static [u32], next: CombatState) -> Self {
        Self { durations, looping: false, next: Some(next), hit: None, effect_frame: None }
    }

    const fn strike(durations: &'static [u32], hit_frame: usize, kind: HitKind) -> Self {
        Self {
            durations,
            looping: false,
            next: Some(CombatState::Ready),
            hit: Some((hit_frame, kind)),
            effect_frame: None,
        }
    }

    /// Number of sub-frames in the table.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// True when the table has no sub-frames. Never happens for the
    /// built-in states; kept for clamp logic.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

static READY: StateDef = StateDef::looped(&[60]);

static INTRO: StateDef = StateDef {
    durations: &[60, 16, 16, 8, 6],
    looping: false,
    next: Some(CombatState::Ready),
    hit: None,
    // Prop leaves the hands one sub-frame before the wind-up finishes.
    effect_frame: Some(3),
};

static ATTACK_HIGH: StateDef = StateDef::strike(&[5, 12, 8], 1, HitKind::High);
static ATTACK_LOW: StateDef = StateDef::strike(&[5, 12, 8], 1, HitKind::Low);
static GRAB: StateDef = StateDef::strike(&[20, 6], 0, HitKind::Grab);

static REACTING_HIGH: StateDef = StateDef::one_shot(&[16, 8], CombatState::Ready);
static REACTING_LOW: StateDef = StateDef::one_shot(&[16, 8], CombatState::Ready);
static HELD: StateDef = StateDef::one_shot(&[30, 4], CombatState::Ready);
static FALLING: StateDef = StateDef::one_shot(&[12, 20], CombatState::Down);

static DOWN: StateDef = StateDef::looped(&[60]);
static VICTORY: StateDef = StateDef::looped(&[18, 18, 18, 18, 18, 18, 18, 18]);

/// All state tags, for table-integrity tests and iteration.
pub const ALL_STATES: [CombatState; 11] = [
    CombatState::Ready,
    CombatState::Intro,
    CombatState::AttackHigh,
    CombatState::AttackLow,
    CombatState::Grab,
    CombatState::ReactingHigh,
    CombatState::ReactingLow,
    CombatState::Held,
    CombatState::Falling,
    CombatState::Down,
    CombatState::Victory,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_integrity() {
        for state in ALL_STATES {
            let def = state.def();
            assert!(!def.is_empty(), "{state:?} has an empty duration table");

            // One-shot states either chain somewhere or are the terminal Down.
            if !def.looping {
                assert!(def.next.is_some(), "{state:?} completes with no successor");
            }

            if let Some((frame, _)) = def.hit {
                assert!(frame < def.len(), "{state:?} hit frame out of bounds");
            }
            if let Some(frame) = def.effect_frame {
                assert!(frame < def.len(), "{state:?} effect frame out of bounds");
            }
        }
    }

    #[test]
    fn test_terminal_states_loop_forever() {
        assert!(CombatState::Down.def().looping);
        assert!(CombatState::Down.def().next.is_none());
        assert!(CombatState::Victory.def().looping);
        assert!(CombatState::Victory.def().next.is_none());
    }

    #[test]
    fn test_attack_windows() {
        assert_eq!(CombatState::AttackHigh.def().hit, Some((1, HitKind::High)));
        assert_eq!(CombatState::AttackLow.def().hit, Some((1, HitKind::Low)));
        assert_eq!(CombatState::Grab.def().hit, Some((0, HitKind::Grab)));
        assert_eq!(CombatState::Intro.def().effect_frame, Some(3));
    }

    #[test]
    fn test_falling_chains_to_down() {
        assert_eq!(CombatState::Falling.def().next, Some(CombatState::Down));
    }

    #[test]
    fn test_labels_have_no_underscores() {
        for state in ALL_STATES {
            assert!(!state.label().contains('_'));
        }
    }

    #[test]
    fn test_serde_tags_are_snake_case() {
        let json = serde_json::to_string(&CombatState::AttackHigh).unwrap();
        assert_eq!(json, "\"attack_high\"");
        let back: CombatState = serde_json::from_str("\"reacting_low\"").unwrap();
        assert_eq!(back, CombatState::ReactingLow);
    }
}
