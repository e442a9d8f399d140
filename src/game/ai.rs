//! Rule-Based Opponent
//!
//! A decision policy layered on top of the combat state machine. It only
//! ever emits the same intent frames a human input layer would, so CPU
//! fighters flow through the exact simulation path as everyone else.

use rand::Rng;
use rand::rngs::SmallRng;

use crate::game::config::BoutConfig;
use crate::game::fighter::Fighter;
use crate::game::intent::IntentFrame;
use crate::game::states::CombatState;

/// Base reaction delay in ticks, before jitter and difficulty scaling.
const REACTION_BASE_TICKS: f64 = 12.0;
/// Upper bound of the random jitter added to the reaction delay, in ticks.
const REACTION_JITTER_TICKS: f64 = 24.0;

/// Decision state for one CPU-controlled fighter.
#[derive(Debug, Clone)]
pub struct CpuPolicy {
    difficulty: f64,
    decision_timer: u32,
    reaction_delay: u32,
}

impl Default for CpuPolicy {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl CpuPolicy {
    /// Create a policy with the given difficulty on a [0, 1] scale. Higher
    /// difficulty dodges more reliably and re-decides faster.
    pub fn new(difficulty: f64) -> Self {
        Self {
            difficulty: difficulty.clamp(0.0, 1.0),
            decision_timer: 0,
            reaction_delay: 18,
        }
    }

    /// Difficulty knob this policy was built with.
    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    /// Produce this tick's intents.
    pub fn decide(
        &mut self,
        me: &Fighter,
        opponent: &Fighter,
        config: &BoutConfig,
        rng: &mut SmallRng,
    ) -> IntentFrame {
        if matches!(
            me.state,
            CombatState::Held | CombatState::Falling | CombatState::Down | CombatState::Victory
        ) {
            return IntentFrame::IDLE;
        }

        let dist = (me.x - opponent.x).abs();
        let opponent_attacking = opponent.state.is_attack();
        let toward_right = me.x < opponent.x;

        self.decision_timer += 1;

        // Dodge: back out of an incoming attack, more reliably at higher
        // difficulty. Safety outranks offense.
        if opponent_attacking && dist < config.hit_range + 20.0 && me.can_act() {
            if rng.gen::<f64>() < self.difficulty {
                return if toward_right {
                    IntentFrame::walk_left()
                } else {
                    IntentFrame::walk_right()
                };
            }
        }

        let mut frame = IntentFrame::IDLE;

        // Spacing: hover at the edge of hit range. Backing off runs at half
        // rate so the retreat is slower than the approach.
        if me.can_act() {
            let ideal = config.hit_range - 5.0;
            if dist > ideal + 10.0 {
                if toward_right {
                    frame.right = true;
                } else {
                    frame.left = true;
                }
            } else if dist < ideal - 10.0 && self.decision_timer % 2 == 0 {
                if toward_right {
                    frame.left = true;
                } else {
                    frame.right = true;
                }
            }
        }

        // Offense: once the reaction timer expires and the target is in
        // reach, pick an attack weighted toward the damaging ones.
        if self.decision_timer >= self.reaction_delay
            && me.can_act()
            && dist <= config.hit_range + 5.0
        {
            self.decision_timer = 0;

            let roll = rng.gen::<f64>();
            if roll < 0.45 {
                frame.attack_high = true;
            } else if roll < 0.85 {
                frame.attack_low = true;
            } else {
                frame.grab = true;
            }

            // Re-arm with jitter so the cadence is not robotic; higher
            // difficulty shortens the whole window.
            let jitter = rng.gen::<f64>() * REACTION_JITTER_TICKS;
            let scale = 1.3 - 0.6 * self.difficulty;
            self.reaction_delay = ((REACTION_BASE_TICKS + jitter) * scale).max(1.0) as u32;
        }

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::game::fighter::{ControlMode, Side};

    fn pair(ax: f64, bx: f64) -> (Fighter, Fighter) {
        let mut a = Fighter::new(Side::A, ax, 250.0, ControlMode::Cpu, 5);
        let mut b = Fighter::new(Side::B, bx, 250.0, ControlMode::Local, 5);
        ready(&mut a);
        ready(&mut b);
        (a, b)
    }

    fn ready(f: &mut Fighter) {
        // Drive the intro to completion so can_act() holds.
        while f.state == CombatState::Intro {
            f.advance_state();
        }
    }

    #[test]
    fn test_idle_while_incapacitated() {
        let cfg = BoutConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let (mut a, b) = pair(250.0, 550.0);
        a.enter_state(CombatState::Held);

        let mut policy = CpuPolicy::new(1.0);
        let frame = policy.decide(&a, &b, &cfg, &mut rng);
        assert!(frame.is_idle());
    }

    #[test]
    fn test_dodges_incoming_attack_at_full_difficulty() {
        let cfg = BoutConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let (a, mut b) = pair(400.0, 430.0);
        b.enter_state(CombatState::AttackHigh);

        let mut policy = CpuPolicy::new(1.0);
        let frame = policy.decide(&a, &b, &cfg, &mut rng);
        // Opponent is to the right, so the dodge is a pure retreat left.
        assert!(frame.left);
        assert!(!frame.right);
        assert!(!frame.attack_high && !frame.attack_low && !frame.grab);
    }

    #[test]
    fn test_closes_distance_when_far() {
        let cfg = BoutConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let (a, b) = pair(150.0, 650.0);

        let mut policy = CpuPolicy::new(0.0);
        let frame = policy.decide(&a, &b, &cfg, &mut rng);
        assert!(frame.right);
    }

    #[test]
    fn test_eventually_attacks_in_range() {
        let cfg = BoutConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);
        let (a, b) = pair(400.0, 445.0);

        let mut policy = CpuPolicy::new(0.0);
        let mut attacked = false;
        for _ in 0..120 {
            let frame = policy.decide(&a, &b, &cfg, &mut rng);
            if frame.attack_high || frame.attack_low || frame.grab {
                attacked = true;
                break;
            }
        }
        assert!(attacked, "CPU never attacked an in-range opponent");
    }
}
