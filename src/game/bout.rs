//! Bout State
//!
//! Everything that lives exactly as long as one (re)start-to-(re)start
//! cycle: both fighters, transient entities, the sound queue, and the
//! per-tick event outbox. Owned by the match driver; subsystems receive
//! explicit references instead of reaching for ambient state.

use rand::Rng;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::game::config::BoutConfig;
use crate::game::effects::{Particle, Prop};
use crate::game::events::BoutEvent;
use crate::game::fighter::{ControlMode, Fighter, Side};
use crate::game::states::{CombatState, DamageKind, HitKind};

/// Camera pose supplied by the framing collaborator and recorded into
/// snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Zoom factor.
    pub zoom: f64,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self { x: 400.0, y: 200.0, zoom: 1.0 }
    }
}

/// Complete state of one bout.
#[derive(Debug)]
pub struct Bout {
    /// Identifier for log correlation.
    pub id: Uuid,
    /// Ticks simulated since the bout started.
    pub tick: u64,
    /// The two combatants, indexed by [`Side::index`].
    pub fighters: [Fighter; 2],
    /// The bout is decided.
    pub game_over: bool,
    /// Side left standing, if the bout was decided by a knockout.
    pub winner: Option<Side>,
    /// Ticks elapsed since the bout was decided.
    pub ko_ticks: u32,
    /// Some dropped prop has come to rest (gates the framing collaborator).
    pub prop_landed: bool,
    /// Live burst particles.
    pub particles: Vec<Particle>,
    /// Dropped props.
    pub props: Vec<Prop>,
    /// Latest camera pose from the framing collaborator.
    pub camera: CameraPose,

    victory_triggered: bool,
    sound_queue: Vec<DamageKind>,
    pending_events: Vec<BoutEvent>,
    rng: SmallRng,
}

impl Bout {
    /// Create a fresh bout with both fighters at their spawn marks, playing
    /// their intros.
    pub fn new(config: &BoutConfig, controls: [ControlMode; 2], seed: u64) -> Self {
        let id = Uuid::new_v4();
        info!(%id, ?controls, "bout started");

        Self {
            id,
            tick: 0,
            fighters: [
                Fighter::new(Side::A, config.spawn_a_x, config.spawn_y, controls[0], config.max_health),
                Fighter::new(Side::B, config.spawn_b_x, config.spawn_y, controls[1], config.max_health),
            ],
            game_over: false,
            winner: None,
            ko_ticks: 0,
            prop_landed: false,
            particles: Vec::new(),
            props: Vec::new(),
            camera: CameraPose::default(),
            victory_triggered: false,
            sound_queue: Vec::new(),
            pending_events: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Borrow one fighter.
    pub fn fighter(&self, side: Side) -> &Fighter {
        &self.fighters[side.index()]
    }

    /// Borrow one fighter mutably.
    pub fn fighter_mut(&mut self, side: Side) -> &mut Fighter {
        &mut self.fighters[side.index()]
    }

    /// Borrow `side`'s fighter and their opponent at the same time.
    pub fn pair_mut(&mut self, side: Side) -> (&mut Fighter, &mut Fighter) {
        let (a, b) = self.fighters.split_at_mut(1);
        match side {
            Side::A => (&mut a[0], &mut b[0]),
            Side::B => (&mut b[0], &mut a[0]),
        }
    }

    // =========================================================================
    // Outbox and sound queue
    // =========================================================================

    /// Queue an event for this tick's drain.
    pub fn push_event(&mut self, event: BoutEvent) {
        self.pending_events.push(event);
    }

    /// Take every event queued since the last drain.
    pub fn take_events(&mut self) -> Vec<BoutEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Queue a one-shot sound for the audio collaborator and the replay
    /// capture.
    pub fn queue_sound(&mut self, kind: DamageKind) {
        self.sound_queue.push(kind);
    }

    /// Take every sound queued since the last capture.
    pub fn take_sounds(&mut self) -> Vec<DamageKind> {
        std::mem::take(&mut self.sound_queue)
    }

    // =========================================================================
    // Hit resolution
    // =========================================================================

    /// Evaluate `attacker`'s open hit window against the opponent.
    ///
    /// The window stays armed while the opponent is out of range; once the
    /// range check passes it is spent for the rest of the state instance,
    /// whatever the outcome. Returns true when a damage hit actually
    /// landed (the caller messages the peer in that case).
    pub fn resolve_hit(&mut self, attacker: Side, kind: HitKind, config: &BoutConfig) -> bool {
        let (atk, victim) = self.pair_mut(attacker);
        let dist = (atk.x - victim.x).abs();
        if dist > config.hit_range {
            return false;
        }
        atk.mark_hit_dealt();

        match kind.damage_kind() {
            None => {
                if victim.can_be_grabbed() {
                    victim.enter_state(CombatState::Held);
                    debug!(?attacker, "grab connected");
                    self.push_event(BoutEvent::Grabbed { attacker, victim: attacker.other() });
                }
                false
            }
            Some(damage) => {
                if victim.can_be_hit() {
                    self.apply_damage(attacker, damage, config);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Apply the full damage sequence: health, knockback, reaction state,
    /// sound, shake, and the burst effect. Shared verbatim between locally
    /// resolved hits and remote HIT claims.
    pub fn apply_damage(&mut self, attacker: Side, kind: DamageKind, config: &BoutConfig) {
        let (atk, victim) = self.pair_mut(attacker);

        let finisher = victim.health <= 1;
        victim.take_damage(kind);

        let dir = if atk.x < victim.x { 1.0 } else { -1.0 };
        let force = if finisher { config.finisher_knockback } else { config.knockback };
        victim.vx += dir * force;

        let victim_side = victim.side;
        let victim_x = victim.x;
        let victim_y = victim.y;
        let knocked_out = victim.health == 0;

        debug!(?attacker, ?kind, finisher, health = victim.health, "hit landed");

        self.queue_sound(kind);
        self.push_event(BoutEvent::CameraShake { ticks: 12, strength: 5.0 });
        self.push_event(BoutEvent::HitLanded {
            attacker,
            victim: victim_side,
            kind,
            finisher,
        });
        if knocked_out {
            info!(victim = ?victim_side, "knockout");
            self.push_event(BoutEvent::Knockout { victim: victim_side });
        }

        // High hits splatter; finishers splatter ten-fold, with most of
        // the extra particles thrown at the viewer.
        if kind == DamageKind::High {
            let mut count = config.burst_base + self.rng.gen_range(0..4);
            if finisher {
                count *= 10;
            }
            for _ in 0..count {
                let spawn_y = victim_y - 70.0 + (self.rng.gen::<f64>() * 20.0 - 10.0);
                let to_screen = finisher && self.rng.gen::<f64>() < 0.6;
                let particle = Particle::scatter(victim_x, spawn_y, dir, to_screen, &mut self.rng);
                self.particles.push(particle);
            }
        }
    }

    // =========================================================================
    // Transients and outcome
    // =========================================================================

    /// Release `side`'s prop at their current position.
    pub fn release_prop(&mut self, side: Side) {
        let fighter = self.fighter(side);
        let x = fighter.x + if side == Side::A { -20.0 } else { 20.0 };
        let y = fighter.y + 60.0;
        self.props.push(Prop::new(side, x, y));
        self.push_event(BoutEvent::PropReleased { side, x, y });
    }

    /// Advance particles and props by one tick, dropping spent particles.
    pub fn update_transients(&mut self) {
        let rng = &mut self.rng;
        for particle in &mut self.particles {
            particle.update(rng);
        }
        self.particles.retain(|p| !p.dead);

        let mut landed = false;
        for prop in &mut self.props {
            landed |= prop.update();
        }
        if landed {
            self.prop_landed = true;
        }
    }

    /// Drop every transient entity (playback renders recorded ones through
    /// the presentation pool instead).
    pub fn clear_transients(&mut self) {
        self.particles.clear();
        self.props.clear();
    }

    /// Decide the bout and run the post-KO choreography timers.
    pub fn check_game_over(&mut self, config: &BoutConfig) {
        if !self.game_over {
            let a_out = matches!(
                self.fighters[0].state,
                CombatState::Down | CombatState::Falling
            );
            let b_out = matches!(
                self.fighters[1].state,
                CombatState::Down | CombatState::Falling
            );

            let winner = if a_out {
                Some(Side::B)
            } else if b_out {
                Some(Side::A)
            } else {
                None
            };

            if let Some(winner) = winner {
                self.game_over = true;
                self.winner = Some(winner);
                info!(?winner, tick = self.tick, "bout decided");
                self.push_event(BoutEvent::BoutEnded { winner });
            }
        }

        if self.game_over {
            self.ko_ticks = self.ko_ticks.saturating_add(1);

            if !self.victory_triggered && self.ko_ticks > config.victory_delay_ticks {
                if let Some(winner) = self.winner {
                    self.victory_triggered = true;
                    self.fighter_mut(winner).enter_state(CombatState::Victory);
                }
            }
        }
    }

}
