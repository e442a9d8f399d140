//! Match Driver
//!
//! The fixed-tick orchestrator. One [`MatchDriver`] owns everything a
//! match session needs: the bout, the replay deck, the optional peer
//! channel, and the CPU policies. Subsystems receive explicit references
//! from it each tick; there is no ambient state.
//!
//! Live simulation and replay playback are mutually exclusive modes, and
//! [`toggle_replay`](MatchDriver::toggle_replay) is the sole switch
//! point. While replaying, only the replay deck advances; the
//! authoritative simulation is suspended entirely, so live state cannot
//! drift behind the presentation.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::game::ai::CpuPolicy;
use crate::game::bout::{Bout, CameraPose};
use crate::game::config::BoutConfig;
use crate::game::events::{BoutEvent, ConnectionStatus, StatusFrame};
use crate::game::fighter::{ControlMode, Side};
use crate::game::intent::IntentFrame;
use crate::game::states::DamageKind;
use crate::net::channel::{ChannelEvent, MessageChannel};
use crate::net::protocol::{HitPayload, PeerMessage};
use crate::net::sync;
use crate::replay::playback::{ReplayDeck, ReplaySpeed};
use crate::replay::snapshot::Snapshot;

// =============================================================================
// SESSION ROLE
// =============================================================================

/// Which end of the session this instance is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionRole {
    /// Everything simulated on this instance; no peer link.
    Offline,
    /// Owns side A; side B mirrors the remote peer.
    Host,
    /// Owns side B; side A mirrors the remote peer.
    Client,
}

impl SessionRole {
    /// The side this instance is authoritative for. `Offline` sessions
    /// report side A (they are authoritative for both).
    pub fn local_side(self) -> Side {
        match self {
            SessionRole::Client => Side::B,
            _ => Side::A,
        }
    }

    /// This instance owns side A.
    pub fn is_host(self) -> bool {
        self != SessionRole::Client
    }
}

// =============================================================================
// TICK OUTPUT
// =============================================================================

/// What one driver tick hands to the collaborators.
#[derive(Debug)]
pub struct TickOutput {
    /// Typed side effects generated this tick, drained once.
    pub events: Vec<BoutEvent>,
    /// One-shot sounds for the audio collaborator: freshly queued ones
    /// while live, recorded ones re-fired by forward playback.
    pub sounds: Vec<DamageKind>,
    /// Status frame for the presentation collaborator.
    pub status: StatusFrame,
}

// =============================================================================
// MATCH DRIVER
// =============================================================================

/// Owns and orchestrates one match session.
pub struct MatchDriver {
    config: BoutConfig,
    bout: Bout,
    deck: ReplayDeck,
    channel: Option<Box<dyn MessageChannel>>,
    role: SessionRole,
    cpu: [Option<CpuPolicy>; 2],
    replaying: bool,
    connection: ConnectionStatus,
    opponent_disconnected: bool,
    seed: u64,
    restarts: u64,
    rng: SmallRng,
}

impl MatchDriver {
    /// Single player against the CPU.
    pub fn solo(config: BoutConfig, difficulty: f64, seed: u64) -> Self {
        Self::build(
            config,
            SessionRole::Offline,
            None,
            [ControlMode::Local, ControlMode::Cpu],
            [None, Some(CpuPolicy::new(difficulty))],
            seed,
        )
    }

    /// Two local players sharing this instance.
    pub fn local_versus(config: BoutConfig, seed: u64) -> Self {
        Self::build(
            config,
            SessionRole::Offline,
            None,
            [ControlMode::Local, ControlMode::Local],
            [None, None],
            seed,
        )
    }

    /// CPU against CPU, for headless exhibitions and soak tests.
    pub fn exhibition(config: BoutConfig, difficulty_a: f64, difficulty_b: f64, seed: u64) -> Self {
        Self::build(
            config,
            SessionRole::Offline,
            None,
            [ControlMode::Cpu, ControlMode::Cpu],
            [Some(CpuPolicy::new(difficulty_a)), Some(CpuPolicy::new(difficulty_b))],
            seed,
        )
    }

    /// Networked session owning side A. The channel must already be
    /// established; a failed setup is the caller's to surface.
    pub fn host(config: BoutConfig, channel: Box<dyn MessageChannel>, seed: u64) -> Self {
        Self::build(
            config,
            SessionRole::Host,
            Some(channel),
            [ControlMode::Local, ControlMode::Mirrored],
            [None, None],
            seed,
        )
    }

    /// Networked session owning side B.
    pub fn client(config: BoutConfig, channel: Box<dyn MessageChannel>, seed: u64) -> Self {
        Self::build(
            config,
            SessionRole::Client,
            Some(channel),
            [ControlMode::Mirrored, ControlMode::Local],
            [None, None],
            seed,
        )
    }

    fn build(
        config: BoutConfig,
        role: SessionRole,
        channel: Option<Box<dyn MessageChannel>>,
        controls: [ControlMode; 2],
        cpu: [Option<CpuPolicy>; 2],
        seed: u64,
    ) -> Self {
        let connection = if channel.is_some() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        };

        Self {
            bout: Bout::new(&config, controls, seed),
            config,
            deck: ReplayDeck::new(),
            channel,
            role,
            cpu,
            replaying: false,
            connection,
            opponent_disconnected: false,
            seed,
            restarts: 0,
            // Decision rolls come from their own stream so CPU cadence and
            // effect scatter stay independently reproducible.
            rng: SmallRng::seed_from_u64(!seed),
        }
    }

    /// The current bout.
    pub fn bout(&self) -> &Bout {
        &self.bout
    }

    /// The replay deck.
    pub fn deck(&self) -> &ReplayDeck {
        &self.deck
    }

    /// This instance's session role.
    pub fn role(&self) -> SessionRole {
        self.role
    }

    /// The tuning constants this session runs with.
    pub fn config(&self) -> &BoutConfig {
        &self.config
    }

    /// Replay playback is active.
    pub fn replaying(&self) -> bool {
        self.replaying
    }

    // =========================================================================
    // The tick
    // =========================================================================

    /// Advance the session by one fixed tick.
    ///
    /// `intents` carries this tick's sampled input per side; only sides
    /// under [`ControlMode::Local`] read theirs. In replay mode the whole
    /// live pipeline is skipped and only the deck advances.
    pub fn advance(&mut self, intents: [IntentFrame; 2]) -> TickOutput {
        if self.replaying {
            let sounds = self.deck.update(&mut self.bout);
            return TickOutput { events: Vec::new(), sounds, status: self.status() };
        }

        self.drain_channel();
        self.bout.tick += 1;

        for side in [Side::A, Side::B] {
            self.advance_fighter(side, intents[side.index()]);
        }

        self.bout.update_transients();
        self.bout.check_game_over(&self.config);

        // Capture for replay until the post-KO grace runs out. The sound
        // queue is drained per capture and rides along to the audio
        // collaborator either way.
        let sounds = self.bout.take_sounds();
        if !self.bout.game_over || self.bout.ko_ticks <= self.config.record_grace_ticks {
            self.deck.record(Snapshot::capture(&self.bout, sounds.clone()));
        }

        // Dead-reckoning broadcast: full state of our own fighter, every
        // tick, unconditionally.
        if self.channel.is_some() {
            let payload = sync::sync_from(self.bout.fighter(self.role.local_side()));
            self.send(PeerMessage::Sync(payload));
        }

        TickOutput { events: self.bout.take_events(), sounds, status: self.status() }
    }

    fn advance_fighter(&mut self, side: Side, intent: IntentFrame) {
        let control = self.bout.fighter(side).control;

        if control == ControlMode::Mirrored {
            // Position, velocity, and state tag come from SYNC; only the
            // animation cursor runs locally. Hits arrive as HIT claims and
            // are never resolved here.
            let state_tick = self.bout.fighter_mut(side).advance_state();
            if state_tick.effect {
                self.bout.release_prop(side);
            }
            return;
        }

        let intent = match control {
            ControlMode::Cpu => self.decide_cpu(side),
            _ => intent,
        };

        let opponent_x = self.bout.fighter(side.other()).x;
        let fighter = self.bout.fighter_mut(side);
        fighter.apply_intent(intent, &self.config);
        fighter.apply_physics(&self.config);
        fighter.separate_and_face(opponent_x, &self.config);

        let state_tick = fighter.advance_state();
        if state_tick.effect {
            self.bout.release_prop(side);
        }
        if let Some(kind) = state_tick.hit_check {
            let landed = self.bout.resolve_hit(side, kind, &self.config);
            if landed {
                if let Some(damage) = kind.damage_kind() {
                    self.send(PeerMessage::Hit(HitPayload {
                        damage_type: damage,
                        target_is_a: side.other() == Side::A,
                    }));
                }
            }
        }
    }

    fn decide_cpu(&mut self, side: Side) -> IntentFrame {
        let Some(policy) = self.cpu[side.index()].as_mut() else {
            return IntentFrame::IDLE;
        };
        let me = self.bout.fighter(side);
        let opponent = self.bout.fighter(side.other());
        policy.decide(me, opponent, &self.config, &mut self.rng)
    }

    // =========================================================================
    // Peer traffic
    // =========================================================================

    fn drain_channel(&mut self) {
        let Some(channel) = self.channel.as_mut() else {
            return;
        };

        let events = channel.drain();
        for event in events {
            match event {
                ChannelEvent::Message(PeerMessage::Sync(payload)) => {
                    sync::apply_sync(&mut self.bout, self.role.local_side().other(), &payload);
                }
                ChannelEvent::Message(PeerMessage::Hit(payload)) => {
                    sync::apply_hit(&mut self.bout, &payload, &self.config);
                }
                ChannelEvent::Message(PeerMessage::Restart {}) => {
                    info!("peer requested restart");
                    self.reset_bout();
                }
                ChannelEvent::Disconnected => {
                    warn!("peer link lost; bout is over");
                    self.connection = ConnectionStatus::Disconnected;
                    self.opponent_disconnected = true;
                    self.bout.game_over = true;
                }
            }
        }
    }

    fn send(&mut self, msg: PeerMessage) {
        if let Some(channel) = self.channel.as_mut() {
            channel.send(&msg);
        }
    }

    // =========================================================================
    // Session control
    // =========================================================================

    /// Restart the match: tell the peer, then reset locally. Simultaneous
    /// restarts from both peers are idempotent; whichever reset lands last
    /// wins and both end up with a fresh bout.
    pub fn restart(&mut self) {
        self.send(PeerMessage::Restart {});
        self.reset_bout();
    }

    fn reset_bout(&mut self) {
        self.restarts += 1;
        let controls = [self.bout.fighters[0].control, self.bout.fighters[1].control];
        self.bout = Bout::new(&self.config, controls, self.seed.wrapping_add(self.restarts));
        self.deck = ReplayDeck::new();
        self.replaying = false;
    }

    /// Feed the framing collaborator's camera pose into the bout so it is
    /// captured with each snapshot. Ignored during playback, where the
    /// camera comes from the recorded frames.
    pub fn set_camera(&mut self, pose: CameraPose) {
        if !self.replaying {
            self.bout.camera = pose;
        }
    }

    // =========================================================================
    // Replay control surface
    // =========================================================================

    /// Switch between live simulation and replay playback.
    ///
    /// Turning playback on suspends the authoritative simulation and
    /// rewinds the deck; turning it off re-applies the final buffered
    /// frame and live simulation resumes from exactly where it stopped.
    /// Toggling on with an empty deck is a no-op.
    pub fn toggle_replay(&mut self) {
        if self.replaying {
            self.deck.apply_last(&mut self.bout);
            self.replaying = false;
            info!("replay ended; live simulation resumed");
        } else if !self.deck.is_empty() {
            self.bout.clear_transients();
            self.deck.begin_playback();
            self.replaying = true;
            info!(frames = self.deck.len(), "replay started");
        }
    }

    /// Set the playback speed. Ignored while live.
    pub fn set_replay_speed(&mut self, speed: ReplaySpeed) {
        if self.replaying {
            self.deck.set_speed(speed);
        }
    }

    /// Seek playback to a fraction of the buffer. Ignored while live.
    pub fn seek_replay(&mut self, percent: f64) {
        if self.replaying {
            self.deck.seek_to(percent);
        }
    }

    // =========================================================================
    // Published status
    // =========================================================================

    /// Build the per-tick status frame for the presentation collaborator.
    pub fn status(&self) -> StatusFrame {
        StatusFrame {
            health_a: self.bout.fighters[0].health,
            health_b: self.bout.fighters[1].health,
            state_a: self.bout.fighters[0].state.label(),
            state_b: self.bout.fighters[1].state.label(),
            game_over: self.bout.game_over,
            show_game_over: self.bout.game_over
                && self.bout.ko_ticks > self.config.show_game_over_ticks,
            winner: self.bout.winner,
            replaying: self.replaying,
            replay_progress: self.deck.progress(),
            replay_speed: self.deck.speed().as_i32(),
            multiplayer: self.channel.is_some(),
            connection: self.connection,
            is_host: self.role.is_host(),
            opponent_disconnected: self.opponent_disconnected,
        }
    }
}
