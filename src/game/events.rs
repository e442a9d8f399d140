//! Bout Events and Published Status
//!
//! Side effects leave the simulation through two typed surfaces: a
//! per-tick event outbox (drained once per tick by whoever hosts the
//! simulation) and the status frame published to the presentation
//! collaborator.

use serde::{Serialize, Deserialize};

use crate::game::fighter::Side;
use crate::game::states::DamageKind;

// =============================================================================
// EVENT OUTBOX
// =============================================================================

/// Events generated during one simulation tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoutEvent {
    /// A fighter's intro released its prop.
    PropReleased {
        /// Owner of the prop.
        side: Side,
        /// Release x.
        x: f64,
        /// Release y.
        y: f64,
    },

    /// A damage hit connected.
    HitLanded {
        /// Who swung.
        attacker: Side,
        /// Who got hit.
        victim: Side,
        /// High or low.
        kind: DamageKind,
        /// The hit emptied the victim's health.
        finisher: bool,
    },

    /// A grab connected; the victim is held.
    Grabbed {
        /// Who grabbed.
        attacker: Side,
        /// Who is held.
        victim: Side,
    },

    /// A fighter ran out of health and is going down.
    Knockout {
        /// The fighter going down.
        victim: Side,
    },

    /// The bout ended.
    BoutEnded {
        /// The side left standing.
        winner: Side,
    },

    /// Ask the camera collaborator for a shake.
    CameraShake {
        /// Shake duration in ticks.
        ticks: u32,
        /// Displacement amplitude.
        strength: f64,
    },
}

// =============================================================================
// PUBLISHED STATUS
// =============================================================================

/// Connection state reported to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No peer link.
    Disconnected,
    /// Link being established.
    Connecting,
    /// Peer link up.
    Connected,
}

/// Per-tick status published to the UI collaborator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusFrame {
    /// Side A health.
    pub health_a: u8,
    /// Side B health.
    pub health_b: u8,
    /// Side A state label.
    pub state_a: &'static str,
    /// Side B state label.
    pub state_b: &'static str,
    /// The bout is decided.
    pub game_over: bool,
    /// Delayed game-over card, raised once the KO choreography has played.
    pub show_game_over: bool,
    /// Winning side, if decided.
    pub winner: Option<Side>,
    /// Replay playback is active.
    pub replaying: bool,
    /// Playback position in [0, 1].
    pub replay_progress: f64,
    /// Playback speed in frames per tick.
    pub replay_speed: i32,
    /// A peer channel is attached.
    pub multiplayer: bool,
    /// Peer link state.
    pub connection: ConnectionStatus,
    /// This instance owns side A.
    pub is_host: bool,
    /// The remote peer went away mid-bout.
    pub opponent_disconnected: bool,
}
