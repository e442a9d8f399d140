//! # Glovework
//!
//! Tick-driven two-fighter brawl simulation with a scrubbable replay
//! buffer and peer-to-peer state synchronization.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         GLOVEWORK                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  game/           - Combat simulation                         │
//! │  ├── states.rs   - Static state timing tables + hit windows  │
//! │  ├── fighter.rs  - Per-fighter combat state machine          │
//! │  ├── intent.rs   - Per-tick boolean input intents            │
//! │  ├── ai.rs       - Rule-based CPU opponent                   │
//! │  ├── effects.rs  - Transient particles and props             │
//! │  ├── bout.rs     - One restart-to-restart match state        │
//! │  ├── events.rs   - Typed outbox + published status frame     │
//! │  └── tick.rs     - Fixed-tick match driver                   │
//! │                                                              │
//! │  replay/         - Recording and scrubbing                   │
//! │  ├── snapshot.rs - Immutable per-tick presentation captures  │
//! │  ├── playback.rs - Buffer, fractional cursor, speed control  │
//! │  └── pool.rs     - Reusable presentation handles             │
//! │                                                              │
//! │  net/            - Peer synchronization                      │
//! │  ├── protocol.rs - SYNC / HIT / RESTART wire messages        │
//! │  ├── channel.rs  - Ordered channel abstraction + loopback    │
//! │  ├── transport.rs- WebSocket peer link                       │
//! │  └── sync.rs     - Mirror state application                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Authority Model
//!
//! Each peer simulates exactly one fighter and mirrors the other. The
//! owner's full state crosses the wire every tick (dead reckoning over a
//! reliable, ordered transport — no sequence numbers, no acks), and hits
//! a fighter lands are resolved only on its owning instance, then
//! replayed on the peer from a HIT claim. Replay playback freezes the
//! authoritative simulation entirely, so scrubbing can never tear live
//! state.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod game;
pub mod replay;
pub mod net;

// Re-export commonly used types
pub use game::{
    Bout, BoutConfig, BoutEvent, CombatState, ConnectionStatus, ControlMode, DamageKind,
    Fighter, IntentFrame, MatchDriver, SessionRole, Side, StatusFrame, TickOutput,
};
pub use net::{ChannelError, MessageChannel, PeerMessage};
pub use replay::{ReplayDeck, ReplaySpeed, Snapshot};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
