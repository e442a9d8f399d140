//! Combat Simulation
//!
//! The tick-driven fighting core. Everything here runs single-threaded
//! at a fixed rate; rendering, input devices, and audio are collaborators
//! that sit outside the crate.
//!
//! ## Module Structure
//!
//! - `config`: Tuning constants with shipped-balance defaults
//! - `states`: Static state timing tables and hit windows
//! - `fighter`: Per-fighter combat state machine
//! - `intent`: Boolean per-tick input intents
//! - `ai`: Rule-based CPU opponent
//! - `effects`: Transient particles and props
//! - `bout`: One restart-to-restart match state
//! - `events`: Typed event outbox and published status frame
//! - `tick`: The fixed-tick match driver

pub mod config;
pub mod states;
pub mod fighter;
pub mod intent;
pub mod ai;
pub mod effects;
pub mod bout;
pub mod events;
pub mod tick;

// Re-export key types
pub use config::BoutConfig;
pub use states::{CombatState, DamageKind, HitKind, StateDef};
pub use fighter::{ControlMode, Fighter, Side};
pub use intent::{IntentFrame, IntentSource, ScriptedIntents};
pub use bout::{Bout, CameraPose};
pub use events::{BoutEvent, ConnectionStatus, StatusFrame};
pub use tick::{MatchDriver, SessionRole, TickOutput};
