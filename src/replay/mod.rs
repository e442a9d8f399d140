//! Replay Recording and Playback
//!
//! Per-tick snapshots captured during live play, and the scrub-capable
//! playback cursor that drives presentation while the authoritative
//! simulation is suspended.
//!
//! ## Module Structure
//!
//! - `snapshot`: Immutable per-tick presentation captures
//! - `playback`: Append-only buffer, cursor, and speed control
//! - `pool`: Reusable presentation handles for recorded transients

pub mod snapshot;
pub mod playback;
pub mod pool;

// Re-export key types
pub use snapshot::{EntitySnapshot, FighterSnapshot, Snapshot};
pub use playback::{ReplayDeck, ReplaySpeed};
pub use pool::{PresentationPool, StageHandle};
