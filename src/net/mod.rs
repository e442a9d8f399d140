//! Peer Synchronization
//!
//! State replication between the two instances of a networked bout.
//!
//! ## Module Structure
//!
//! - `protocol`: Wire message types (SYNC / HIT / RESTART)
//! - `channel`: Reliable ordered channel abstraction + in-memory loopback
//! - `transport`: WebSocket implementation of the channel
//! - `sync`: Applying inbound traffic to the mirrored fighter

pub mod protocol;
pub mod channel;
pub mod transport;
pub mod sync;

// Re-export key types
pub use protocol::{PeerMessage, SyncPayload, HitPayload};
pub use channel::{ChannelError, ChannelEvent, MessageChannel, LoopbackChannel, loopback_pair};
pub use transport::{PeerListener, SocketChannel};
