//! Peer Channel Abstraction
//!
//! A reliable, ordered, bidirectional message link between exactly two
//! peers. Delivery is decoupled from the tick loop: implementations queue
//! inbound traffic and the simulation drains it between ticks, so nothing
//! mutates mid-tick.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

use crate::net::protocol::PeerMessage;

/// Errors raised while establishing a peer channel. Setup failures are
/// surfaced once to the caller; there are no retries.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The listening side failed to bind.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    /// The listening side failed to accept the peer's connection.
    #[error("failed to accept peer: {0}")]
    Accept(#[source] std::io::Error),

    /// The dial or WebSocket handshake failed.
    #[error("failed to reach peer: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Inbound channel activity, drained once per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// A message arrived.
    Message(PeerMessage),
    /// The transport closed or errored. Terminal; emitted at most once.
    Disconnected,
}

/// A reliable, ordered, bidirectional link to the other peer.
pub trait MessageChannel {
    /// Queue a message to the remote peer. Best-effort once the link is
    /// up; failures surface as a `Disconnected` drain event rather than an
    /// error here.
    fn send(&mut self, msg: &PeerMessage);

    /// Drain everything that arrived since the previous drain, in order.
    fn drain(&mut self) -> Vec<ChannelEvent>;
}

// =============================================================================
// IN-MEMORY LOOPBACK
// =============================================================================

/// One end of an in-memory channel pair. Used by tests and same-process
/// exhibitions; semantics match the real transport (ordered, reliable,
/// terminal disconnect).
#[derive(Debug)]
pub struct LoopbackChannel {
    tx: Sender<PeerMessage>,
    rx: Receiver<PeerMessage>,
    disconnected: bool,
    reported: bool,
}

/// Create both ends of a loopback link.
pub fn loopback_pair() -> (LoopbackChannel, LoopbackChannel) {
    let (tx_ab, rx_ab) = channel();
    let (tx_ba, rx_ba) = channel();
    (
        LoopbackChannel { tx: tx_ab, rx: rx_ba, disconnected: false, reported: false },
        LoopbackChannel { tx: tx_ba, rx: rx_ab, disconnected: false, reported: false },
    )
}

impl MessageChannel for LoopbackChannel {
    fn send(&mut self, msg: &PeerMessage) {
        if self.tx.send(msg.clone()).is_err() {
            self.disconnected = true;
        }
    }

    fn drain(&mut self) -> Vec<ChannelEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(msg) => events.push(ChannelEvent::Message(msg)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }
        if self.disconnected && !self.reported {
            self.reported = true;
            events.push(ChannelEvent::Disconnected);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::protocol::{HitPayload, SyncPayload};
    use crate::game::states::{CombatState, DamageKind};

    fn sync(x: f64) -> PeerMessage {
        PeerMessage::Sync(SyncPayload {
            x,
            y: 250.0,
            vx: 0.0,
            state: CombatState::Ready,
            facing_right: true,
            health: 5,
        })
    }

    #[test]
    fn test_loopback_delivers_in_order() {
        let (mut left, mut right) = loopback_pair();
        left.send(&sync(1.0));
        left.send(&PeerMessage::Hit(HitPayload {
            damage_type: DamageKind::High,
            target_is_a: false,
        }));
        left.send(&sync(2.0));

        let events = right.drain();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], ChannelEvent::Message(PeerMessage::Sync(p)) if p.x == 1.0));
        assert!(matches!(events[1], ChannelEvent::Message(PeerMessage::Hit(_))));
        assert!(matches!(events[2], ChannelEvent::Message(PeerMessage::Sync(p)) if p.x == 2.0));

        assert!(right.drain().is_empty(), "drained messages do not repeat");
    }

    #[test]
    fn test_disconnect_reported_exactly_once() {
        let (left, mut right) = loopback_pair();
        drop(left);

        let events = right.drain();
        assert_eq!(events, vec![ChannelEvent::Disconnected]);
        assert!(right.drain().is_empty());
    }

    #[test]
    fn test_messages_before_disconnect_still_arrive() {
        let (mut left, mut right) = loopback_pair();
        left.send(&PeerMessage::Restart {});
        drop(left);

        let events = right.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ChannelEvent::Message(PeerMessage::Restart {})));
        assert_eq!(events[1], ChannelEvent::Disconnected);
    }
}
