//! WebSocket Peer Transport
//!
//! The real [`MessageChannel`] implementation: a single WebSocket link
//! between exactly two peers. The host binds and accepts one connection;
//! the client dials. A reader task queues inbound frames and a writer
//! task drains outbound ones, so the synchronous tick loop never touches
//! the socket directly.

use std::net::SocketAddr;
use std::sync::mpsc as sync_mpsc;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, connect_async, tungstenite::Message, WebSocketStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::net::channel::{ChannelError, ChannelEvent, MessageChannel};
use crate::net::protocol::PeerMessage;

/// Waiting side of a peer link. Binds immediately; the link itself is
/// established by [`accept`](Self::accept), which admits exactly one peer.
pub struct PeerListener {
    listener: TcpListener,
    addr: SocketAddr,
}

impl PeerListener {
    /// Bind the listening socket.
    pub async fn bind(addr: SocketAddr) -> Result<Self, ChannelError> {
        let listener = TcpListener::bind(addr).await.map_err(ChannelError::Bind)?;
        let addr = listener.local_addr().map_err(ChannelError::Bind)?;
        info!(%addr, "waiting for peer");
        Ok(Self { listener, addr })
    }

    /// The bound address (useful when binding port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Accept the peer and complete the WebSocket handshake. Consumes the
    /// listener: a session has exactly one peer, so there is nothing to
    /// keep listening for.
    pub async fn accept(self) -> Result<SocketChannel, ChannelError> {
        let (stream, peer_addr) = self.listener.accept().await.map_err(ChannelError::Accept)?;
        let ws = accept_async(stream).await?;
        info!(%peer_addr, "peer connected");
        Ok(SocketChannel::spawn(ws))
    }
}

/// One end of an established WebSocket peer link.
pub struct SocketChannel {
    /// Link identifier for log correlation.
    id: Uuid,
    outbound: mpsc::UnboundedSender<PeerMessage>,
    inbound: sync_mpsc::Receiver<ChannelEvent>,
    disconnect_reported: bool,
}

impl SocketChannel {
    /// Dial the host at `url` (e.g. `ws://127.0.0.1:9800`).
    pub async fn dial(url: &str) -> Result<Self, ChannelError> {
        let (ws, _) = connect_async(url).await?;
        info!(url, "connected to peer");
        Ok(Self::spawn(ws))
    }

    fn spawn<S>(ws: WebSocketStream<S>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let id = Uuid::new_v4();
        let (mut sink, mut stream) = ws.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<PeerMessage>();
        let (in_tx, in_rx) = sync_mpsc::channel::<ChannelEvent>();

        // Writer task: serialize and push queued messages until the socket
        // or the channel goes away.
        let writer_id = id;
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let text = match msg.to_json() {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(link = %writer_id, error = %e, "failed to serialize message");
                        continue;
                    }
                };
                if sink.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            // The queue only closes when the owning channel is dropped;
            // complete the close handshake so the peer sees a clean
            // disconnect instead of a stalled socket.
            let _ = sink.close().await;
            debug!(link = %writer_id, "writer task finished");
        });

        // Reader task: parse inbound frames onto the drain queue. Malformed
        // frames are dropped; close or error is terminal.
        tokio::spawn(async move {
            loop {
                match stream.next().await {
                    Some(Ok(Message::Text(text))) => match PeerMessage::from_json(&text) {
                        Ok(msg) => {
                            if in_tx.send(ChannelEvent::Message(msg)).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(link = %id, error = %e, "dropping malformed peer frame");
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        info!(link = %id, "peer link closed");
                        let _ = in_tx.send(ChannelEvent::Disconnected);
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(link = %id, error = %e, "peer link failed");
                        let _ = in_tx.send(ChannelEvent::Disconnected);
                        break;
                    }
                    // Pings, pongs, and raw binary frames carry no protocol
                    // traffic.
                    Some(Ok(_)) => {}
                }
            }
        });

        Self { id, outbound: out_tx, inbound: in_rx, disconnect_reported: false }
    }

    /// Link identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl MessageChannel for SocketChannel {
    fn send(&mut self, msg: &PeerMessage) {
        // A dead writer task means the link is down; the reader surfaces
        // that through the drain.
        let _ = self.outbound.send(msg.clone());
    }

    fn drain(&mut self) -> Vec<ChannelEvent> {
        let mut events = Vec::new();
        loop {
            match self.inbound.try_recv() {
                Ok(ChannelEvent::Disconnected) => {
                    if !self.disconnect_reported {
                        self.disconnect_reported = true;
                        events.push(ChannelEvent::Disconnected);
                    }
                    break;
                }
                Ok(event) => events.push(event),
                Err(sync_mpsc::TryRecvError::Empty) => break,
                Err(sync_mpsc::TryRecvError::Disconnected) => {
                    if !self.disconnect_reported {
                        self.disconnect_reported = true;
                        events.push(ChannelEvent::Disconnected);
                    }
                    break;
                }
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::game::states::{CombatState, DamageKind};
    use crate::net::protocol::{HitPayload, SyncPayload};

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

    async fn connected_pair() -> (SocketChannel, SocketChannel) {
        let listener = PeerListener::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let addr = listener.local_addr();
        let host = tokio::spawn(listener.accept());
        let client = SocketChannel::dial(&format!("ws://{addr}")).await.unwrap();
        let host = host.await.unwrap().unwrap();
        (host, client)
    }

    async fn drain_until(channel: &mut SocketChannel, count: usize) -> Vec<ChannelEvent> {
        let mut events = Vec::new();
        for _ in 0..200 {
            events.extend(channel.drain());
            if events.len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        events
    }

    #[tokio::test]
    async fn test_messages_cross_the_link_in_order() {
        let (mut host, mut client) = connected_pair().await;

        host.send(&sync(1.0));
        host.send(&PeerMessage::Hit(HitPayload {
            damage_type: DamageKind::High,
            target_is_a: false,
        }));
        host.send(&sync(2.0));

        let events = drain_until(&mut client, 3).await;
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], ChannelEvent::Message(PeerMessage::Sync(p)) if p.x == 1.0));
        assert!(matches!(events[1], ChannelEvent::Message(PeerMessage::Hit(_))));
        assert!(matches!(events[2], ChannelEvent::Message(PeerMessage::Sync(p)) if p.x == 2.0));

        client.send(&PeerMessage::Restart {});
        let events = drain_until(&mut host, 1).await;
        assert!(matches!(events[0], ChannelEvent::Message(PeerMessage::Restart {})));
    }

    #[tokio::test]
    async fn test_peer_drop_is_terminal_and_reported_once() {
        let (host, mut client) = connected_pair().await;
        drop(host);

        let events = drain_until(&mut client, 1).await;
        assert_eq!(events, vec![ChannelEvent::Disconnected]);
        assert!(client.drain().is_empty(), "disconnect reports only once");
    }

    #[tokio::test]
    async fn test_dial_to_nowhere_fails_once() {
        let result = SocketChannel::dial("ws://127.0.0.1:1").await;
        assert!(matches!(result, Err(ChannelError::Connect(_))));
    }
}
