//! Peer Protocol Messages
//!
//! Wire format for the two-peer sync link. Tagged JSON for debugging
//! ease, with binary (bincode) helpers on the flat payload structs for
//! transports that want them. There are no sequence numbers and no
//! acknowledgements: the protocol leans entirely on a reliable, ordered
//! transport.

use serde::{Serialize, Deserialize};

use crate::game::states::{CombatState, DamageKind};

/// Messages exchanged between the two peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum PeerMessage {
    /// Full state of the sender's authoritative fighter, broadcast every
    /// live tick.
    #[serde(rename = "SYNC")]
    Sync(SyncPayload),

    /// The sender's fighter landed a damage hit; apply it to the victim.
    #[serde(rename = "HIT")]
    Hit(HitPayload),

    /// Reset the bout unconditionally.
    #[serde(rename = "RESTART")]
    Restart {},
}

/// Full authoritative state of one fighter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPayload {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Horizontal velocity.
    pub vx: f64,
    /// Current state tag.
    pub state: CombatState,
    /// Facing toward +x.
    pub facing_right: bool,
    /// Current health.
    pub health: u8,
}

/// A damage hit claim. Trusted without validation: each peer is the sole
/// authority for hits its own fighter lands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPayload {
    /// High or low.
    pub damage_type: DamageKind,
    /// True when side A is the victim.
    pub target_is_a: bool,
}

impl PeerMessage {
    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from the JSON wire format.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl SyncPayload {
    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_json_wire_shape() {
        let msg = PeerMessage::Sync(SyncPayload {
            x: 250.0,
            y: 250.0,
            vx: -1.5,
            state: CombatState::AttackHigh,
            facing_right: true,
            health: 4,
        });

        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"SYNC\""));
        assert!(json.contains("\"facingRight\":true"));
        assert!(json.contains("\"attack_high\""));

        let parsed = PeerMessage::from_json(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn test_hit_json_wire_shape() {
        let msg = PeerMessage::Hit(HitPayload {
            damage_type: DamageKind::Low,
            target_is_a: false,
        });

        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"HIT\""));
        assert!(json.contains("\"damageType\":\"low\""));
        assert!(json.contains("\"targetIsA\":false"));

        assert_eq!(PeerMessage::from_json(&json).unwrap(), msg);
    }

    #[test]
    fn test_restart_round_trip() {
        let msg = PeerMessage::Restart {};
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"RESTART\""));
        assert_eq!(PeerMessage::from_json(&json).unwrap(), msg);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(PeerMessage::from_json("{\"type\":\"WARP\"}").is_err());
        assert!(PeerMessage::from_json("not json").is_err());
    }

    #[test]
    fn test_sync_payload_binary_round_trip() {
        let payload = SyncPayload {
            x: 1.0,
            y: 2.0,
            vx: 3.0,
            state: CombatState::Held,
            facing_right: false,
            health: 2,
        };
        let bytes = payload.to_bytes().unwrap();
        let back = SyncPayload::from_bytes(&bytes).unwrap();
        assert_eq!(back, payload);
    }
}
