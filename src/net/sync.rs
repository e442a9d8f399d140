//! Mirror State Application
//!
//! Applies inbound peer traffic to the locally-mirrored fighter. The
//! remote peer is the sole authority for its own fighter and for hits
//! that fighter lands; nothing here re-validates a claim, it just
//! replays the sender's outcome onto local state.

use crate::game::bout::Bout;
use crate::game::config::BoutConfig;
use crate::game::fighter::{Fighter, Side};
use crate::net::protocol::{HitPayload, SyncPayload};

/// Build the SYNC payload for this instance's authoritative fighter.
pub fn sync_from(fighter: &Fighter) -> SyncPayload {
    SyncPayload {
        x: fighter.x,
        y: fighter.y,
        vx: fighter.vx,
        state: fighter.state,
        facing_right: fighter.facing_right,
        health: fighter.health,
    }
}

/// Overwrite the mirror with the remote peer's authoritative state.
///
/// A changed state tag forces a re-entry, so the mirror's animation
/// restarts from the new state and may skip whatever sub-frame the real
/// remote instance is on. Same-tag payloads leave the animation cursor
/// alone.
pub fn apply_sync(bout: &mut Bout, mirror: Side, payload: &SyncPayload) {
    let fighter = bout.fighter_mut(mirror);
    fighter.x = payload.x;
    fighter.y = payload.y;
    fighter.vx = payload.vx;
    fighter.facing_right = payload.facing_right;
    fighter.health = payload.health.min(fighter.max_health);
    fighter.enter_state(payload.state);
}

/// Apply a remote HIT claim: the full damage sequence runs against the
/// named victim, unconditionally.
pub fn apply_hit(bout: &mut Bout, payload: &HitPayload, config: &BoutConfig) {
    let victim = if payload.target_is_a { Side::A } else { Side::B };
    bout.apply_damage(victim.other(), payload.damage_type, config);
}
