//! Replay Snapshots
//!
//! One snapshot per live tick: everything the presentation layer needs to
//! show that tick again, and nothing the authoritative simulation needs.
//! Snapshots are immutable once captured.

use serde::{Serialize, Deserialize};

use crate::game::bout::{Bout, CameraPose};
use crate::game::effects::EntityKind;
use crate::game::fighter::{Fighter, Side};
use crate::game::states::{CombatState, DamageKind};

/// Presentation state of one fighter at capture time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FighterSnapshot {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// State tag.
    pub state: CombatState,
    /// Sub-frame the state was on.
    pub sub_frame: usize,
    /// Facing toward +x.
    pub facing_right: bool,
    /// Health at capture time.
    pub health: u8,
    /// Presentation visibility.
    pub visible: bool,
}

impl FighterSnapshot {
    /// Capture a fighter's presentation state.
    pub fn capture(fighter: &Fighter) -> Self {
        Self {
            x: fighter.x,
            y: fighter.y,
            state: fighter.state,
            sub_frame: fighter.sub_frame,
            facing_right: fighter.facing_right,
            health: fighter.health,
            visible: fighter.visible,
        }
    }

    /// Restore this snapshot onto a fighter. Presentation only: the state
    /// cursor is parked, and transition guards are bypassed.
    pub fn apply_to(&self, fighter: &mut Fighter) {
        fighter.x = self.x;
        fighter.y = self.y;
        fighter.facing_right = self.facing_right;
        fighter.health = self.health;
        fighter.visible = self.visible;
        fighter.apply_presentation(self.state, self.sub_frame);
    }
}

/// One transient entity at capture time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// What was on stage.
    pub kind: EntityKind,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Presentation scale.
    pub scale: f64,
    /// Tint, for entities that carry one.
    pub color: Option<[u8; 3]>,
    /// Z-order.
    pub z: i32,
    /// Owning side, for props.
    pub side: Option<Side>,
}

/// Full presentation state of one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Side A fighter.
    pub a: FighterSnapshot,
    /// Side B fighter.
    pub b: FighterSnapshot,
    /// Camera pose that tick.
    pub camera: CameraPose,
    /// Every transient entity on stage that tick.
    pub entities: Vec<EntitySnapshot>,
    /// Sounds fired since the previous capture, in order.
    pub sounds: Vec<DamageKind>,
}

impl Snapshot {
    /// Capture the bout's presentation state. `sounds` is the queue drained
    /// for this tick.
    pub fn capture(bout: &Bout, sounds: Vec<DamageKind>) -> Self {
        let mut entities = Vec::with_capacity(bout.particles.len() + bout.props.len());

        for particle in &bout.particles {
            entities.push(EntitySnapshot {
                kind: EntityKind::Burst,
                x: particle.x,
                y: particle.y,
                scale: particle.scale,
                color: Some(particle.color),
                z: particle.z,
                side: None,
            });
        }
        for prop in &bout.props {
            entities.push(EntitySnapshot {
                kind: EntityKind::Prop,
                x: prop.x,
                y: prop.y,
                scale: prop.scale,
                color: None,
                z: prop.z,
                side: Some(prop.side),
            });
        }

        Self {
            a: FighterSnapshot::capture(&bout.fighters[0]),
            b: FighterSnapshot::capture(&bout.fighters[1]),
            camera: bout.camera,
            entities,
            sounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::BoutConfig;
    use crate::game::fighter::ControlMode;

    #[test]
    fn test_capture_and_restore_round_trip() {
        let cfg = BoutConfig::default();
        let mut bout = Bout::new(&cfg, [ControlMode::Local, ControlMode::Local], 1);
        bout.fighters[0].x = 321.0;
        bout.fighters[0].enter_state(CombatState::AttackLow);
        bout.fighters[0].health = 2;

        let snap = Snapshot::capture(&bout, vec![DamageKind::Low]);
        assert_eq!(snap.a.x, 321.0);
        assert_eq!(snap.a.state, CombatState::AttackLow);
        assert_eq!(snap.sounds, vec![DamageKind::Low]);

        let mut other = Fighter::new(Side::A, 0.0, 0.0, ControlMode::Local, 5);
        snap.a.apply_to(&mut other);
        assert_eq!(other.x, 321.0);
        assert_eq!(other.state, CombatState::AttackLow);
        assert_eq!(other.health, 2);
        assert_eq!(other.sub_frame, snap.a.sub_frame);
    }

    #[test]
    fn test_capture_lists_transients() {
        let cfg = BoutConfig::default();
        let mut bout = Bout::new(&cfg, [ControlMode::Local, ControlMode::Local], 1);
        bout.release_prop(Side::B);

        let snap = Snapshot::capture(&bout, Vec::new());
        assert_eq!(snap.entities.len(), 1);
        assert_eq!(snap.entities[0].kind, EntityKind::Prop);
        assert_eq!(snap.entities[0].side, Some(Side::B));
    }

    #[test]
    fn test_restore_clamps_sub_frame() {
        let snap = FighterSnapshot {
            x: 0.0,
            y: 0.0,
            state: CombatState::Ready,
            sub_frame: 99,
            facing_right: true,
            health: 5,
            visible: true,
        };
        let mut f = Fighter::new(Side::A, 0.0, 0.0, ControlMode::Local, 5);
        snap.apply_to(&mut f);
        assert_eq!(f.sub_frame, 0);
    }
}
