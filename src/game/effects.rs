//! Transient Visual Entities
//!
//! Simulation-side particles and props. Rendering is a collaborator
//! concern; these entities only carry (kind, position, scale, color,
//! z-order) plus enough motion state to advance each tick, and are
//! captured wholesale into replay snapshots.

use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Serialize, Deserialize};

use crate::game::fighter::Side;

/// Fixed tick duration in seconds.
const DT: f64 = 1.0 / 60.0;

/// Color of a freshly spawned burst particle.
pub const BURST_FRESH: [u8; 3] = [0xb9, 0x1c, 0x1c];
/// Color a burst particle dries to once it sticks.
pub const BURST_DRIED: [u8; 3] = [0x7f, 0x1d, 0x1d];

/// What a transient entity is, for snapshotting and presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Hit-burst particle.
    Burst,
    /// A dropped prop (one per fighter, released during the intro).
    Prop,
}

// =============================================================================
// BURST PARTICLES
// =============================================================================

/// One burst particle with simulated depth.
///
/// Ordinary particles splatter sideways, arc under gravity, and stick to
/// the floor or the back wall. Screen-directed particles (finisher bursts
/// only) fly toward the viewer, stick to the lens, and fade out.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Particle {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Presentation scale.
    pub scale: f64,
    /// Current color.
    pub color: [u8; 3],
    /// Z-order for the presentation layer.
    pub z: i32,
    /// Remaining opacity; only screen-stuck particles fade.
    pub opacity: f64,
    /// Finished fading; remove from the bout.
    pub dead: bool,

    vx: f64,
    vy: f64,
    depth: f64,
    depth_vel: f64,
    target_depth: f64,
    gravity: f64,
    floor_y: f64,
    landed: bool,
    screen_directed: bool,
}

impl Particle {
    /// Scatter a new particle from a hit at (`x`, `y`), thrown toward
    /// `direction` (+1 right, -1 left).
    pub fn scatter(x: f64, y: f64, direction: f64, screen_directed: bool, rng: &mut SmallRng) -> Self {
        let (vx, vy, depth_vel, target_depth, gravity) = if screen_directed {
            (
                rng.gen::<f64>() * 1000.0 - 500.0,
                rng.gen::<f64>() * 800.0 - 500.0,
                -(rng.gen::<f64>() * 600.0 + 400.0),
                -200.0,
                200.0,
            )
        } else {
            (
                (rng.gen::<f64>() * 300.0 + 50.0) * direction,
                -(rng.gen::<f64>() * 400.0 + 100.0),
                rng.gen::<f64>() * 450.0 + 50.0,
                150.0,
                800.0,
            )
        };

        Self {
            x,
            y,
            scale: 1.0,
            color: BURST_FRESH,
            z: 20,
            opacity: 1.0,
            dead: false,
            vx,
            vy,
            depth: 0.0,
            depth_vel,
            target_depth,
            gravity,
            floor_y: 360.0 + (rng.gen::<f64>() * 20.0 - 10.0),
            landed: false,
            screen_directed,
        }
    }

    /// Advance one tick of particle motion.
    pub fn update(&mut self, rng: &mut SmallRng) {
        if self.landed {
            if self.screen_directed {
                self.opacity -= DT * 0.8;
                if self.opacity <= 0.0 {
                    self.opacity = 0.0;
                    self.dead = true;
                }
            }
            return;
        }

        self.vy += self.gravity * DT;
        self.x += self.vx * DT;
        self.y += self.vy * DT;
        self.depth += self.depth_vel * DT;

        if self.screen_directed {
            // Grow as the particle approaches the viewer.
            let progress = (self.depth.abs() / self.target_depth.abs()).min(1.0);
            self.scale = 0.5 + progress * 0.5;

            if self.depth <= self.target_depth {
                self.stick(rng);
            }
        } else {
            if self.depth >= self.target_depth {
                self.stick(rng);
                return;
            }

            if self.y >= self.floor_y {
                self.y = self.floor_y;
                if self.vy > 50.0 {
                    self.vx = rng.gen::<f64>() * 300.0 - 150.0;
                    self.vy *= -0.4;
                } else {
                    self.vy = 0.0;
                    self.vx *= 0.8;
                }
                if self.vy.abs() < 10.0 && self.vx.abs() < 10.0 {
                    self.stick(rng);
                }
            }
        }
    }

    /// Has come to rest on a surface.
    pub fn landed(&self) -> bool {
        self.landed
    }

    fn stick(&mut self, rng: &mut SmallRng) {
        self.landed = true;
        self.vx = 0.0;
        self.vy = 0.0;
        self.depth_vel = 0.0;
        self.color = BURST_DRIED;

        if self.screen_directed {
            // Splash on the lens, above everything.
            self.z = 9999;
            self.scale = 0.5 + rng.gen::<f64>() * 0.7;
        } else {
            // Wall splatter sits behind the fighters, shrunk by depth.
            self.z = -1;
            let depth_ratio = (self.depth / self.target_depth).clamp(0.0, 1.0);
            self.scale = 1.0 - depth_ratio * 0.6;
        }
    }
}

// =============================================================================
// DROPPED PROPS
// =============================================================================

/// Prop released by the intro's effect sub-frame. Slides down to its rest
/// position and reports the landing once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Prop {
    /// Fighter the prop belongs to.
    pub side: Side,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Presentation scale.
    pub scale: f64,
    /// Z-order for the presentation layer.
    pub z: i32,
    /// At rest.
    pub landed: bool,

    target_y: f64,
}

impl Prop {
    /// Slide speed in units per second.
    const SLIDE_SPEED: f64 = 30.0;

    /// Create a prop released at (`x`, `y`); it settles slightly below.
    pub fn new(side: Side, x: f64, y: f64) -> Self {
        Self {
            side,
            x,
            y,
            scale: 1.0,
            z: 0,
            landed: false,
            target_y: y + 20.0,
        }
    }

    /// Advance one tick. Returns true on the tick the prop lands.
    pub fn update(&mut self) -> bool {
        if self.landed {
            return false;
        }

        self.y += Self::SLIDE_SPEED * DT;
        if self.y >= self.target_y {
            self.y = self.target_y;
            self.landed = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_wall_particle_settles_and_dries() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut p = Particle::scatter(400.0, 180.0, 1.0, false, &mut rng);
        assert_eq!(p.color, BURST_FRESH);

        for _ in 0..600 {
            p.update(&mut rng);
            if p.landed() {
                break;
            }
        }
        assert!(p.landed(), "particle never came to rest");
        assert_eq!(p.color, BURST_DRIED);
        assert!(!p.dead);
    }

    #[test]
    fn test_screen_particle_fades_out() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut p = Particle::scatter(400.0, 180.0, -1.0, true, &mut rng);

        for _ in 0..600 {
            p.update(&mut rng);
            if p.dead {
                break;
            }
        }
        assert!(p.dead, "screen particle never faded");
        assert_eq!(p.z, 9999);
    }

    #[test]
    fn test_prop_lands_exactly_once() {
        let mut prop = Prop::new(Side::A, 230.0, 310.0);
        let mut landings = 0;
        for _ in 0..60 * 60 {
            if prop.update() {
                landings += 1;
            }
        }
        assert_eq!(landings, 1);
        assert_eq!(prop.y, 330.0);
    }
}
