//! Bout Configuration
//!
//! Tuning knobs for the simulation, with defaults matching the shipped
//! balance. All distances are in arena units, all times in ticks.

/// Configuration for one bout.
#[derive(Debug, Clone)]
pub struct BoutConfig {
    /// Left arena wall.
    pub arena_min_x: f64,
    /// Right arena wall.
    pub arena_max_x: f64,
    /// Side A spawn x.
    pub spawn_a_x: f64,
    /// Side B spawn x.
    pub spawn_b_x: f64,
    /// Shared spawn y.
    pub spawn_y: f64,

    /// Velocity gained per tick of held movement intent.
    pub move_speed: f64,
    /// Per-tick velocity retention.
    pub friction: f64,
    /// Velocity retention when bouncing off an arena wall.
    pub bounce: f64,

    /// Maximum horizontal distance at which an attack can connect.
    pub hit_range: f64,
    /// Minimum distance fighters are allowed to overlap to.
    pub min_separation: f64,
    /// Knockback impulse for an ordinary hit.
    pub knockback: f64,
    /// Knockback impulse for a hit that empties the victim's health.
    pub finisher_knockback: f64,

    /// Starting and maximum health.
    pub max_health: u8,

    /// Ticks after game-over before the winner starts celebrating.
    pub victory_delay_ticks: u32,
    /// Ticks after game-over before the status frame shows the game-over card.
    pub show_game_over_ticks: u32,
    /// Ticks of post-KO aftermath still captured into the replay buffer.
    pub record_grace_ticks: u32,

    /// Minimum particles in a high-hit burst; up to 3 more are added.
    pub burst_base: u32,
}

impl Default for BoutConfig {
    fn default() -> Self {
        Self {
            arena_min_x: 100.0,
            arena_max_x: 700.0,
            spawn_a_x: 250.0,
            spawn_b_x: 550.0,
            spawn_y: 250.0,
            move_speed: 0.8,
            friction: 0.9,
            bounce: 0.5,
            hit_range: 50.0,
            min_separation: 40.0,
            knockback: 8.0,
            finisher_knockback: 20.0,
            max_health: 5,
            victory_delay_ticks: 60,
            show_game_over_ticks: 180,
            record_grace_ticks: 300,
            burst_base: 6,
        }
    }
}
