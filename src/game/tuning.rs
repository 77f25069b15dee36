//! Gameplay constants and difficulty ramps
//!
//! Speeds are in game units per frame at [`REFERENCE_FPS`]; the session
//! scales them by the real frame delta.

/// Frame rate the per-frame speeds are expressed against
pub const REFERENCE_FPS: f32 = 60.0;

/// Gameplay tuning
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    /// Player square side
    pub player_size: f32,
    /// Gap between the player and the bottom edge at start
    pub player_bottom_margin: f32,
    /// Horizontal player speed
    pub player_speed: f32,
    /// Obstacle square side
    pub obstacle_size: f32,
    /// Obstacle fall speed at the start of a run
    pub obstacle_base_speed: f32,
    /// Added fall speed per second survived
    pub obstacle_speed_ramp: f32,
    /// Fall speed cap
    pub obstacle_max_speed: f32,
    /// Chance that a spawned obstacle is immune to bullets
    pub immune_chance: f64,
    /// Spawn interval at the start of a run (ms)
    pub spawn_interval_ms: f32,
    /// Spawn interval floor (ms)
    pub min_spawn_interval_ms: f32,
    /// Spawn interval reduction per second survived (ms)
    pub spawn_ramp_ms: f32,
    /// Bullet size
    pub bullet_width: f32,
    pub bullet_height: f32,
    /// Bullet rise speed
    pub bullet_speed: f32,
    /// Minimum time between shots (seconds)
    pub shot_cooldown: f32,
    /// Score gained per second survived
    pub survival_points_per_sec: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 50.0,
            player_bottom_margin: 20.0,
            player_speed: 7.0,
            obstacle_size: 60.0,
            obstacle_base_speed: 5.0,
            obstacle_speed_ramp: 0.45,
            obstacle_max_speed: 14.0,
            immune_chance: 1.0 / 3.0,
            spawn_interval_ms: 350.0,
            min_spawn_interval_ms: 250.0,
            spawn_ramp_ms: 35.0,
            bullet_width: 10.0,
            bullet_height: 22.0,
            bullet_speed: 14.0,
            shot_cooldown: 0.5,
            survival_points_per_sec: 2.0,
        }
    }
}

impl Tuning {
    /// Seconds between obstacle spawns after `elapsed` seconds of play
    pub fn spawn_interval(&self, elapsed: f32) -> f32 {
        let ms = (self.spawn_interval_ms - elapsed * self.spawn_ramp_ms).floor();
        ms.max(self.min_spawn_interval_ms) / 1000.0
    }

    /// Obstacle fall speed after `elapsed` seconds of play
    pub fn obstacle_speed(&self, elapsed: f32) -> f32 {
        (self.obstacle_base_speed + elapsed * self.obstacle_speed_ramp).min(self.obstacle_max_speed)
    }
}
