//! Single-player run state and the fixed-step simulation tick

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use super::combat::{Bullet, CombatSystem};
use super::entities::{Obstacle, ObstacleKind, Player};
use super::physics::{PhysicsSystem, FIELD_WIDTH};
use super::tuning::{Tuning, REFERENCE_FPS};
use super::ControlVector;

/// Run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Simulation advancing
    Playing,
    /// Player was hit; frozen until restart
    GameOver,
}

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Shot { x: f32 },
    ObstacleSpawned { x: f32, kind: ObstacleKind },
    ObstacleDestroyed { x: f32, y: f32 },
    ObstacleDodged { x: f32 },
    PlayerHit { score: u32 },
}

/// A single run of the game
pub struct GameSession {
    tuning: Tuning,
    rng: ChaCha8Rng,
    phase: SessionPhase,
    player: Player,
    obstacles: Vec<Obstacle>,
    bullets: Vec<Bullet>,
    score: f32,
    elapsed: f32,
    spawn_timer: f32,
    last_shot: Option<f32>,
    frame: u64,
}

impl GameSession {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: SessionPhase::Playing,
            player: Player::new(&tuning),
            obstacles: Vec::new(),
            bullets: Vec::new(),
            score: 0.0,
            elapsed: 0.0,
            spawn_timer: tuning.spawn_interval(0.0),
            last_shot: None,
            frame: 0,
        }
    }

    /// Start a fresh run; the obstacle RNG stream carries on
    pub fn restart(&mut self) {
        info!(score = self.score(), "Restarting run");
        self.phase = SessionPhase::Playing;
        self.player = Player::new(&self.tuning);
        self.obstacles.clear();
        self.bullets.clear();
        self.score = 0.0;
        self.elapsed = 0.0;
        self.spawn_timer = self.tuning.spawn_interval(0.0);
        self.last_shot = None;
        self.frame = 0;
    }

    /// Advance one frame. Does nothing once the run is over.
    pub fn tick(&mut self, controls: ControlVector, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase == SessionPhase::GameOver {
            return events;
        }

        self.frame += 1;
        self.elapsed += dt;
        let step = dt * REFERENCE_FPS;

        self.update_player(controls, step, &mut events);
        self.update_spawns(dt, &mut events);

        let fall = self.tuning.obstacle_speed(self.elapsed) * step;
        for obstacle in &mut self.obstacles {
            obstacle.rect.y += fall;
        }
        let rise = self.tuning.bullet_speed * step;
        for bullet in &mut self.bullets {
            bullet.advance(rise);
        }

        self.resolve_collisions(&mut events);

        self.score += dt * self.tuning.survival_points_per_sec;

        for event in &events {
            debug!(frame = self.frame, ?event, "Game event");
        }
        events
    }

    fn update_player(&mut self, controls: ControlVector, step: f32, events: &mut Vec<GameEvent>) {
        let speed = self.tuning.player_speed * step;
        let mut dx = 0.0;
        if controls.left {
            dx -= speed;
        }
        if controls.right {
            dx += speed;
        }
        self.player.rect = PhysicsSystem::move_clamped(self.player.rect, dx);

        if controls.fire
            && CombatSystem::can_fire(self.elapsed, self.last_shot, self.tuning.shot_cooldown)
        {
            let bullet = Bullet::fire_from(&self.player.rect, &self.tuning);
            events.push(GameEvent::Shot { x: bullet.rect.x });
            self.bullets.push(bullet);
            self.last_shot = Some(self.elapsed);
        }
    }

    fn update_spawns(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        self.spawn_timer -= dt;
        while self.spawn_timer <= 0.0 {
            let max_x = (FIELD_WIDTH - self.tuning.obstacle_size).max(0.0) as u32;
            let x = self.rng.gen_range(0..=max_x) as f32;
            let kind = if self.rng.gen_bool(self.tuning.immune_chance) {
                ObstacleKind::Immune
            } else {
                ObstacleKind::Normal
            };
            self.obstacles.push(Obstacle::spawn(x, kind, &self.tuning));
            events.push(GameEvent::ObstacleSpawned { x, kind });
            self.spawn_timer += self.tuning.spawn_interval(self.elapsed);
        }
    }

    /// Bullets against obstacles, then obstacles against the player and the
    /// bottom edge. One bullet destroys at most one obstacle.
    fn resolve_collisions(&mut self, events: &mut Vec<GameEvent>) {
        let mut spent = vec![false; self.bullets.len()];
        let obstacles = std::mem::take(&mut self.obstacles);

        for obstacle in obstacles {
            if self.phase == SessionPhase::GameOver {
                self.obstacles.push(obstacle);
                continue;
            }

            if let Some(hit) = CombatSystem::find_hit(&obstacle, &self.bullets, &spent) {
                spent[hit] = true;
                self.score += 1.0;
                events.push(GameEvent::ObstacleDestroyed {
                    x: obstacle.rect.x,
                    y: obstacle.rect.y,
                });
                continue;
            }

            if obstacle.rect.intersects(&self.player.rect) {
                self.phase = SessionPhase::GameOver;
                info!(score = self.score(), elapsed = self.elapsed, "Game over");
                events.push(GameEvent::PlayerHit {
                    score: self.score(),
                });
                self.obstacles.push(obstacle);
                continue;
            }

            if PhysicsSystem::fell_off(&obstacle.rect) {
                self.score += 1.0;
                events.push(GameEvent::ObstacleDodged {
                    x: obstacle.rect.x,
                });
            } else {
                self.obstacles.push(obstacle);
            }
        }

        let mut spent = spent.into_iter();
        self.bullets.retain(|bullet| {
            let hit = spent.next().unwrap_or(false);
            !hit && !bullet.is_off_field()
        });
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Whole points, as displayed
    pub fn score(&self) -> u32 {
        self.score as u32
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}
