//! Bullets, fire cooldown and hit detection

use super::entities::{Obstacle, Rgb, BULLET_COLOR};
use super::physics::{PhysicsSystem, Rect};
use super::tuning::Tuning;

/// Player bullet
#[derive(Debug, Clone)]
pub struct Bullet {
    pub rect: Rect,
    pub color: Rgb,
}

impl Bullet {
    /// Bullet centred on, and just above, the shooter
    pub fn fire_from(shooter: &Rect, tuning: &Tuning) -> Self {
        let w = tuning.bullet_width;
        let h = tuning.bullet_height;
        Self {
            rect: Rect::new((shooter.center_x() - w / 2.0).floor(), shooter.y - h, w, h),
            color: BULLET_COLOR,
        }
    }

    /// Move up by `dy`
    pub fn advance(&mut self, dy: f32) {
        self.rect.y -= dy;
    }

    pub fn is_off_field(&self) -> bool {
        PhysicsSystem::left_top(&self.rect)
    }
}

/// Combat rules
pub struct CombatSystem;

impl CombatSystem {
    /// Whether enough time has passed since the last shot
    pub fn can_fire(now: f32, last_shot: Option<f32>, cooldown: f32) -> bool {
        last_shot.map_or(true, |last| now - last >= cooldown)
    }

    /// Index of the first unspent bullet that destroys `obstacle`, if any.
    /// Immune obstacles are never hit.
    pub fn find_hit(obstacle: &Obstacle, bullets: &[Bullet], spent: &[bool]) -> Option<usize> {
        if !obstacle.kind.is_shootable() {
            return None;
        }
        bullets
            .iter()
            .zip(spent)
            .position(|(bullet, &spent)| !spent && obstacle.rect.intersects(&bullet.rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::ObstacleKind;

    #[test]
    fn bullet_spawns_centred_above_shooter() {
        let tuning = Tuning::default();
        let shooter = Rect::new(425.0, 530.0, 50.0, 50.0);
        let bullet = Bullet::fire_from(&shooter, &tuning);
        assert_eq!(bullet.rect, Rect::new(445.0, 508.0, 10.0, 22.0));
    }

    #[test]
    fn cooldown_gates_firing() {
        assert!(CombatSystem::can_fire(0.0, None, 0.5));
        assert!(!CombatSystem::can_fire(1.2, Some(1.0), 0.5));
        assert!(CombatSystem::can_fire(1.5, Some(1.0), 0.5));
    }

    #[test]
    fn hits_skip_spent_bullets_and_immune_obstacles() {
        let tuning = Tuning::default();
        let mut obstacle = Obstacle::spawn(100.0, ObstacleKind::Normal, &tuning);
        obstacle.rect.y = 100.0;
        let bullets = vec![
            Bullet {
                rect: Rect::new(120.0, 120.0, 10.0, 22.0),
                color: BULLET_COLOR,
            },
            Bullet {
                rect: Rect::new(130.0, 140.0, 10.0, 22.0),
                color: BULLET_COLOR,
            },
        ];

        assert_eq!(CombatSystem::find_hit(&obstacle, &bullets, &[false, false]), Some(0));
        assert_eq!(CombatSystem::find_hit(&obstacle, &bullets, &[true, false]), Some(1));
        assert_eq!(CombatSystem::find_hit(&obstacle, &bullets, &[true, true]), None);

        obstacle.kind = ObstacleKind::Immune;
        assert_eq!(CombatSystem::find_hit(&obstacle, &bullets, &[false, false]), None);
    }
}
