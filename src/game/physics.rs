//! Play field geometry, movement and overlap tests

/// Play field size in game units; origin top-left, y grows downward
pub const FIELD_WIDTH: f32 = 900.0;
pub const FIELD_HEIGHT: f32 = 600.0;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Strict overlap: rectangles that only share an edge do not collide,
    /// and empty rectangles never collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.w > 0.0
            && self.h > 0.0
            && other.w > 0.0
            && other.h > 0.0
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Movement helpers for field entities
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Shift horizontally by `dx` and keep the rectangle inside the field
    pub fn move_clamped(rect: Rect, dx: f32) -> Rect {
        let mut moved = rect;
        moved.x += dx;
        Self::clamp_to_field(moved)
    }

    pub fn clamp_to_field(rect: Rect) -> Rect {
        Rect {
            x: rect.x.clamp(0.0, (FIELD_WIDTH - rect.w).max(0.0)),
            y: rect.y.clamp(0.0, (FIELD_HEIGHT - rect.h).max(0.0)),
            ..rect
        }
    }

    /// Whether a falling rectangle has left through the bottom edge
    pub fn fell_off(rect: &Rect) -> bool {
        rect.y > FIELD_HEIGHT
    }

    /// Whether a rising rectangle has left through the top edge
    pub fn left_top(rect: &Rect) -> bool {
        rect.bottom() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(9.0, 9.0, 10.0, 10.0)));
        // Touching edges
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        // Empty rectangle
        assert!(!a.intersects(&Rect::new(5.0, 5.0, 0.0, 3.0)));
    }

    #[test]
    fn movement_is_clamped_to_field() {
        let r = Rect::new(5.0, 530.0, 50.0, 50.0);
        assert_eq!(PhysicsSystem::move_clamped(r, -7.0).x, 0.0);
        let edge = Rect::new(FIELD_WIDTH - 52.0, 530.0, 50.0, 50.0);
        assert_eq!(PhysicsSystem::move_clamped(edge, 7.0).x, FIELD_WIDTH - 50.0);
        assert_eq!(PhysicsSystem::move_clamped(r, 7.0).x, 12.0);
    }

    #[test]
    fn edge_exits() {
        assert!(!PhysicsSystem::fell_off(&Rect::new(0.0, FIELD_HEIGHT, 60.0, 60.0)));
        assert!(PhysicsSystem::fell_off(&Rect::new(0.0, FIELD_HEIGHT + 0.5, 60.0, 60.0)));
        assert!(PhysicsSystem::left_top(&Rect::new(0.0, -22.0, 10.0, 22.0)));
        assert!(!PhysicsSystem::left_top(&Rect::new(0.0, -21.0, 10.0, 22.0)));
    }
}
