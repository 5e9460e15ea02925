//! Collision tests for the two entity pairings that matter
//!
//! Projectile-block contacts use a circle approximation: small fast
//! projectiles clip the corner of an AABB test too easily, and the rounded
//! radius is more forgiving. Everything else (player vs block) is a plain
//! axis-aligned overlap test.

use glam::Vec2;

use crate::consts::HIT_RADIUS_FACTOR;

/// Axis-aligned bounding box. `pos` is the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Standard AABB overlap test
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }
}

/// Circle-approximation hit test between a projectile and a block.
///
/// Hit when the distance between centers is under
/// (projectile width + block width) * HIT_RADIUS_FACTOR.
pub fn projectile_hits_block(projectile: &Aabb, block: &Aabb) -> bool {
    let distance = projectile.center().distance(block.center());
    let radius = (projectile.size.x + block.size.x) * HIT_RADIUS_FACTOR;
    distance < radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, w: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::splat(w))
    }

    #[test]
    fn identical_centers_always_hit() {
        // Two width-0.1 entities at the same spot: distance 0 < radius 0.15
        let a = square(0.3, 0.3, 0.1);
        let b = square(0.3, 0.3, 0.1);
        assert!(projectile_hits_block(&a, &b));
    }

    #[test]
    fn centers_at_radius_miss() {
        let a = square(0.0, 0.0, 0.1);
        // Radius is (0.1 + 0.1) * 0.75 = 0.15; separate centers by exactly that
        let b = square(0.15, 0.0, 0.1);
        assert!(!projectile_hits_block(&a, &b));

        // And anything further misses too
        let far = square(0.5, 0.0, 0.1);
        assert!(!projectile_hits_block(&a, &far));
    }

    #[test]
    fn centers_just_inside_radius_hit() {
        let a = square(0.0, 0.0, 0.1);
        let b = square(0.149, 0.0, 0.1);
        assert!(projectile_hits_block(&a, &b));
    }

    #[test]
    fn aabb_overlap() {
        let a = square(0.0, 0.0, 0.1);
        assert!(a.overlaps(&square(0.05, 0.05, 0.1)));
        assert!(a.overlaps(&a));
        // Touching edges do not overlap (strict inequality)
        assert!(!a.overlaps(&square(0.1, 0.0, 0.1)));
        assert!(!a.overlaps(&square(0.0, 0.1, 0.1)));
        assert!(!a.overlaps(&square(0.3, 0.3, 0.1)));
    }

    #[test]
    fn aabb_center() {
        let a = Aabb::new(Vec2::new(0.2, -0.4), Vec2::new(0.1, 0.2));
        assert!((a.center() - Vec2::new(0.25, -0.3)).length() < 1e-6);
    }
}
