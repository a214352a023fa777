//! Collision detection and pass detection
//!
//! The avatar is a circle; obstacles are axis-aligned columns with an open
//! gap. Gap bounds are inclusive: an avatar whose diameter exactly fills the
//! gap is safe.

use super::state::{Avatar, Obstacle};
use super::world::WorldConfig;

/// What the avatar hit this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionResult {
    #[default]
    None,
    Obstacle,
    Ground,
    Ceiling,
}

impl CollisionResult {
    pub fn is_hit(&self) -> bool {
        *self != CollisionResult::None
    }
}

/// Outcome of checking every obstacle for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameCheck {
    /// Obstacles whose `passed` flag flipped this frame
    pub newly_passed: u32,
    /// First collision found
    pub collision: CollisionResult,
}

/// Horizontal overlap between the avatar circle's bounding span and an obstacle
#[inline]
pub fn overlaps_horizontally(avatar: &Avatar, obstacle: &Obstacle) -> bool {
    avatar.pos.x + avatar.radius > obstacle.x && avatar.pos.x - avatar.radius < obstacle.right()
}

/// True if the avatar fits vertically inside the obstacle's gap
#[inline]
pub fn inside_gap(avatar: &Avatar, obstacle: &Obstacle) -> bool {
    avatar.pos.y - avatar.radius >= obstacle.gap_y
        && avatar.pos.y + avatar.radius <= obstacle.gap_bottom()
}

/// Avatar against a single obstacle
pub fn hits_obstacle(avatar: &Avatar, obstacle: &Obstacle) -> bool {
    overlaps_horizontally(avatar, obstacle) && !inside_gap(avatar, obstacle)
}

/// Flip `passed` once the obstacle's trailing edge is fully behind the avatar.
/// Returns true only on the frame it flips.
pub fn mark_passed(avatar: &Avatar, obstacle: &mut Obstacle) -> bool {
    if !obstacle.passed && obstacle.right() < avatar.pos.x - avatar.radius {
        obstacle.passed = true;
        return true;
    }
    false
}

/// Check the avatar against every obstacle (in order), then the ground and the
/// ceiling. Ground and ceiling contacts clamp the avatar back inside the world.
pub fn check_collisions(
    avatar: &mut Avatar,
    obstacles: &mut [Obstacle],
    world: &WorldConfig,
) -> FrameCheck {
    let mut check = FrameCheck::default();

    for obstacle in obstacles.iter_mut() {
        if mark_passed(avatar, obstacle) {
            check.newly_passed += 1;
        }
        if !check.collision.is_hit() && hits_obstacle(avatar, obstacle) {
            check.collision = CollisionResult::Obstacle;
        }
    }

    let ground_y = world.ground_y();
    if avatar.pos.y + avatar.radius >= ground_y {
        avatar.pos.y = ground_y - avatar.radius;
        if !check.collision.is_hit() {
            check.collision = CollisionResult::Ground;
        }
    }

    if avatar.pos.y - avatar.radius <= 0.0 {
        avatar.pos.y = avatar.radius;
        if !check.collision.is_hit() {
            check.collision = CollisionResult::Ceiling;
        }
    }

    check
}
