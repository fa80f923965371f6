//! Arena bounds and the static obstacle field
//!
//! The arena is the rectangle `[0, width] x [0, height]` ringed by a wall of
//! fixed thickness. Obstacles are created with the match and never change.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{self, Rect};
use crate::consts::*;

/// Fixed rectangular play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            wall_thickness: WALL_THICKNESS,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32, wall_thickness: f32) -> Self {
        Self {
            width,
            height,
            wall_thickness,
        }
    }

    /// Outer bounds including the wall
    pub fn bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    /// Rectangle a body of `radius` may occupy (inside the wall, not touching it)
    pub fn playable(&self, radius: f32) -> Rect {
        let inset = self.wall_thickness + radius;
        Rect::new(
            Vec2::splat(inset),
            Vec2::new(self.width - inset, self.height - inset),
        )
    }

    /// Inside face of the wall; snowballs leaving it are gone
    pub fn inner(&self) -> Rect {
        self.playable(0.0)
    }

    /// X coordinate splitting the two team halves
    #[inline]
    pub fn midline_x(&self) -> f32 {
        self.width * 0.5
    }
}

/// A static blocker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Obstacle {
    /// Circular trunk
    Tree { center: Vec2, radius: f32 },
    /// Elliptical mound
    SnowHill {
        center: Vec2,
        radius_x: f32,
        radius_y: f32,
    },
}

impl Obstacle {
    pub fn tree(x: f32, y: f32, radius: f32) -> Self {
        Obstacle::Tree {
            center: Vec2::new(x, y),
            radius,
        }
    }

    pub fn snow_hill(x: f32, y: f32, radius_x: f32, radius_y: f32) -> Self {
        Obstacle::SnowHill {
            center: Vec2::new(x, y),
            radius_x,
            radius_y,
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Obstacle::Tree { center, .. } | Obstacle::SnowHill { center, .. } => center,
        }
    }

    /// Smallest extent, used by config validation
    pub fn min_extent(&self) -> f32 {
        match *self {
            Obstacle::Tree { radius, .. } => radius,
            Obstacle::SnowHill {
                radius_x, radius_y, ..
            } => radius_x.min(radius_y),
        }
    }
}

/// Immutable, ordered set of obstacles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// Two trees in opposite corners and two hills guarding the centre line
    pub fn standard() -> Self {
        Self::new(vec![
            Obstacle::tree(200.0, 100.0, 25.0),
            Obstacle::tree(600.0, 350.0, 25.0),
            Obstacle::snow_hill(400.0, 150.0, 40.0, 25.0),
            Obstacle::snow_hill(400.0, 300.0, 40.0, 25.0),
        ])
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// First obstacle overlapped by a circle of `radius` at `point`
    pub fn point_in_obstacle(&self, point: Vec2, radius: f32) -> Option<&Obstacle> {
        collision::point_in_obstacle(&self.obstacles, point, radius)
    }

    #[inline]
    pub fn is_blocked(&self, point: Vec2, radius: f32) -> bool {
        self.point_in_obstacle(point, radius).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playable_rect_insets_wall_and_radius() {
        let arena = Arena::default();
        let rect = arena.playable(PLAYER_RADIUS);
        assert_eq!(rect.min, Vec2::new(35.0, 35.0));
        assert_eq!(rect.max, Vec2::new(765.0, 465.0));
        assert_eq!(arena.inner().max, Vec2::new(785.0, 485.0));
    }

    #[test]
    fn test_standard_field() {
        let field = ObstacleField::standard();
        assert_eq!(field.len(), 4);
        assert!(field.is_blocked(Vec2::new(200.0, 100.0), 1.0));
        assert!(!field.is_blocked(Vec2::new(100.0, 250.0), PLAYER_RADIUS));
    }

    #[test]
    fn test_obstacle_json_shape() {
        let json = r#"[{"kind":"tree","center":[10.0,20.0],"radius":5.0}]"#;
        let field: ObstacleField = serde_json::from_str(json).unwrap();
        assert_eq!(field.as_slice(), &[Obstacle::tree(10.0, 20.0, 5.0)]);
    }
}
