//! Collision queries against the static obstacle field
//!
//! Everything here is a pure function of the obstacle list and the query.
//! Snow hills use an inflated normalized-ellipse test rather than an exact
//! ellipse/circle overlap: the probe radius is scaled by the hill's minor axis
//! and added to the unit threshold. Gameplay is tuned against that shape.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Obstacle;

/// Axis-aligned rectangle in arena space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Clamp a point into the rectangle
    #[inline]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Planar (ground-plane) distance between two points
#[inline]
pub fn planar_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Whether a circle of `radius` centred on `point` overlaps one obstacle
pub fn overlaps_obstacle(obstacle: &Obstacle, point: Vec2, radius: f32) -> bool {
    match *obstacle {
        Obstacle::Tree {
            center,
            radius: trunk,
        } => planar_distance(point, center) < radius + trunk,
        Obstacle::SnowHill {
            center,
            radius_x,
            radius_y,
        } => {
            let dx = (point.x - center.x) / radius_x;
            let dy = (point.y - center.y) / radius_y;
            dx * dx + dy * dy < 1.0 + radius / radius_x.min(radius_y)
        }
    }
}

/// First obstacle (in field order) overlapped by a probe circle
pub fn point_in_obstacle(obstacles: &[Obstacle], point: Vec2, radius: f32) -> Option<&Obstacle> {
    obstacles
        .iter()
        .find(|obstacle| overlaps_obstacle(obstacle, point, radius))
}
