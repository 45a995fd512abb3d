//! Collision queries against the map's obstacles and bounds.

use skirmish_core::map::{MapLayout, Obstacle, Rect, Shape};
use skirmish_core::Vec2;

/// Point and segment queries used by steering. Only obstacles and the map
/// edge block; units never do.
pub trait CollisionQuery {
    fn bounds(&self) -> Rect;

    /// Whether a circle of `radius` at `p` overlaps anything solid.
    fn point_blocked(&self, p: Vec2, radius: f32) -> bool;

    /// Whether a circle of `radius` swept from `a` to `b` hits anything solid.
    fn segment_blocked(&self, a: Vec2, b: Vec2, radius: f32) -> bool {
        let length = a.distance(b);
        let step = (radius * 0.5).max(1.0);
        let samples = (length / step).ceil().max(1.0) as u32;
        (1..=samples).any(|i| self.point_blocked(a.lerp(b, i as f32 / samples as f32), radius))
    }
}

fn overlaps(obstacle: &Obstacle, p: Vec2, radius: f32) -> bool {
    match obstacle.shape {
        Shape::Rect { min, max } => {
            let closest = p.clamp(min.min(max), max.max(min));
            closest.distance_squared(p) < radius * radius
        }
        Shape::Circle { center, radius: r } => {
            let reach = r + radius;
            center.distance_squared(p) < reach * reach
        }
    }
}

impl CollisionQuery for MapLayout {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn point_blocked(&self, p: Vec2, radius: f32) -> bool {
        !p.is_finite()
            || !self.bounds.contains(p)
            || self.obstacles.iter().any(|o| overlaps(o, p, radius))
    }
}

/// Collision view for flying units: only the map edge blocks.
#[derive(Debug, Clone, Copy)]
pub struct Airspace(pub Rect);

impl CollisionQuery for Airspace {
    fn bounds(&self) -> Rect {
        self.0
    }

    fn point_blocked(&self, p: Vec2, _radius: f32) -> bool {
        !p.is_finite() || !self.0.contains(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::enums::ObstacleKind;

    fn walled_map() -> MapLayout {
        MapLayout {
            obstacles: vec![
                Obstacle {
                    kind: ObstacleKind::Static,
                    shape: Shape::Rect {
                        min: Vec2::new(100.0, 0.0),
                        max: Vec2::new(120.0, 200.0),
                    },
                },
                Obstacle {
                    kind: ObstacleKind::Static,
                    shape: Shape::Circle {
                        center: Vec2::new(300.0, 300.0),
                        radius: 20.0,
                    },
                },
            ],
            ..MapLayout::default()
        }
    }

    #[test]
    fn rect_and_circle_block_with_radius() {
        let map = walled_map();
        assert!(map.point_blocked(Vec2::new(95.0, 50.0), 8.0));
        assert!(!map.point_blocked(Vec2::new(90.0, 50.0), 8.0));
        assert!(map.point_blocked(Vec2::new(300.0, 325.0), 8.0));
        assert!(!map.point_blocked(Vec2::new(300.0, 330.0), 8.0));
    }

    #[test]
    fn outside_bounds_is_blocked() {
        let map = MapLayout::default();
        assert!(map.point_blocked(Vec2::new(-1.0, 10.0), 1.0));
        assert!(map.point_blocked(Vec2::new(f32::NAN, 10.0), 1.0));
    }

    #[test]
    fn segment_through_wall_is_blocked() {
        let map = walled_map();
        assert!(map.segment_blocked(Vec2::new(50.0, 50.0), Vec2::new(200.0, 50.0), 4.0));
        assert!(!map.segment_blocked(Vec2::new(50.0, 250.0), Vec2::new(200.0, 250.0), 4.0));
    }

    #[test]
    fn airspace_ignores_obstacles() {
        let map = walled_map();
        let air = Airspace(map.bounds);
        assert!(!air.segment_blocked(Vec2::new(50.0, 50.0), Vec2::new(200.0, 50.0), 4.0));
        assert!(air.point_blocked(Vec2::new(5000.0, 50.0), 4.0));
    }
}
