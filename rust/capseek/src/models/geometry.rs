use crate::errors::DataProcessingError;
use serde::{
    Deserialize,
    Serialize,
};

/// A point in the detector coordinate system [cm].
pub type Point = [f32; 3];

pub fn norm(v: Point) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn distance(a: Point, b: Point) -> f32 {
    norm([a[0] - b[0], a[1] - b[1], a[2] - b[2]])
}

/// The assumed origin point of an event (prompt vertex).
///
/// Supplied by the caller; this crate never reconstructs one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn as_point(&self) -> Point {
        [self.x, self.y, self.z]
    }
}

/// Sensor-id -> position lookup.
///
/// Sensor ids are 1-based in the input convention, so `position` applies
/// the offset. An explicit value passed into the corrector and the feature
/// functions, never a process-wide table, so tests can substitute
/// synthetic geometries.
#[derive(Debug, Clone)]
pub struct SensorArray {
    positions: Vec<Point>,
}

impl SensorArray {
    pub fn new(positions: Vec<Point>) -> Self {
        Self { positions }
    }

    /// Builds a degenerate geometry where every sensor sits at the same
    /// point. Useful to zero out the ToF term in tests.
    pub fn uniform(num_sensors: usize, at: Point) -> Self {
        Self {
            positions: vec![at; num_sensors],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of the sensor with the given 1-based id.
    pub fn position(&self, id: i32) -> Result<Point, DataProcessingError> {
        if id < 1 || (id as usize) > self.positions.len() {
            return Err(DataProcessingError::UnknownSensorId {
                id,
                num_sensors: self.positions.len(),
            });
        }
        Ok(self.positions[(id - 1) as usize])
    }

    /// Unit vector from `vertex` to the sensor with the given id.
    pub fn direction_from(&self, vertex: Vertex, id: i32) -> Result<Point, DataProcessingError> {
        let pos = self.position(id)?;
        let v = [
            pos[0] - vertex.x,
            pos[1] - vertex.y,
            pos[2] - vertex.z,
        ];
        let n = norm(v);
        if n == 0.0 {
            // Sensor exactly at the vertex, no defined direction.
            return Ok([0.0, 0.0, 0.0]);
        }
        Ok([v[0] / n, v[1] / n, v[2] / n])
    }
}

/// The cylindrical detector volume, for distance-to-wall features.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TankShape {
    /// Barrel radius [cm].
    pub radius: f32,
    /// Half of the tank height [cm].
    pub half_height: f32,
}

impl TankShape {
    pub fn new(radius: f32, half_height: f32) -> Self {
        Self {
            radius,
            half_height,
        }
    }

    /// Distance from a point inside the tank to the nearest wall.
    pub fn distance_to_wall(&self, p: Point) -> f32 {
        let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
        (self.radius - r).min(self.half_height - p[2].abs())
    }

    /// Distance from a point to the wall along a direction.
    ///
    /// `dir` must be a unit vector; a zero direction yields the plain
    /// nearest-wall distance as a fallback.
    pub fn distance_to_wall_along(&self, p: Point, dir: Point) -> f32 {
        let a = dir[0] * dir[0] + dir[1] * dir[1];
        let mut t_barrel = f32::INFINITY;
        if a > 0.0 {
            let b = 2.0 * (p[0] * dir[0] + p[1] * dir[1]);
            let c = p[0] * p[0] + p[1] * p[1] - self.radius * self.radius;
            let disc = b * b - 4.0 * a * c;
            if disc >= 0.0 {
                let t = (-b + disc.sqrt()) / (2.0 * a);
                if t >= 0.0 {
                    t_barrel = t;
                }
            }
        }
        let t_cap = if dir[2] > 0.0 {
            (self.half_height - p[2]) / dir[2]
        } else if dir[2] < 0.0 {
            (-self.half_height - p[2]) / dir[2]
        } else {
            f32::INFINITY
        };
        let t = t_barrel.min(t_cap);
        if t.is_finite() {
            t
        } else {
            self.distance_to_wall(p)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_ids_are_one_based() {
        let sensors = SensorArray::new(vec![[1.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
        assert_eq!(sensors.position(1).unwrap(), [1.0, 0.0, 0.0]);
        assert_eq!(sensors.position(2).unwrap(), [0.0, 2.0, 0.0]);
        assert!(sensors.position(0).is_err());
        assert!(sensors.position(3).is_err());
    }

    #[test]
    fn test_distance_to_wall_center() {
        let tank = TankShape::new(1690.0, 1810.0);
        assert_eq!(tank.distance_to_wall([0.0, 0.0, 0.0]), 1690.0);
        assert_eq!(tank.distance_to_wall([0.0, 0.0, 1700.0]), 110.0);
    }

    #[test]
    fn test_distance_to_wall_along_axis() {
        let tank = TankShape::new(1000.0, 500.0);
        // Straight up from the center hits the top cap.
        let up = tank.distance_to_wall_along([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert!((up - 500.0).abs() < 1e-3);
        // Straight out along x hits the barrel.
        let out = tank.distance_to_wall_along([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        assert!((out - 1000.0).abs() < 1e-3);
    }
}
