use std::io::Read;

use serde::{Deserialize, Serialize};

pub mod boids;
pub mod error;
pub mod geometry;
pub mod output;

pub use boids::{Boid, Flock};
pub use error::FlockError;
pub use geometry::Vector2;

/// How velocity writes made during one pass are seen by the rest of that pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Boids are updated in flock order and later boids see the new velocities
    /// of earlier ones.
    #[default]
    Sequential,
    /// Every boid reads the flock as it was at the start of the tick. New
    /// velocities are computed in parallel and committed after the pass.
    Snapshot,
}

/// What the separate rule does with a neighbor sitting on top of the boid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroDistance {
    /// Not counted as a neighbor.
    Skip,
    /// Counted, contributing no push.
    #[default]
    ZeroVector,
    /// Divide anyway; the velocity turns NaN.
    Propagate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub align_radius: f64,
    pub separate_radius: f64,
    pub cohesion_radius: f64,
    pub visibility: Visibility,
    pub zero_distance: ZeroDistance,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            align_radius: 10.0,
            separate_radius: 50.0,
            cohesion_radius: 100.0,
            visibility: Visibility::default(),
            zero_distance: ZeroDistance::default(),
        }
    }
}

impl Parameters {
    pub fn validate(&self) -> Result<(), FlockError> {
        for (name, value) in [
            ("align", self.align_radius),
            ("separate", self.separate_radius),
            ("cohesion", self.cohesion_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FlockError::InvalidRadius { name, value });
            }
        }
        Ok(())
    }

    /// Reads a JSON object; missing fields take their defaults.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, FlockError> {
        let params: Parameters = serde_json::from_reader(reader)?;
        params.validate()?;
        Ok(params)
    }
}
