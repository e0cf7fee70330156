use std::io::Read;

use rand::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::FlockError;
use crate::geometry::{Vector2, add, distance, scale, subtract};
use crate::{Parameters, Visibility, ZeroDistance};

/// Separation distances at or below this are treated as coincident.
const COINCIDENT: f64 = f64::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boid {
    pub position: Vector2,
    pub velocity: Vector2,
}

impl Boid {
    pub fn new(x: f64, y: f64, xv: f64, yv: f64) -> Self {
        Boid {
            position: Vector2::new(x, y),
            velocity: Vector2::new(xv, yv),
        }
    }

    pub fn distance(&self, other: &Boid) -> f64 {
        distance(self.position, other.position)
    }

    pub fn update_position(&mut self) {
        self.position = add(self.position, self.velocity);
    }

    fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }
}

/// Boids other than `boids[index]` strictly closer than `radius`.
///
/// Exclusion is by index, so a boid coincident with the candidate is still a
/// neighbor while the candidate itself never is. A NaN distance never matches.
pub fn neighbors(boids: &[Boid], index: usize, radius: f64) -> impl Iterator<Item = &Boid> {
    let boid = boids[index];
    boids
        .iter()
        .enumerate()
        .filter(move |(other_idx, other)| *other_idx != index && boid.distance(other) < radius)
        .map(|(_, other)| other)
}

/// Blend `velocity` halfway toward the mean velocity of boids within
/// `radius`.
pub fn align(boids: &[Boid], index: usize, velocity: Vector2, radius: f64) -> Vector2 {
    let mut sum = Vector2::zeros();
    let mut count: usize = 0;
    for other in neighbors(boids, index, radius) {
        sum = add(sum, other.velocity);
        count += 1;
    }
    if count == 0 {
        return velocity;
    }
    let average = sum / count as f64;
    scale(add(velocity, average), 0.5)
}

/// Blend `velocity` halfway toward the mean unit vector pointing away from
/// each boid within `radius`.
pub fn separate(
    boids: &[Boid],
    index: usize,
    velocity: Vector2,
    radius: f64,
    zero_distance: ZeroDistance,
) -> Vector2 {
    let position = boids[index].position;
    let mut sum = Vector2::zeros();
    let mut count: usize = 0;
    for other in neighbors(boids, index, radius) {
        let diff = subtract(position, other.position);
        let dist = distance(position, other.position);
        if dist <= COINCIDENT {
            match zero_distance {
                ZeroDistance::Skip => continue,
                ZeroDistance::ZeroVector => {
                    count += 1;
                    continue;
                }
                ZeroDistance::Propagate => {}
            }
        }
        sum = add(sum, diff / dist);
        count += 1;
    }
    if count == 0 {
        return velocity;
    }
    let average = sum / count as f64;
    scale(add(velocity, average), 0.5)
}

/// Blend `velocity` halfway toward the raw offset from the boid to the
/// centroid of boids within `radius`. The offset is not normalized.
pub fn cohesion(boids: &[Boid], index: usize, velocity: Vector2, radius: f64) -> Vector2 {
    let position = boids[index].position;
    let mut sum = Vector2::zeros();
    let mut count: usize = 0;
    for other in neighbors(boids, index, radius) {
        sum = add(sum, other.position);
        count += 1;
    }
    if count == 0 {
        return velocity;
    }
    let centroid = sum / count as f64;
    let direction = subtract(centroid, position);
    scale(add(velocity, direction), 0.5)
}

/// New velocity for `boids[index]`: align, then separate, then cohesion, each
/// starting from the previous rule's output. The order changes trajectories.
pub fn flock_boid(boids: &[Boid], index: usize, params: &Parameters) -> Vector2 {
    let velocity = boids[index].velocity;
    let velocity = align(boids, index, velocity, params.align_radius);
    let velocity = separate(
        boids,
        index,
        velocity,
        params.separate_radius,
        params.zero_distance,
    );
    cohesion(boids, index, velocity, params.cohesion_radius)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flock {
    boids: Vec<Boid>,
    steps: u64,
}

impl Flock {
    pub fn new(boids: Vec<Boid>) -> Self {
        Flock { boids, steps: 0 }
    }

    /// Like [`Flock::new`] but rejects NaN or infinite components.
    pub fn try_new(boids: Vec<Boid>) -> Result<Self, FlockError> {
        if let Some(index) = boids.iter().position(|b| !b.is_finite()) {
            return Err(FlockError::InvalidInitialState { index });
        }
        Ok(Flock::new(boids))
    }

    /// Four boids in a row, 100 units apart, all moving at (1, 1).
    pub fn reference() -> Self {
        Flock::new(vec![
            Boid::new(100.0, 100.0, 1.0, 1.0),
            Boid::new(200.0, 100.0, 1.0, 1.0),
            Boid::new(300.0, 100.0, 1.0, 1.0),
            Boid::new(400.0, 100.0, 1.0, 1.0),
        ])
    }

    /// `count` boids spread over a `width` x `height` field.
    pub fn scatter(count: usize, width: f64, height: f64, max_speed: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let half = max_speed / 2.0;
        let boids = (0..count)
            .map(|_| {
                Boid::new(
                    rng.random_range(0.0..width),
                    rng.random_range(0.0..height),
                    rng.random_range(-half..half),
                    rng.random_range(-half..half),
                )
            })
            .collect();
        Flock::new(boids)
    }

    /// Reads a JSON array of `{"position": [x, y], "velocity": [vx, vy]}`.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, FlockError> {
        let boids: Vec<Boid> = serde_json::from_reader(reader)?;
        Flock::try_new(boids)
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Ticks completed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn positions(&self) -> Vec<Vector2> {
        self.boids.iter().map(|b| b.position).collect()
    }

    pub fn update_velocities(&mut self, params: &Parameters) {
        match params.visibility {
            Visibility::Sequential => {
                for index in 0..self.boids.len() {
                    let velocity = flock_boid(&self.boids, index, params);
                    self.boids[index].velocity = velocity;
                }
            }
            Visibility::Snapshot => {
                let new_velocities: Vec<Vector2> = self
                    .boids
                    .par_iter()
                    .enumerate()
                    .map(|(index, _)| flock_boid(&self.boids, index, params))
                    .collect();

                // apply the changes
                for (boid, velocity) in self.boids.iter_mut().zip(new_velocities) {
                    boid.velocity = velocity;
                }
            }
        }

        if let Some(index) = self.boids.iter().position(|b| !b.is_finite()) {
            warn!(step = self.steps, index, "boid velocity is no longer finite");
        }
    }

    pub fn update_positions(&mut self) {
        for boid in self.boids.iter_mut() {
            boid.update_position();
        }
    }

    /// One tick: every velocity first, then every position.
    pub fn step(&mut self, params: &Parameters) {
        self.update_velocities(params);
        self.update_positions();
        self.steps += 1;
        debug!(step = self.steps, boids = self.boids.len(), "tick complete");
    }

    /// Runs `steps` ticks, handing the flock to `observer` after each one.
    pub fn run<F>(
        &mut self,
        steps: u64,
        params: &Parameters,
        mut observer: F,
    ) -> Result<(), FlockError>
    where
        F: FnMut(&Flock) -> Result<(), FlockError>,
    {
        info!(
            steps,
            boids = self.boids.len(),
            visibility = ?params.visibility,
            "starting simulation"
        );
        for _ in 0..steps {
            self.step(params);
            observer(self)?;
        }
        info!(steps = self.steps, "simulation finished");
        Ok(())
    }
}
