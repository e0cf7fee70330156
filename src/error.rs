use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlockError {
    #[error("{name} radius must be finite and positive, got {value}")]
    InvalidRadius { name: &'static str, value: f64 },
    #[error("boid {index} has a non-finite position or velocity")]
    InvalidInitialState { index: usize },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
