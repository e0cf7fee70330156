//! Position stream written after every tick.

use std::io::Write;
use std::str::FromStr;

use serde::Serialize;

use crate::boids::Flock;
use crate::error::FlockError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// `Boid at position (x, y)` with six decimals.
    #[default]
    Text,
    /// One JSON object per boid per line.
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format `{other}`, expected `text` or `json`")),
        }
    }
}

#[derive(Debug, Serialize)]
struct PositionRecord {
    step: u64,
    index: usize,
    x: f64,
    y: f64,
}

/// Writes one line per boid, in flock order.
pub fn write_positions<W: Write>(
    writer: &mut W,
    flock: &Flock,
    format: Format,
) -> Result<(), FlockError> {
    for (index, position) in flock.positions().into_iter().enumerate() {
        match format {
            Format::Text => {
                writeln!(writer, "Boid at position ({:.6}, {:.6})", position.x, position.y)?;
            }
            Format::Json => {
                let record = PositionRecord {
                    step: flock.steps(),
                    index,
                    x: position.x,
                    y: position.y,
                };
                serde_json::to_writer(&mut *writer, &record)?;
                writeln!(writer)?;
            }
        }
    }
    Ok(())
}
