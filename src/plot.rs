//! The consumer of the training cost curve.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;

/// Anything that renders `(x, y)` pairs, e.g. `(epoch, cost)`.
pub trait PointSink {
    fn scatter(&mut self, points: &[(f64, f64)]) -> Result<()>;
}

/// Writes one `x,y` line per point.
#[derive(Debug, Clone)]
pub struct TextPoints {
    path: PathBuf,
}

impl TextPoints {
    pub fn new(path: impl AsRef<Path>) -> Self {
        TextPoints {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointSink for TextPoints {
    fn scatter(&mut self, points: &[(f64, f64)]) -> Result<()> {
        let mut out = BufWriter::new(File::create(&self.path)?);
        for (x, y) in points {
            writeln!(out, "{x},{y}")?;
        }
        out.flush()?;
        info!("wrote {} points to {}", points.len(), self.path.display());
        Ok(())
    }
}

/// Keeps the points in memory.
impl PointSink for Vec<(f64, f64)> {
    fn scatter(&mut self, points: &[(f64, f64)]) -> Result<()> {
        self.extend_from_slice(points);
        Ok(())
    }
}
