//! Wire form of one evaluation request and optional boundary validation.
//!
//! The engine never fails on bad geometry; it degrades to inconclusive or
//! propagates NaN. Callers that want malformed input rejected up front run
//! [`BurstRequest::validate`] before evaluating.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::detect::Frame;
use crate::engine::{LineCallEngine, DEFAULT_MIDLINE_X};
use crate::geometry::{BBox, Point};
use crate::verdict::Verdict;

fn default_midline_x() -> f64 {
    DEFAULT_MIDLINE_X
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BurstRequest {
    pub frames: Vec<Frame>,
    #[serde(alias = "court_polygon_normalized")]
    pub court_polygon: Vec<Point>,
    #[serde(default = "default_midline_x")]
    pub midline_x: f64,
}

impl BurstRequest {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid burst request")
    }

    /// Replace `midline_x` when an override is given.
    pub fn with_midline_override(mut self, midline_x: Option<f64>) -> Self {
        if let Some(midline_x) = midline_x {
            self.midline_x = midline_x;
        }
        self
    }

    pub fn evaluate_with(&self, engine: &LineCallEngine) -> Verdict {
        engine.evaluate(&self.frames, &self.court_polygon, self.midline_x)
    }

    /// Reject input the geometry primitives are not defined for.
    pub fn validate(&self) -> Result<()> {
        if !self.midline_x.is_finite() {
            return Err(anyhow!("validation: midline_x must be finite"));
        }
        if self.court_polygon.len() < 3 {
            return Err(anyhow!(
                "validation: court polygon needs at least 3 vertices, got {}",
                self.court_polygon.len()
            ));
        }
        for (i, vertex) in self.court_polygon.iter().enumerate() {
            if !vertex.iter().all(|c| c.is_finite()) {
                return Err(anyhow!("validation: court vertex {} is not finite", i));
            }
        }

        let mut last_ts = f64::NEG_INFINITY;
        for (i, frame) in self.frames.iter().enumerate() {
            if !frame.timestamp.is_finite() {
                return Err(anyhow!("validation: frame {} timestamp is not finite", i));
            }
            if frame.timestamp < last_ts {
                return Err(anyhow!(
                    "validation: frame {} timestamp {} precedes {}",
                    i,
                    frame.timestamp,
                    last_ts
                ));
            }
            last_ts = frame.timestamp;

            for (j, det) in frame.detections.iter().enumerate() {
                validate_bbox(&det.bbox)
                    .with_context(|| format!("validation: frame {} detection {}", i, j))?;
                if !det.score.is_finite() || !(0.0..=1.0).contains(&det.score) {
                    return Err(anyhow!(
                        "validation: frame {} detection {} score {} outside [0, 1]",
                        i,
                        j,
                        det.score
                    ));
                }
            }
        }
        Ok(())
    }
}

fn validate_bbox(b: &BBox) -> Result<()> {
    if let Some(c) = b
        .iter()
        .find(|c| !c.is_finite() || !(0.0..=1.0).contains(*c))
    {
        return Err(anyhow!("bbox coordinate {} outside normalized range", c));
    }
    if b[0] > b[2] || b[1] > b[3] {
        return Err(anyhow!("bbox {:?} is inverted", b));
    }
    Ok(())
}
