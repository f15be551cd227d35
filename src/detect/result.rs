use serde::{Deserialize, Serialize};

use crate::geometry::BBox;

/// One recognized object in one frame, as produced by the upstream detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Open vocabulary. Only the configured ball and net labels are consumed.
    pub label: String,
    /// Normalized `[x1, y1, x2, y2]`.
    pub bbox: BBox,
    #[serde(default)]
    pub score: f64,
    /// Segmentation mask. Carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<serde_json::Value>,
}

impl Detection {
    pub fn new(label: &str, bbox: BBox, score: f64) -> Self {
        Self {
            label: label.to_string(),
            bbox,
            score,
            mask: None,
        }
    }
}

/// One sampled video frame. Frames in a burst are ordered by `timestamp`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(alias = "t")]
    pub timestamp: f64,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl Frame {
    pub fn new(timestamp: f64, detections: Vec<Detection>) -> Self {
        Self {
            timestamp,
            detections,
        }
    }
}
