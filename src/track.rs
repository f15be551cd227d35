//! Ball trajectory and net reference extraction from a frame burst.

use serde::Serialize;

use crate::detect::{Frame, SelectionPolicy};
use crate::geometry::{center, BBox, Point};

/// Center of the selected ball detection in one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BallTrackPoint {
    pub t: f64,
    pub cx: f64,
    pub cy: f64,
    pub bbox: BBox,
    pub score: f64,
}

impl BallTrackPoint {
    pub fn center(&self) -> Point {
        [self.cx, self.cy]
    }
}

/// Everything the detectors need from one burst.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    /// One entry per frame that had a ball, in frame order.
    pub ball: Vec<BallTrackPoint>,
    /// First net box seen in the burst. Later frames never replace it.
    pub net_box: Option<BBox>,
}

impl Track {
    pub fn last(&self) -> Option<&BallTrackPoint> {
        self.ball.last()
    }

    pub fn len(&self) -> usize {
        self.ball.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ball.is_empty()
    }
}

/// Labels and selection rule used while scanning a burst.
#[derive(Clone, Copy, Debug)]
pub struct TrackExtractor<'a> {
    pub ball_label: &'a str,
    pub net_label: &'a str,
    pub selection: SelectionPolicy,
}

impl TrackExtractor<'_> {
    pub fn extract(&self, frames: &[Frame]) -> Track {
        let mut track = Track {
            ball: Vec::with_capacity(frames.len()),
            net_box: None,
        };
        for frame in frames {
            if let Some(ball) = self.selection.select(&frame.detections, self.ball_label) {
                let [cx, cy] = center(&ball.bbox);
                log::trace!("t={} ball center=({:.4}, {:.4})", frame.timestamp, cx, cy);
                track.ball.push(BallTrackPoint {
                    t: frame.timestamp,
                    cx,
                    cy,
                    bbox: ball.bbox,
                    score: ball.score,
                });
            }
            if track.net_box.is_none() {
                if let Some(net) = self.selection.select(&frame.detections, self.net_label) {
                    log::trace!("t={} net reference {:?}", frame.timestamp, net.bbox);
                    track.net_box = Some(net.bbox);
                }
            }
        }
        track
    }
}
