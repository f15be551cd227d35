//! Line-call inference engine
//!
//! Turns a short burst of per-frame ball and net detections around a disputed
//! moment into an officiating recommendation: `in`, `out`, `net` or
//! `inconclusive`, with a confidence score.
//!
//! # Architecture
//!
//! The engine is a pure function of its inputs:
//!
//! 1. **Track extraction**: one ball center per frame that has a ball, plus the
//!    first net box seen in the burst.
//! 2. **Signals**: ball/net IoU, and a descend-then-ascend bounce check on the
//!    last three ball points.
//! 3. **Composition**: net beats bounce; a bounce is `in` or `out` depending on
//!    whether the last ball center lies inside the court polygon.
//!
//! It performs no I/O and holds no state between calls. Every degenerate input
//! (empty bursts, missing detections, short polygons) degrades to
//! `inconclusive`; nothing in the evaluation path returns an error.
//!
//! This is decision support, not a certified adjudicator.
//!
//! # Module Structure
//!
//! - `geometry`: box area, IoU, point-in-polygon
//! - `detect`: detection/frame model and per-frame selection policy
//! - `track`, `bounce`, `net`: signal extraction
//! - `engine`: precedence policy (`LineCallEngine`)
//! - `config`: thresholds and confidence bands (file + env)
//! - `burst`: request wire form and boundary validation

pub mod bounce;
pub mod burst;
pub mod config;
pub mod detect;
pub mod engine;
pub mod geometry;
pub mod net;
pub mod track;
pub mod verdict;

pub use burst::BurstRequest;
pub use config::{ConfidenceBands, EngineConfig, Thresholds};
pub use detect::{Detection, Frame, SelectionPolicy};
pub use engine::{LineCallEngine, DEFAULT_MIDLINE_X, MIN_TRACK_POINTS};
pub use geometry::{area, iou, point_in_polygon, BBox, Point};
pub use track::{BallTrackPoint, Track};
pub use verdict::{Recommendation, Verdict};

/// Evaluate a burst with the stock thresholds and confidence bands.
pub fn evaluate(frames: &[Frame], court_polygon: &[Point], midline_x: f64) -> Verdict {
    LineCallEngine::default().evaluate(frames, court_polygon, midline_x)
}

// -------------------- Conformance Tests --------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: [Point; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    fn ball_frame(t: f64, bbox: BBox) -> Frame {
        Frame::new(t, vec![Detection::new("ball", bbox, 0.9)])
    }

    /// Zero-size ball boxes so the center is exactly `(cx, cy)`.
    fn trajectory(cx: f64, cys: &[f64]) -> Vec<Frame> {
        cys.iter()
            .enumerate()
            .map(|(i, &cy)| ball_frame(i as f64, [cx, cy, cx, cy]))
            .collect()
    }

    #[test]
    fn conformance_short_track_is_low_inconclusive() {
        let net = Detection::new("net", [0.0, 0.0, 1.0, 1.0], 0.9);
        let bursts = vec![
            vec![],
            vec![Frame::new(0.0, vec![net.clone()])],
            vec![Frame::new(
                0.0,
                vec![Detection::new("ball", [0.4, 0.4, 0.6, 0.6], 0.9), net],
            )],
            trajectory(0.5, &[0.3]),
        ];
        let no_court: [Point; 0] = [];
        for frames in bursts {
            for polygon in [&SQUARE[..], &no_court[..]] {
                let verdict = evaluate(&frames, polygon, DEFAULT_MIDLINE_X);
                assert_eq!(verdict.recommendation, Recommendation::Inconclusive);
                assert_eq!(verdict.confidence, 0.2);
                assert!(verdict.meta.is_empty());
            }
        }
    }

    #[test]
    fn conformance_net_call() {
        let frames = vec![
            ball_frame(0.0, [0.40, 0.30, 0.44, 0.34]),
            Frame::new(
                1.0,
                vec![
                    Detection::new("ball", [0.48, 0.50, 0.52, 0.54], 0.9),
                    Detection::new("net", [0.45, 0.48, 0.55, 0.56], 0.8),
                ],
            ),
        ];
        let verdict = evaluate(&frames, &SQUARE, DEFAULT_MIDLINE_X);
        let overlap = iou(&[0.48, 0.50, 0.52, 0.54], &[0.45, 0.48, 0.55, 0.56]);
        assert_eq!(verdict.recommendation, Recommendation::Net);
        assert_eq!(verdict.confidence, (0.6 + overlap).min(0.95));
        assert_eq!(verdict.meta["net_overlap"], overlap);
    }

    #[test]
    fn conformance_bounce_inside_is_in() {
        let verdict = evaluate(&trajectory(0.5, &[0.30, 0.50, 0.35]), &SQUARE, 0.5);
        assert_eq!(verdict.recommendation, Recommendation::In);
        assert_eq!(verdict.confidence, 0.8);
        assert!(verdict.meta.is_empty());
    }

    #[test]
    fn conformance_bounce_outside_is_out() {
        let verdict = evaluate(&trajectory(1.5, &[0.30, 0.50, 0.35]), &SQUARE, 0.5);
        assert_eq!(verdict.recommendation, Recommendation::Out);
        assert_eq!(verdict.confidence, 0.85);
    }

    #[test]
    fn conformance_no_bounce_no_net() {
        let verdict = evaluate(&trajectory(0.5, &[0.1, 0.2, 0.3]), &SQUARE, 0.5);
        assert_eq!(verdict.recommendation, Recommendation::Inconclusive);
        assert_eq!(verdict.confidence, 0.35);
    }

    #[test]
    fn conformance_jitter_boundary() {
        let verdict = evaluate(&trajectory(0.5, &[0.0, 0.01, 0.0]), &SQUARE, 0.5);
        assert_eq!(verdict.recommendation, Recommendation::Inconclusive);
        assert_eq!(verdict.confidence, 0.35);
    }

    #[test]
    fn conformance_net_box_from_earlier_frame_is_kept() {
        let mut frames = trajectory(0.5, &[0.30, 0.50]);
        frames.insert(
            0,
            Frame::new(-1.0, vec![Detection::new("net", [0.45, 0.48, 0.55, 0.56], 0.8)]),
        );
        frames.push(Frame::new(
            2.0,
            vec![
                Detection::new("ball", [0.48, 0.50, 0.52, 0.54], 0.9),
                Detection::new("net", [0.0, 0.0, 0.01, 0.01], 0.99),
            ],
        ));
        let verdict = evaluate(&frames, &SQUARE, 0.5);
        assert_eq!(verdict.recommendation, Recommendation::Net);
    }
}
