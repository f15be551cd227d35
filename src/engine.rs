//! Verdict composition.
//!
//! Signals are resolved in a fixed order. The first rule that fires wins:
//!
//! 1. fewer than two ball points: inconclusive (low band)
//! 2. ball/net IoU above threshold: net, confidence scaled by the overlap
//! 3. bounce outside the court polygon: out
//! 4. bounce inside the court polygon: in
//! 5. no bounce: inconclusive

use crate::bounce::detect_bounce;
use crate::config::EngineConfig;
use crate::detect::Frame;
use crate::geometry::{point_in_polygon, Point};
use crate::net::net_overlap;
use crate::track::{Track, TrackExtractor};
use crate::verdict::{Recommendation, Verdict, META_NET_OVERLAP};

/// Minimum ball points before any signal is trusted.
pub const MIN_TRACK_POINTS: usize = 2;

/// Default side-of-court reference.
pub const DEFAULT_MIDLINE_X: f64 = 0.5;

/// Stateless line-call evaluator. Share it freely across threads.
#[derive(Clone, Debug, Default)]
pub struct LineCallEngine {
    config: EngineConfig,
}

impl LineCallEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Evaluate one burst against a court polygon.
    ///
    /// `midline_x` is accepted for side-of-court logic but not consulted yet.
    pub fn evaluate(&self, frames: &[Frame], court_polygon: &[Point], midline_x: f64) -> Verdict {
        log::trace!(
            "evaluating {} frames, {} court vertices, midline_x={}",
            frames.len(),
            court_polygon.len(),
            midline_x
        );
        let track = self.extract_track(frames);
        self.compose(&track, court_polygon)
    }

    pub fn extract_track(&self, frames: &[Frame]) -> Track {
        TrackExtractor {
            ball_label: &self.config.ball_label,
            net_label: &self.config.net_label,
            selection: self.config.selection,
        }
        .extract(frames)
    }

    /// Apply the precedence policy to an already extracted track.
    pub fn compose(&self, track: &Track, court_polygon: &[Point]) -> Verdict {
        let bands = &self.config.confidence;
        let thresholds = &self.config.thresholds;

        let last = match track.last() {
            Some(last) if track.len() >= MIN_TRACK_POINTS => last,
            _ => {
                log::debug!(
                    "inconclusive: {} ball points (need {})",
                    track.len(),
                    MIN_TRACK_POINTS
                );
                return Verdict::new(Recommendation::Inconclusive, bands.insufficient_track);
            }
        };

        let overlap = net_overlap(track);
        if overlap > thresholds.net_overlap {
            let confidence = (bands.net_base + overlap).min(bands.net_cap);
            log::debug!("net: overlap={:.4} confidence={:.3}", overlap, confidence);
            return Verdict::new(Recommendation::Net, confidence).with_meta(META_NET_OVERLAP, overlap);
        }

        let bounced = detect_bounce(&track.ball, thresholds.bounce_min_drop);
        if !bounced {
            log::debug!("inconclusive: no bounce in {} points", track.len());
            return Verdict::new(Recommendation::Inconclusive, bands.no_bounce);
        }

        let inside = point_in_polygon(&last.center(), court_polygon);
        log::debug!(
            "bounce at ({:.4}, {:.4}) inside={}",
            last.cx,
            last.cy,
            inside
        );
        if inside {
            Verdict::new(Recommendation::In, bands.inside)
        } else {
            Verdict::new(Recommendation::Out, bands.out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Detection, SelectionPolicy};

    const SQUARE: [Point; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    fn ball(cx: f64, cy: f64) -> Detection {
        Detection::new("ball", [cx - 0.01, cy - 0.01, cx + 0.01, cy + 0.01], 0.9)
    }

    fn burst(cx: f64, cys: &[f64]) -> Vec<Frame> {
        cys.iter()
            .enumerate()
            .map(|(i, &cy)| Frame::new(i as f64 * 0.033, vec![ball(cx, cy)]))
            .collect()
    }

    #[test]
    fn net_takes_precedence_over_bounce() {
        let mut frames = burst(0.5, &[0.30, 0.60, 0.52]);
        frames[0]
            .detections
            .push(Detection::new("net", [0.45, 0.48, 0.55, 0.56], 0.8));
        // descent then ascent, last ball sitting on the net
        frames[2].detections[0] = Detection::new("ball", [0.48, 0.50, 0.52, 0.54], 0.9);
        let verdict = LineCallEngine::default().evaluate(&frames, &SQUARE, DEFAULT_MIDLINE_X);
        assert_eq!(verdict.recommendation, Recommendation::Net);
        assert!((verdict.confidence - 0.8).abs() < 1e-9);
        assert!((verdict.meta[META_NET_OVERLAP] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn net_confidence_is_capped() {
        let frames = vec![
            Frame::new(0.0, vec![Detection::new("ball", [0.4, 0.4, 0.6, 0.6], 0.9)]),
            Frame::new(
                1.0,
                vec![
                    Detection::new("ball", [0.4, 0.4, 0.6, 0.6], 0.9),
                    Detection::new("net", [0.4, 0.4, 0.6, 0.6], 0.9),
                ],
            ),
        ];
        let verdict = LineCallEngine::default().evaluate(&frames, &SQUARE, DEFAULT_MIDLINE_X);
        assert_eq!(verdict.recommendation, Recommendation::Net);
        assert_eq!(verdict.confidence, 0.95);
        assert_eq!(verdict.meta[META_NET_OVERLAP], 1.0);
    }

    #[test]
    fn overlap_at_threshold_is_not_a_net_call() {
        let mut config = EngineConfig::default();
        config.thresholds.net_overlap = 1.0;
        let frames = vec![
            Frame::new(0.0, vec![Detection::new("ball", [0.4, 0.4, 0.6, 0.6], 0.9)]),
            Frame::new(
                1.0,
                vec![
                    Detection::new("ball", [0.4, 0.4, 0.6, 0.6], 0.9),
                    Detection::new("net", [0.4, 0.4, 0.6, 0.6], 0.9),
                ],
            ),
        ];
        let verdict = LineCallEngine::new(config).evaluate(&frames, &SQUARE, DEFAULT_MIDLINE_X);
        assert_eq!(verdict.recommendation, Recommendation::Inconclusive);
        assert_eq!(verdict.confidence, 0.35);
        assert!(verdict.meta.is_empty());
    }

    #[test]
    fn two_points_cannot_bounce() {
        let verdict =
            LineCallEngine::default().evaluate(&burst(0.5, &[0.5, 0.3]), &SQUARE, DEFAULT_MIDLINE_X);
        assert_eq!(verdict.recommendation, Recommendation::Inconclusive);
        assert_eq!(verdict.confidence, 0.35);
    }

    #[test]
    fn degenerate_polygon_turns_bounce_out() {
        let verdict = LineCallEngine::default().evaluate(
            &burst(0.5, &[0.30, 0.50, 0.35]),
            &[[0.0, 0.0], [1.0, 1.0]],
            DEFAULT_MIDLINE_X,
        );
        assert_eq!(verdict.recommendation, Recommendation::Out);
    }

    #[test]
    fn midline_does_not_change_the_call() {
        let engine = LineCallEngine::default();
        let frames = burst(0.5, &[0.30, 0.50, 0.35]);
        let base = engine.evaluate(&frames, &SQUARE, DEFAULT_MIDLINE_X);
        for midline in [0.0, 0.25, 0.9, 3.0] {
            assert_eq!(engine.evaluate(&frames, &SQUARE, midline), base);
        }
    }

    #[test]
    fn custom_bands_flow_through() {
        let mut config = EngineConfig::default();
        config.confidence.inside = 0.7;
        config.confidence.insufficient_track = 0.1;
        let engine = LineCallEngine::new(config);
        assert_eq!(
            engine
                .evaluate(&burst(0.5, &[0.30, 0.50, 0.35]), &SQUARE, DEFAULT_MIDLINE_X)
                .confidence,
            0.7
        );
        assert_eq!(engine.evaluate(&[], &SQUARE, DEFAULT_MIDLINE_X).confidence, 0.1);
    }

    #[test]
    fn custom_labels_are_honored() {
        let config = EngineConfig {
            ball_label: "pickleball".to_string(),
            selection: SelectionPolicy::HighestScore,
            ..EngineConfig::default()
        };
        let frames: Vec<Frame> = [0.30, 0.50, 0.35]
            .iter()
            .enumerate()
            .map(|(i, &cy)| {
                Frame::new(
                    i as f64,
                    vec![Detection::new("pickleball", [0.49, cy - 0.01, 0.51, cy + 0.01], 0.9)],
                )
            })
            .collect();
        let verdict = LineCallEngine::new(config).evaluate(&frames, &SQUARE, DEFAULT_MIDLINE_X);
        assert_eq!(verdict.recommendation, Recommendation::In);
        let stock = LineCallEngine::default().evaluate(&frames, &SQUARE, DEFAULT_MIDLINE_X);
        assert_eq!(stock.confidence, 0.2);
    }
}
