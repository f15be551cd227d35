//! Ball/net contact approximation.

use crate::geometry::iou;
use crate::track::Track;

/// IoU between the last ball box and the net reference.
///
/// Zero when the burst had no net or no ball. This is not a touch test: small
/// non-zero values are expected near the net and are filtered by the caller's
/// threshold.
pub fn net_overlap(track: &Track) -> f64 {
    match (track.last(), track.net_box.as_ref()) {
        (Some(ball), Some(net)) => iou(&ball.bbox, net),
        _ => 0.0,
    }
}
