//! Ground-contact proxy: a descent followed by an ascent at the end of the track.

use crate::track::BallTrackPoint;

/// True when the last three points show the ball falling by more than
/// `min_drop` and then rising. Image `y` grows downward.
///
/// With two points the prior delta is zero, so no bounce can be reported.
/// With fewer than two the check is not attempted.
pub fn detect_bounce(points: &[BallTrackPoint], min_drop: f64) -> bool {
    let n = points.len();
    if n < 2 {
        return false;
    }
    let last = &points[n - 1];
    let prev = &points[n - 2];
    let prev2 = if n >= 3 { &points[n - 3] } else { prev };

    let dy = last.cy - prev.cy;
    let dy_prev = prev.cy - prev2.cy;
    let bounced = dy_prev > 0.0 && dy < 0.0 && dy_prev.abs() > min_drop;
    log::trace!(
        "bounce check: dy_prev={:.4} dy={:.4} bounced={}",
        dy_prev,
        dy,
        bounced
    );
    bounced
}
