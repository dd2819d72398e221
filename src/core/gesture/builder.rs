use crate::shared::types::{GestureRequest, Point, StrokePath};

/// Coerce a raw duration into the range the capability accepts.
///
/// Zero and negative inputs become 1; values above `max_ms` are capped.
pub fn clamp_duration(duration_ticks: i64, max_ms: u64) -> u64 {
    let max_ms = max_ms.max(1);
    if duration_ticks < 1 {
        1
    } else {
        (duration_ticks as u64).min(max_ms)
    }
}

/// Same position, including identical non-finite coordinates
fn coincide(a: Point, b: Point) -> bool {
    a == b || (a.x.to_bits() == b.x.to_bits() && a.y.to_bits() == b.y.to_bits())
}

/// Pure mapping from logical gesture requests to stroke paths
#[derive(Debug, Clone, Copy)]
pub struct GestureBuilder {
    max_duration_ms: u64,
}

impl GestureBuilder {
    pub fn new(max_duration_ms: u64) -> Self {
        Self { max_duration_ms }
    }

    /// A tap is a single point. A swipe is a line from start to end, which
    /// collapses to a single point when both ends coincide.
    pub fn build(&self, request: &GestureRequest) -> StrokePath {
        let mut points = vec![request.start];
        if !coincide(request.start, request.end) {
            points.push(request.end);
        }

        StrokePath {
            points,
            duration_ms: clamp_duration(request.duration_ticks, self.max_duration_ms),
        }
    }
}

impl Default for GestureBuilder {
    fn default() -> Self {
        Self::new(crate::shared::settings::GestureSettings::default().max_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_duration_becomes_one() {
        for ticks in [0, -1, -50, i64::MIN] {
            assert_eq!(clamp_duration(ticks, 60_000), 1, "ticks = {}", ticks);
        }
        assert_eq!(clamp_duration(1, 60_000), 1);
        assert_eq!(clamp_duration(50, 60_000), 50);
    }

    #[test]
    fn test_duration_capped_at_max() {
        assert_eq!(clamp_duration(i64::MAX, 60_000), 60_000);
        assert_eq!(clamp_duration(10, 0), 1);
    }

    #[test]
    fn test_tap_is_single_point() {
        let path = GestureBuilder::default().build(&GestureRequest::tap(Point::new(100.0, 200.0), 50));
        assert_eq!(path.points, vec![Point::new(100.0, 200.0)]);
        assert_eq!(path.duration_ms, 50);
        assert!(path.is_point());
    }

    #[test]
    fn test_swipe_is_two_points() {
        let path = GestureBuilder::default().build(&GestureRequest::swipe(
            Point::new(0.0, 0.0),
            Point::new(300.0, 400.0),
            -5,
        ));
        assert_eq!(path.points, vec![Point::new(0.0, 0.0), Point::new(300.0, 400.0)]);
        assert_eq!(path.duration_ms, 1);
    }

    #[test]
    fn test_degenerate_swipe_equals_tap() {
        let builder = GestureBuilder::default();
        let at = Point::new(42.0, 7.5);
        assert_eq!(
            builder.build(&GestureRequest::swipe(at, at, 100)),
            builder.build(&GestureRequest::tap(at, 100))
        );
    }

    #[test]
    fn test_nan_degenerate_swipe_is_single_point() {
        let builder = GestureBuilder::default();
        let at = Point::new(f64::NAN, 10.0);
        let swipe = builder.build(&GestureRequest::swipe(at, at, 100));
        let tap = builder.build(&GestureRequest::tap(at, 100));

        assert_eq!(swipe.points.len(), 1);
        assert_eq!(tap.points.len(), 1);
        assert_eq!(swipe.points[0].x.to_bits(), tap.points[0].x.to_bits());
        assert_eq!(swipe.duration_ms, tap.duration_ms);
    }

    #[test]
    fn test_distinct_nan_endpoints_stay_a_line() {
        let path = GestureBuilder::default().build(&GestureRequest::swipe(
            Point::new(f64::NAN, 0.0),
            Point::new(f64::NAN, 5.0),
            100,
        ));
        assert_eq!(path.points.len(), 2);
    }
}
