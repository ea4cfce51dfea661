//! Planar helpers in floorplan pixel space

use geo::{Distance, Euclidean, Line, Point};

use crate::INTERSECTION_EPSILON_PX;

/// Euclidean distance in pixels
pub fn distance(a: Point<f64>, b: Point<f64>) -> f64 {
    Euclidean.distance(a, b)
}

/// Intersection point of two line segments.
///
/// The point must fall inside the bounding extents of both segments, each
/// bound widened by [`INTERSECTION_EPSILON_PX`]. Parallel and collinear
/// segments never intersect here, even when they overlap.
pub fn segment_intersection(a: Line<f64>, b: Line<f64>) -> Option<Point<f64>> {
    let (x1, y1) = a.start.x_y();
    let (x2, y2) = a.end.x_y();
    let (x3, y3) = b.start.x_y();
    let (x4, y4) = b.end.x_y();

    let det = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if det.abs() < f64::EPSILON {
        return None;
    }

    let cross_a = x1 * y2 - y1 * x2;
    let cross_b = x3 * y4 - y3 * x4;
    let px = (cross_a * (x3 - x4) - (x1 - x2) * cross_b) / det;
    let py = (cross_a * (y3 - y4) - (y1 - y2) * cross_b) / det;
    let point = Point::new(px, py);

    (within_extent(point, a) && within_extent(point, b)).then_some(point)
}

fn within_extent(point: Point<f64>, line: Line<f64>) -> bool {
    let eps = INTERSECTION_EPSILON_PX;
    let (min_x, max_x) = min_max(line.start.x, line.end.x);
    let (min_y, max_y) = min_max(line.start.y, line.end.y);

    point.x() >= min_x - eps
        && point.x() <= max_x + eps
        && point.y() >= min_y - eps
        && point.y() <= max_y + eps
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// True if any of `nodes` lies within `threshold_px` of `point`
pub fn is_near_existing_node<I>(point: Point<f64>, nodes: I, threshold_px: f64) -> bool
where
    I: IntoIterator<Item = Point<f64>>,
{
    nodes
        .into_iter()
        .any(|node| distance(point, node) <= threshold_px)
}

/// Shortest distance from `point` to the segment `a`-`b`, or to `a` when
/// the segment has no length
pub fn point_segment_distance(point: Point<f64>, a: Point<f64>, b: Point<f64>) -> f64 {
    Euclidean.distance(&point, &Line::new(a, b))
}

#[cfg(test)]
mod tests {
    use geo::Coord;

    use super::*;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line<f64> {
        Line::new(Coord { x: x1, y: y1 }, Coord { x: x2, y: y2 })
    }

    #[test]
    fn distance_is_euclidean() {
        let d = distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn crossing_segments_intersect_at_center() {
        let p = segment_intersection(line(0.0, 0.0, 10.0, 10.0), line(0.0, 10.0, 10.0, 0.0))
            .expect("segments cross");
        assert!((p.x() - 5.0).abs() < 1e-9);
        assert!((p.y() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn lines_crossing_outside_extent_do_not_intersect() {
        // Infinite lines meet at (20, 20), beyond the first segment
        assert!(
            segment_intersection(line(0.0, 0.0, 10.0, 10.0), line(30.0, 10.0, 40.0, 0.0)).is_none()
        );
    }

    #[test]
    fn parallel_and_collinear_segments_report_nothing() {
        assert!(segment_intersection(line(0.0, 0.0, 10.0, 0.0), line(0.0, 5.0, 10.0, 5.0)).is_none());
        // Overlapping collinear segments are a known blind spot
        assert!(segment_intersection(line(0.0, 0.0, 10.0, 0.0), line(5.0, 0.0, 15.0, 0.0)).is_none());
    }

    #[test]
    fn tolerance_admits_touching_axis_aligned_segments() {
        // Vertical segment ends exactly on the horizontal one
        let p = segment_intersection(line(0.0, 0.0, 10.0, 0.0), line(5.0, 0.0, 5.0, 10.0));
        assert!(p.is_some());
    }

    #[test]
    fn near_node_threshold_is_inclusive() {
        let nodes = [Point::new(0.0, 0.0), Point::new(100.0, 100.0)];
        assert!(is_near_existing_node(Point::new(6.0, 8.0), nodes, 10.0));
        assert!(!is_near_existing_node(Point::new(50.0, 50.0), nodes, 10.0));
        assert!(!is_near_existing_node(Point::new(0.0, 0.0), [], 10.0));
    }

    #[test]
    fn point_segment_distance_projects_and_clamps() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_segment_distance(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((point_segment_distance(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((point_segment_distance(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-12);

        let diagonal = point_segment_distance(Point::new(0.0, 10.0), a, Point::new(10.0, 10.0));
        assert!((diagonal - 50.0_f64.sqrt()).abs() < 1e-9);
    }
}
