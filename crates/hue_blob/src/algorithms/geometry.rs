//! Bounding geometry for integer contours.

use geo::{Area, ConvexHull};
use geo_types::{LineString, MultiPoint, Polygon};
use imageproc::point::Point;

use crate::types::{AxisRect, RotatedRect};

/// Shoelace area of the closed polygon through `points`.
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let coords: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect();
    Polygon::new(LineString::from(coords), vec![]).unsigned_area()
}

/// Smallest axis-aligned box covering every point, counting pixels
/// inclusively (a single point is 1x1).
pub fn bounding_rect(points: &[Point<i32>]) -> AxisRect {
    let Some(first) = points.first() else {
        return AxisRect::default();
    };

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    AxisRect {
        x: min_x,
        y: min_y,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    }
}

/// Minimum-area enclosing rectangle by rotating calipers over the hull.
///
/// One side of the optimal rectangle is collinear with a hull edge, so
/// each edge direction is tried. Edge vectors are turned by quarter turns
/// into the (0, 90] degree sector before normalising; that rotation is
/// exact, which keeps axis-aligned results free of rounding noise. On equal
/// area the first hull edge wins.
pub fn min_area_rect(points: &[Point<i32>]) -> RotatedRect {
    let Some(first) = points.first() else {
        return RotatedRect::default();
    };

    let cloud: MultiPoint<f64> = points
        .iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect::<Vec<_>>()
        .into();
    let hull = cloud.convex_hull();

    let mut vertices: Vec<(f64, f64)> = hull.exterior().coords().map(|c| (c.x, c.y)).collect();
    vertices.dedup();
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    if vertices.len() < 2 {
        return RotatedRect {
            center: (f64::from(first.x), f64::from(first.y)),
            width: 0.0,
            height: 0.0,
            angle: 0.0,
        };
    }

    let n = vertices.len();
    let mut best: Option<RotatedRect> = None;

    for i in 0..n {
        let (ax, ay) = vertices[i];
        let (bx, by) = vertices[(i + 1) % n];
        let (mut ex, mut ey) = (bx - ax, by - ay);
        if ex == 0.0 && ey == 0.0 {
            continue;
        }
        while !(ey > 0.0 && ex >= 0.0) {
            (ex, ey) = (-ey, ex);
        }

        let len = ex.hypot(ey);
        let u = (ex / len, ey / len);
        let v = (-u.1, u.0);

        let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(px, py) in &vertices {
            let pu = px * u.0 + py * u.1;
            let pv = px * v.0 + py * v.1;
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_v = min_v.min(pv);
            max_v = max_v.max(pv);
        }

        let width = max_u - min_u;
        let height = max_v - min_v;
        if best.is_some_and(|b| b.area() <= width * height) {
            continue;
        }

        let cu = (min_u + max_u) / 2.0;
        let cv = (min_v + max_v) / 2.0;
        best = Some(RotatedRect {
            center: (u.0 * cu + v.0 * cv, u.1 * cu + v.1 * cv),
            width,
            height,
            angle: u.1.atan2(u.0).to_degrees(),
        });
    }

    best.map(to_single_precision).unwrap_or(RotatedRect {
        center: (f64::from(first.x), f64::from(first.y)),
        width: 0.0,
        height: 0.0,
        angle: 0.0,
    })
}

/// Round every field through `f32`, the precision the legacy layout was
/// produced at.
fn to_single_precision(rect: RotatedRect) -> RotatedRect {
    let round = |value: f64| f64::from(value as f32);
    RotatedRect {
        center: (round(rect.center.0), round(rect.center.1)),
        width: round(rect.width),
        height: round(rect.height),
        angle: round(rect.angle),
    }
}

/// Corners of a rotated rectangle: bottom-left, top-left, top-right,
/// bottom-right when the angle is zero.
pub fn box_points(rect: &RotatedRect) -> [(f64, f64); 4] {
    let theta = rect.angle.to_radians();
    let b = theta.cos() * 0.5;
    let a = theta.sin() * 0.5;
    let (cx, cy) = rect.center;

    let p0 = (cx - a * rect.height - b * rect.width, cy + b * rect.height - a * rect.width);
    let p1 = (cx + a * rect.height - b * rect.width, cy - b * rect.height - a * rect.width);
    let p2 = (2.0 * cx - p0.0, 2.0 * cy - p0.1);
    let p3 = (2.0 * cx - p1.0, 2.0 * cy - p1.1);
    [p0, p1, p2, p3]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(i32, i32)]) -> Vec<Point<i32>> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_contour_area() {
        let square = pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(contour_area(&square), 100.0);

        let reversed: Vec<_> = square.iter().rev().copied().collect();
        assert_eq!(contour_area(&reversed), 100.0);

        assert_eq!(contour_area(&pts(&[(0, 0), (5, 5)])), 0.0);
    }

    #[test]
    fn test_bounding_rect_is_inclusive() {
        let rect = bounding_rect(&pts(&[(3, 4), (12, 4), (12, 23), (3, 23)]));
        assert_eq!(rect, AxisRect { x: 3, y: 4, width: 10, height: 20 });

        let single = bounding_rect(&pts(&[(7, 7)]));
        assert_eq!((single.width, single.height), (1, 1));
    }

    #[test]
    fn test_axis_aligned_rect_reports_ninety() {
        // 20 wide, 10 tall.
        let rect = min_area_rect(&pts(&[(0, 0), (20, 0), (20, 10), (0, 10)]));
        assert_eq!(rect.angle, 90.0);
        assert_eq!(rect.width, 10.0);
        assert_eq!(rect.height, 20.0);
        assert_eq!(rect.center, (10.0, 5.0));
    }

    #[test]
    fn test_diamond_reports_forty_five() {
        let rect = min_area_rect(&pts(&[(10, 0), (20, 10), (10, 20), (0, 10)]));
        assert!((rect.angle - 45.0).abs() < 1e-5);
        assert!((rect.width - 200f64.sqrt()).abs() < 1e-5);
        assert!((rect.height - 200f64.sqrt()).abs() < 1e-5);
        assert!((rect.center.0 - 10.0).abs() < 1e-5);
        assert!((rect.center.1 - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_tilted_rect_angle_range() {
        // Long side along (2, 1).
        let rect = min_area_rect(&pts(&[(0, 0), (40, 20), (35, 30), (-5, 10)]));
        assert!(rect.angle > 0.0 && rect.angle <= 90.0);
        assert!((rect.area() - contour_area(&pts(&[(0, 0), (40, 20), (35, 30), (-5, 10)]))).abs() < 1e-3);

        // Every field is exactly representable in single precision.
        assert!((rect.angle - 26.565_051).abs() < 1e-5);
        assert_eq!(rect.center, (17.5, 15.0));
        for value in [rect.center.0, rect.center.1, rect.width, rect.height, rect.angle] {
            assert_eq!(value, f64::from(value as f32));
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(min_area_rect(&[]), RotatedRect::default());

        let single = min_area_rect(&pts(&[(4, 6)]));
        assert_eq!(single.center, (4.0, 6.0));
        assert_eq!((single.width, single.height, single.angle), (0.0, 0.0, 0.0));

        let segment = min_area_rect(&pts(&[(0, 0), (10, 0)]));
        assert_eq!(segment.area(), 0.0);
        assert_eq!(segment.center, (5.0, 0.0));
    }

    #[test]
    fn test_box_points_cover_rect() {
        let rect = RotatedRect { center: (10.0, 5.0), width: 20.0, height: 10.0, angle: 0.0 };
        let corners = box_points(&rect);
        assert_eq!(corners, [(0.0, 10.0), (0.0, 0.0), (20.0, 0.0), (20.0, 10.0)]);
    }
}
