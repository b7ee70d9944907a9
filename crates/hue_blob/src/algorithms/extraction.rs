use image::GrayImage;
use imageproc::{
    contours::{find_contours, BorderType},
    point::Point,
};
use crate::{error::Result, traits::ContourExtractor, types::Contour};

/// Outer boundaries of top-level regions only; holes and anything nested
/// inside a hole are skipped. Straight runs are reduced to their endpoints.
#[derive(Debug, Clone, Default)]
pub struct ExternalContourExtractor;

impl ContourExtractor for ExternalContourExtractor {
    fn extract(&self, mask: &GrayImage) -> Result<Vec<Contour>> {
        let contours = find_contours::<i32>(mask);

        let result = contours
            .into_iter()
            .filter(|contour| matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none())
            .map(|contour| Contour::new(compress_chain(&contour.points)))
            .collect();

        Ok(result)
    }
}

/// Drop every point whose incoming and outgoing steps point the same way.
///
/// Border following yields unit 8-neighbour steps, so equal steps mean the
/// point sits inside a horizontal, vertical or diagonal run.
pub fn compress_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let kept: Vec<Point<i32>> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            (cur.x - prev.x, cur.y - prev.y) != (next.x - cur.x, next.y - cur.y)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() { points[..1].to_vec() } else { kept }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill(mask: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
    }

    #[test]
    fn test_rectangle_reduces_to_corners() {
        let mut mask = GrayImage::new(40, 40);
        fill(&mut mask, 5, 8, 20, 10);

        let contours = ExternalContourExtractor.extract(&mask).expect("Should extract");
        assert_eq!(contours.len(), 1);

        let mut corners: Vec<(i32, i32)> = contours[0].points.iter().map(|p| (p.x, p.y)).collect();
        corners.sort();
        assert_eq!(corners, vec![(5, 8), (5, 17), (24, 8), (24, 17)]);
    }

    #[test]
    fn test_holes_and_nested_regions_are_ignored() {
        let mut mask = GrayImage::new(60, 60);
        fill(&mut mask, 5, 5, 50, 50);
        // Hole.
        for y in 15..45 {
            for x in 15..45 {
                mask.put_pixel(x, y, Luma([0u8]));
            }
        }
        // Island inside the hole.
        fill(&mut mask, 25, 25, 10, 10);

        let contours = ExternalContourExtractor.extract(&mask).expect("Should extract");
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].area(), 49.0 * 49.0);
    }

    #[test]
    fn test_separate_regions() {
        let mut mask = GrayImage::new(60, 30);
        fill(&mut mask, 2, 2, 10, 10);
        fill(&mut mask, 30, 5, 20, 20);
        let contours = ExternalContourExtractor.extract(&mask).expect("Should extract");
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn test_empty_mask() {
        let mask = GrayImage::new(10, 10);
        let contours = ExternalContourExtractor.extract(&mask).expect("Should extract");
        assert!(contours.is_empty());
    }

    #[test]
    fn test_compress_keeps_short_chains() {
        let points = vec![Point::new(1, 1), Point::new(2, 1)];
        assert_eq!(compress_chain(&points), points);
    }
}
