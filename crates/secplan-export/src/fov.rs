//! Field-of-view cone geometry.
//!
//! Builds the polygon rendered behind camera glyphs: an apex at the
//! camera center and an arc of `angle_deg` opening centered on
//! `rotation_deg`, with radius `distance`. Angles follow the page
//! convention: 0 degrees points along +X and positive rotation turns
//! clockwise on the Y-down page.

use secplan_project::model::FovSettings;

/// Chord segments per 90 degrees of arc.
const SEGMENTS_PER_QUARTER: usize = 8;

/// Vertices of the cone polygon in page coordinates, apex first.
///
/// A full-circle FOV (360 degrees or more) omits the apex and yields a
/// closed circle polygon instead.
pub fn cone_polygon(center_x: f64, center_y: f64, fov: &FovSettings) -> Vec<(f64, f64)> {
    let angle = fov.angle_deg.clamp(1.0, 360.0);
    let full_circle = angle >= 360.0;

    let segments =
        ((angle / 90.0) * SEGMENTS_PER_QUARTER as f64).ceil().max(2.0) as usize;
    let start_deg = fov.rotation_deg - angle / 2.0;
    let step = angle / segments as f64;

    let mut points = Vec::with_capacity(segments + 2);
    if !full_circle {
        points.push((center_x, center_y));
    }
    for i in 0..=segments {
        let theta = (start_deg + step * i as f64).to_radians();
        points.push((
            center_x + fov.distance * theta.cos(),
            center_y + fov.distance * theta.sin(),
        ));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fov(angle_deg: f64, distance: f64, rotation_deg: f64) -> FovSettings {
        FovSettings {
            angle_deg,
            distance,
            rotation_deg,
        }
    }

    #[test]
    fn cone_starts_at_the_apex() {
        let points = cone_polygon(10.0, 20.0, &fov(90.0, 100.0, 0.0));
        assert_eq!(points[0], (10.0, 20.0));
        // Every arc vertex sits exactly `distance` from the apex
        for &(x, y) in &points[1..] {
            let r = ((x - 10.0).powi(2) + (y - 20.0).powi(2)).sqrt();
            assert!((r - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn arc_is_centered_on_the_rotation() {
        let points = cone_polygon(0.0, 0.0, &fov(60.0, 50.0, 0.0));
        let first = points[1];
        let last = *points.last().unwrap();
        // Edges at -30 and +30 degrees
        assert!((first.0 - 50.0 * 30f64.to_radians().cos()).abs() < 1e-9);
        assert!((first.1 + 50.0 * 30f64.to_radians().sin()).abs() < 1e-9);
        assert!((last.1 - 50.0 * 30f64.to_radians().sin()).abs() < 1e-9);
    }

    #[test]
    fn full_circle_omits_the_apex() {
        let points = cone_polygon(5.0, 5.0, &fov(360.0, 30.0, 45.0));
        for &(x, y) in &points {
            let r = ((x - 5.0).powi(2) + (y - 5.0).powi(2)).sqrt();
            assert!((r - 30.0).abs() < 1e-9);
        }
        // Closed: first and last vertex coincide
        let first = points[0];
        let last = *points.last().unwrap();
        assert!((first.0 - last.0).abs() < 1e-9);
        assert!((first.1 - last.1).abs() < 1e-9);
    }
}
