//! Viewport and coordinate transformation for floorplan rendering.
//!
//! Handles conversion between screen coordinates and page coordinates.
//! Both spaces are Y-down with the origin at the top-left, so the
//! transform is pan and zoom only, no axis flip. Manages zoom and pan
//! with proper coordinate mapping.

use std::fmt;

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 16.0;

/// A point in floorplan page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PagePoint {
    /// X in page units
    pub x: f64,
    /// Y in page units, increasing downward
    pub y: f64,
}

impl PagePoint {
    /// Create a page point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    view_width: f64,
    view_height: f64,
}

impl Viewport {
    /// Creates a new viewport with initial view dimensions.
    pub fn new(view_width: f64, view_height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            view_width,
            view_height,
        }
    }

    /// Gets the view width in screen units.
    pub fn view_width(&self) -> f64 {
        self.view_width
    }

    /// Gets the view height in screen units.
    pub fn view_height(&self) -> f64 {
        self.view_height
    }

    /// Sets the view dimensions (typically called when the window
    /// resizes).
    pub fn set_view_size(&mut self, width: f64, height: f64) {
        self.view_width = width;
        self.view_height = height;
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, constrained to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom >= MIN_ZOOM && zoom <= MAX_ZOOM {
            self.zoom = zoom;
        }
    }

    /// Zooms in by one step.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * 1.2);
    }

    /// Zooms out by one step.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / 1.2);
    }

    /// Gets the pan offset (X coordinate).
    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    /// Gets the pan offset (Y coordinate).
    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    /// Pans by a delta amount in screen units.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Converts screen coordinates to page coordinates.
    ///
    /// ```text
    /// page_x = (screen_x - pan_x) / zoom
    /// page_y = (screen_y - pan_y) / zoom
    /// ```
    pub fn screen_to_page(&self, screen_x: f64, screen_y: f64) -> PagePoint {
        PagePoint::new(
            (screen_x - self.pan_x) / self.zoom,
            (screen_y - self.pan_y) / self.zoom,
        )
    }

    /// Converts page coordinates to screen coordinates.
    ///
    /// ```text
    /// screen_x = page_x * zoom + pan_x
    /// screen_y = page_y * zoom + pan_y
    /// ```
    pub fn page_to_screen(&self, page_x: f64, page_y: f64) -> (f64, f64) {
        (
            page_x * self.zoom + self.pan_x,
            page_y * self.zoom + self.pan_y,
        )
    }

    /// Fits a page of the given size into the view, centered, with a
    /// fractional padding reserve.
    pub fn fit_page(&mut self, page_width: f64, page_height: f64, padding: f64) {
        if page_width <= 0.0 || page_height <= 0.0 {
            return;
        }
        let padding_factor = 1.0 - (padding * 2.0);
        let zoom_x = (self.view_width * padding_factor) / page_width;
        let zoom_y = (self.view_height * padding_factor) / page_height;
        let new_zoom = zoom_x.min(zoom_y).clamp(MIN_ZOOM, MAX_ZOOM);

        self.zoom = new_zoom;
        self.pan_x = (self.view_width - page_width * new_zoom) / 2.0;
        self.pan_y = (self.view_height - page_height * new_zoom) / 2.0;
    }

    /// Zooms to a page point, maintaining that point's screen position.
    /// Useful for zoom-to-cursor.
    pub fn zoom_to_point(&mut self, point: PagePoint, new_zoom: f64) {
        if new_zoom < MIN_ZOOM || new_zoom > MAX_ZOOM {
            return;
        }
        let (screen_x, screen_y) = self.page_to_screen(point.x, point.y);
        self.zoom = new_zoom;
        self.pan_x = screen_x - point.x * new_zoom;
        self.pan_y = screen_y - point.y * new_zoom;
    }

    /// Zooms in keeping the cursor's page point fixed on screen.
    pub fn zoom_in_at(&mut self, point: PagePoint) {
        self.zoom_to_point(point, self.zoom * 1.2);
    }

    /// Zooms out keeping the cursor's page point fixed on screen.
    pub fn zoom_out_at(&mut self, point: PagePoint) {
        self.zoom_to_point(point, self.zoom / 1.2);
    }

    /// Resets the viewport to default state (1:1 zoom, no pan).
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_both_spaces() {
        let mut vp = Viewport::new(1000.0, 700.0);
        vp.set_zoom(2.5);
        vp.pan_by(120.0, -40.0);

        let page = vp.screen_to_page(400.0, 300.0);
        let (sx, sy) = vp.page_to_screen(page.x, page.y);
        assert!((sx - 400.0).abs() < 1e-9);
        assert!((sy - 300.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = Viewport::default();
        vp.set_zoom(100.0);
        assert_eq!(vp.zoom(), 1.0);
        vp.set_zoom(0.01);
        assert_eq!(vp.zoom(), 1.0);
    }

    #[test]
    fn fit_page_centers_the_page() {
        let mut vp = Viewport::new(1000.0, 800.0);
        vp.fit_page(612.0, 792.0, 0.05);

        // Page center lands on view center
        let (cx, cy) = vp.page_to_screen(306.0, 396.0);
        assert!((cx - 500.0).abs() < 1e-9);
        assert!((cy - 400.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_to_point_keeps_the_cursor_fixed() {
        let mut vp = Viewport::new(1000.0, 800.0);
        let cursor = PagePoint::new(250.0, 125.0);
        let before = vp.page_to_screen(cursor.x, cursor.y);
        vp.zoom_in_at(cursor);
        let after = vp.page_to_screen(cursor.x, cursor.y);
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }
}
