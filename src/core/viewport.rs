use crate::core::bounds::Bounds;
use crate::core::config::ViewportOptions;
use crate::core::constants::MIN_TRANSFORM_ZOOM;
use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Pan/zoom transform between map space and screen pixels.
///
/// A map point `m` lands on screen at `m * zoom + pan`; the inverse is
/// `(s - pan) / zoom`. This pair is also the whole of the view state that
/// the controller animates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Scale factor (1.0 = one map unit per pixel)
    pub zoom: f64,
    /// Translation in pixels
    pub pan: Point,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ORIGIN,
        }
    }
}

impl Transform {
    pub fn new(zoom: f64, pan: Point) -> Self {
        Self { zoom, pan }
    }

    /// Create identity transform (no change)
    pub fn identity() -> Self {
        Self::default()
    }

    /// Map space to screen pixels
    pub fn to_screen(&self, map: &Point) -> Point {
        map.multiply(self.zoom).add(&self.pan)
    }

    /// Screen pixels to map space
    pub fn to_map(&self, screen: &Point) -> Point {
        screen.subtract(&self.pan).divide(self.safe_zoom())
    }

    /// Zoom with its magnitude floored away from zero, keeping the sign
    fn safe_zoom(&self) -> f64 {
        if self.zoom.abs() >= MIN_TRANSFORM_ZOOM {
            self.zoom
        } else if self.zoom.is_sign_negative() {
            -MIN_TRANSFORM_ZOOM
        } else {
            MIN_TRANSFORM_ZOOM
        }
    }
}

/// Direction of a single zoom step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Wheel deltas follow the DOM convention: negative scrolls up and zooms in
    pub fn from_wheel_delta(delta_y: f64) -> Option<Self> {
        if delta_y < 0.0 {
            Some(ZoomDirection::In)
        } else if delta_y > 0.0 {
            Some(ZoomDirection::Out)
        } else {
            None
        }
    }

    fn signum(self) -> f64 {
        match self {
            ZoomDirection::In => 1.0,
            ZoomDirection::Out => -1.0,
        }
    }
}

/// Current view of the map: pan/zoom plus the size of the container it is drawn into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    transform: Transform,
    /// The size of the viewport container in pixels
    pub size: Point,
    options: ViewportOptions,
}

impl Viewport {
    /// Creates a viewport at zoom 1 with no pan
    pub fn new(size: Point) -> Self {
        Self::with_options(size, ViewportOptions::default())
    }

    pub fn with_options(size: Point, mut options: ViewportOptions) -> Self {
        let (min_zoom, max_zoom) = options.limits();
        options.min_zoom = min_zoom;
        options.max_zoom = max_zoom;
        let mut viewport = Self {
            transform: Transform::identity(),
            size,
            options,
        };
        viewport.transform.zoom = viewport.clamp_zoom(1.0);
        viewport
    }

    pub fn zoom(&self) -> f64 {
        self.transform.zoom
    }

    pub fn pan(&self) -> Point {
        self.transform.pan
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    /// Clamps a zoom value into this viewport's limits
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        self.options.clamp_zoom(zoom)
    }

    /// Sets the zoom level, clamping to valid range. Pan is left untouched.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.transform.zoom = self.clamp_zoom(zoom);
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.transform.pan = pan;
    }

    /// Replaces pan and zoom at once; zoom is still clamped
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = Transform::new(self.clamp_zoom(transform.zoom), transform.pan);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits and re-clamps the current zoom. NaN limits are ignored.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        if min_zoom.is_nan() || max_zoom.is_nan() {
            log::warn!("ignoring zoom limits [{}, {}]", min_zoom, max_zoom);
            return;
        }
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.options.min_zoom = min_zoom;
        self.options.max_zoom = max_zoom;
        self.set_zoom(self.transform.zoom);
    }

    /// True when the container has no usable area
    pub fn is_degenerate(&self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0 && self.size.is_finite())
    }

    /// Centre of the container in pixels
    pub fn center(&self) -> Point {
        self.size.divide(2.0)
    }

    pub fn map_to_screen(&self, map: &Point) -> Point {
        self.transform.to_screen(map)
    }

    pub fn screen_to_map(&self, screen: &Point) -> Point {
        self.transform.to_map(screen)
    }

    /// Zooms to `zoom` keeping the map point under `cursor` fixed on screen.
    ///
    /// Returns `false` (and changes nothing) when the clamped zoom equals the
    /// current zoom.
    pub fn zoom_at(&mut self, zoom: f64, cursor: Point) -> bool {
        let new_zoom = self.clamp_zoom(zoom);
        if new_zoom == self.transform.zoom {
            return false;
        }

        let map_point = self.transform.to_map(&cursor);
        self.transform = Transform::new(new_zoom, cursor.subtract(&map_point.multiply(new_zoom)));
        true
    }

    /// One zoom step in `direction` anchored at `cursor`
    pub fn step_zoom(&mut self, direction: ZoomDirection, cursor: Point) -> bool {
        let target = self.transform.zoom + direction.signum() * self.options.zoom_step;
        self.zoom_at(target, cursor)
    }

    /// One zoom step anchored at the container centre; no-op on a degenerate viewport
    pub fn step_zoom_at_center(&mut self, direction: ZoomDirection) -> bool {
        if self.is_degenerate() {
            return false;
        }
        self.step_zoom(direction, self.center())
    }

    /// The view that centres `target` in the container at `zoom` (clamped).
    ///
    /// Returns `None` when the container has zero size.
    pub fn centered_on(&self, target: &Point, zoom: f64) -> Option<Transform> {
        if self.is_degenerate() {
            return None;
        }
        let zoom = self.clamp_zoom(zoom);
        let pan = self.center().subtract(&target.multiply(zoom));
        Some(Transform::new(zoom, pan))
    }

    /// Map-space rectangle currently visible through the container
    pub fn visible_map_bounds(&self) -> Option<Bounds> {
        if self.is_degenerate() {
            return None;
        }
        let top_left = self.screen_to_map(&Point::ORIGIN);
        let bottom_right = self.screen_to_map(&self.size);
        Some(Bounds::new(
            Point::new(top_left.x.min(bottom_right.x), top_left.y.min(bottom_right.y)),
            Point::new(top_left.x.max(bottom_right.x), top_left.y.max(bottom_right.y)),
        ))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Point::new(800.0, 600.0))
    }
}
