//! Engine-wide magic numbers for the hazard map.
//! Keeping them in a single place makes it easier to tweak defaults.

/// Lowest zoom factor the viewport accepts.
pub const MIN_ZOOM: f64 = 0.5;

/// Highest zoom factor the viewport accepts.
pub const MAX_ZOOM: f64 = 3.0;

/// Zoom change applied by one wheel notch or one +/- button press.
pub const ZOOM_STEP: f64 = 0.2;

/// Extra zoom applied when the user asks to zoom into a selected cluster.
pub const CLUSTER_ZOOM_INCREMENT: f64 = 0.5;

/// Clustering radius in map units at zoom 1; the effective radius is `BASE_CLUSTER_RADIUS / zoom`.
pub const BASE_CLUSTER_RADIUS: f64 = 15.0;

/// Zoom values below this are treated as this when inverting the transform.
pub const MIN_TRANSFORM_ZOOM: f64 = 1e-9;

/// Duration of the animated zoom-to-target transition.
pub const ZOOM_ANIMATION_MS: u64 = 500;

/// Pixel radius used to hit-test individual hazard markers.
pub const MARKER_HIT_RADIUS: f64 = 12.0;

/// Pixel radius used to hit-test cluster markers.
pub const CLUSTER_HIT_RADIUS: f64 = 18.0;

/// Number of hazards in the simulated initial load.
pub const INITIAL_HAZARD_COUNT: usize = 50;

/// Bounds of the jittered delay between simulated live hazards.
pub const FEED_MIN_INTERVAL_MS: u64 = 5_000;
pub const FEED_MAX_INTERVAL_MS: u64 = 10_000;

/// Simulated network delay of the initial load.
pub const INITIAL_LOAD_DELAY_MS: u64 = 500;

/// Generated hazards stay this far away from the map edges.
pub const GENERATED_EDGE_MARGIN: f64 = 5.0;

/// Extent of the nominal map plane.
pub const MAP_EXTENT: f64 = 100.0;

/// Generated timestamps fall within this window before the current time (7 days).
pub const HAZARD_MAX_AGE_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// A high-severity notification stays up this long unless dismissed.
pub const NOTIFICATION_TIMEOUT_MS: u64 = 5_000;
