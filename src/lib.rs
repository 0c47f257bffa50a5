//! # hazardmap
//!
//! The map engine behind a real-time road-hazard dashboard: a pan/zoom
//! viewport with an animated zoom-to-target, greedy distance-based marker
//! clustering, and the dashboard state that wires a hazard feed, filters,
//! selection and notifications into per-frame marker output.
//!
//! Rendering is left to the host; [`core::dashboard::MarkerFrame`] carries
//! screen positions and ids for every marker.

pub mod animation;
pub mod core;
pub mod data;
pub mod input;
pub mod prelude;
pub mod spatial;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::Bounds,
    clock::{Clock, ManualClock, SystemClock},
    config::{MapConfig, MapProfile},
    dashboard::{Dashboard, MarkerFrame, Selection, UpdateOutcome},
    geo::Point,
    viewport::{Transform, Viewport},
};

pub use data::{
    feed::{PointSource, SimulatedFeed, StaticSource},
    filter::Filters,
    hazard::{Hazard, HazardType, Severity},
};

pub use input::{events::InputEvent, handler::ViewportController};

pub use spatial::clustering::{cluster, Cluster, Clustering, Located};

pub use animation::transitions::ViewTransition;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Feed error: {0}")]
    Feed(String),
}

/// Error type alias for convenience
pub type Error = MapError;
