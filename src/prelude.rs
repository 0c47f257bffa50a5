//! Prelude module for common hazardmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use hazardmap::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    clock::{Clock, ManualClock, SystemClock},
    config::{
        AnimationOptions, ClusterOptions, FeedConfig, HitTestOptions, MapConfig, MapProfile,
        ViewportOptions,
    },
    dashboard::{
        ClusterSelection, Dashboard, MarkerFrame, Notification, PositionedMarker, Selection,
        SelectionSink, UpdateOutcome,
    },
    geo::Point,
    viewport::{Transform, Viewport, ZoomDirection},
};

pub use crate::data::{
    feed::{HazardCallback, PointSource, SimulatedFeed, StaticSource, SubscriptionId},
    filter::{FilterUpdate, Filters},
    hazard::{Hazard, HazardType, Severity},
};

pub use crate::input::{
    events::{EventHandled, InputEvent, MapEvent, MapEventKind},
    handler::{ControllerState, EventManager, ViewportController},
};

pub use crate::animation::{
    interpolation::{EasingType, Interpolatable},
    transitions::ViewTransition,
};

pub use crate::spatial::{
    clustering::{cluster, cluster_radius, Cluster, Clustering, Located, MarkerRef},
    culling::Culling,
};

pub use crate::{Error as MapError, Result};

pub use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

/// Monotonic time that also works on wasm targets
pub use instant::Instant;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
