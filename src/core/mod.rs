pub mod bounds;
pub mod clock;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod geo;
pub mod viewport;

pub use bounds::Bounds;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{MapConfig, MapProfile};
pub use dashboard::{Dashboard, MarkerFrame, Selection, UpdateOutcome};
pub use geo::Point;
pub use viewport::{Transform, Viewport};
