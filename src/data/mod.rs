pub mod feed;
pub mod filter;
pub mod hazard;

pub use feed::{PointSource, SimulatedFeed, StaticSource, SubscriptionId};
pub use filter::{FilterUpdate, Filters};
pub use hazard::{Hazard, HazardType, Severity};
