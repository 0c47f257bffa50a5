pub mod interpolation;
pub mod transitions;

// Re-export commonly used types and functions for convenience
pub use interpolation::{EasingType, Interpolatable, Interpolation};
pub use transitions::{TransitionState, ViewTransition};
