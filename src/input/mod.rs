pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{EventHandled, InputEvent, MapEvent, MapEventKind};
pub use handler::{ControllerState, EventManager, ViewportController};
