use crate::core::geo::Point;
use crate::core::viewport::Transform;
use serde::{Deserialize, Serialize};

/// Pointer and control input, in container pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Primary button pressed
    PointerDown { position: Point },
    /// Pointer moved, pressed or not
    PointerMove { position: Point },
    /// Primary button released
    PointerUp,
    /// Pointer left the container
    PointerLeave,
    /// Scroll wheel; negative `delta_y` scrolls up and zooms in
    Wheel { delta_y: f64, position: Point },
    /// Zoom-in button (anchored at the container centre)
    ZoomIn,
    /// Zoom-out button (anchored at the container centre)
    ZoomOut,
    /// Container resized
    Resize { size: Point },
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position }
            | InputEvent::PointerMove { position }
            | InputEvent::Wheel { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Checks if this is a mouse/pointer event
    pub fn is_pointer_event(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerDown { .. }
                | InputEvent::PointerMove { .. }
                | InputEvent::PointerUp
                | InputEvent::PointerLeave
                | InputEvent::Wheel { .. }
        )
    }

    /// Events that cut a running zoom-to-target animation short
    pub fn interrupts_animation(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerDown { .. }
                | InputEvent::Wheel { .. }
                | InputEvent::ZoomIn
                | InputEvent::ZoomOut
        )
    }
}

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

/// Notifications emitted by the viewport controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// Pan or zoom changed
    ViewChanged { view: Transform },
    /// Drag started
    PanStart { pan: Point },
    /// Drag ended
    PanEnd { pan: Point },
    /// Zoom factor changed
    ZoomChanged { zoom: f64 },
    /// Animated zoom-to-target started
    TransitionStart { target: Transform },
    /// Animated zoom-to-target reached its target
    TransitionEnd { view: Transform },
    /// Animated zoom-to-target was cut short by user input
    TransitionInterrupted { view: Transform },
}

/// Discriminant of [`MapEvent`], used to register listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    ViewChanged,
    PanStart,
    PanEnd,
    ZoomChanged,
    TransitionStart,
    TransitionEnd,
    TransitionInterrupted,
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::ViewChanged { .. } => MapEventKind::ViewChanged,
            MapEvent::PanStart { .. } => MapEventKind::PanStart,
            MapEvent::PanEnd { .. } => MapEventKind::PanEnd,
            MapEvent::ZoomChanged { .. } => MapEventKind::ZoomChanged,
            MapEvent::TransitionStart { .. } => MapEventKind::TransitionStart,
            MapEvent::TransitionEnd { .. } => MapEventKind::TransitionEnd,
            MapEvent::TransitionInterrupted { .. } => MapEventKind::TransitionInterrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_event_position() {
        let down = InputEvent::PointerDown {
            position: Point::new(100.0, 200.0),
        };
        assert_eq!(down.position(), Some(Point::new(100.0, 200.0)));

        let wheel = InputEvent::Wheel {
            delta_y: -1.0,
            position: Point::new(50.0, 75.0),
        };
        assert_eq!(wheel.position(), Some(Point::new(50.0, 75.0)));
        assert_eq!(InputEvent::PointerUp.position(), None);
    }

    #[test]
    fn test_event_type_checks() {
        assert!(InputEvent::PointerLeave.is_pointer_event());
        assert!(!InputEvent::ZoomIn.is_pointer_event());

        assert!(InputEvent::ZoomOut.interrupts_animation());
        assert!(InputEvent::PointerDown { position: Point::ORIGIN }.interrupts_animation());
        assert!(!InputEvent::PointerMove { position: Point::ORIGIN }.interrupts_animation());
        assert!(!InputEvent::PointerUp.interrupts_animation());
    }

    #[test]
    fn test_map_event_kind() {
        let event = MapEvent::ZoomChanged { zoom: 1.2 };
        assert_eq!(event.kind(), MapEventKind::ZoomChanged);
        let event = MapEvent::TransitionEnd {
            view: Transform::identity(),
        };
        assert_eq!(event.kind(), MapEventKind::TransitionEnd);
    }
}
