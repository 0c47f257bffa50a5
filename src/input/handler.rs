use crate::{
    animation::transitions::ViewTransition,
    core::{
        config::AnimationOptions,
        geo::Point,
        viewport::{Transform, Viewport, ZoomDirection},
    },
    input::events::{EventHandled, InputEvent, MapEvent, MapEventKind},
    prelude::{HashMap, Instant, VecDeque},
};

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Queues map events and fans them out to listeners registered per kind
#[derive(Default)]
pub struct EventManager {
    listeners: HashMap<MapEventKind, Vec<EventCallback>>,
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, kind: MapEventKind, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners.entry(kind).or_default().push(Box::new(callback));
    }

    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Delivers queued events to their listeners and hands them back in order
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(&event.kind()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }
}

/// Interaction state of the viewport
#[derive(Debug, Clone)]
pub enum ControllerState {
    Idle,
    /// Dragging; the current pan is always `pointer - anchor`
    Panning { anchor: Point },
    AnimatingToTarget(ViewTransition),
}

impl ControllerState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ControllerState::Idle)
    }
}

/// Owns the viewport and turns pointer, wheel, button and zoom-to-target
/// requests into view changes.
///
/// ```text
/// Idle --pointer down--> Panning --pointer up / leave--> Idle
/// Idle --zoom to target--> AnimatingToTarget --finished--> Idle
/// AnimatingToTarget --pointer down / wheel / button--> interrupted, then the gesture applies
/// ```
///
/// An interrupted animation leaves the view wherever it had reached; the
/// interrupting gesture then acts on that view.
pub struct ViewportController {
    viewport: Viewport,
    state: ControllerState,
    animation: AnimationOptions,
    event_manager: EventManager,
}

impl ViewportController {
    pub fn new(viewport: Viewport, animation: AnimationOptions) -> Self {
        Self {
            viewport,
            state: ControllerState::Idle,
            animation,
            event_manager: EventManager::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, ControllerState::Panning { .. })
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, ControllerState::AnimatingToTarget(_))
    }

    /// The view currently on screen
    pub fn view(&self) -> Transform {
        self.viewport.transform()
    }

    /// The view the controller is heading to: the animation target while
    /// animating, otherwise the current view
    pub fn resting_view(&self) -> Transform {
        match &self.state {
            ControllerState::AnimatingToTarget(transition) => transition.target(),
            _ => self.viewport.transform(),
        }
    }

    pub fn events_mut(&mut self) -> &mut EventManager {
        &mut self.event_manager
    }

    /// Dispatches queued map events to listeners and returns them
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    /// Routes one input event; `now` drives animation interruption
    pub fn handle_event(&mut self, event: InputEvent, now: Instant) -> EventHandled {
        if event.interrupts_animation() {
            self.interrupt(now);
        }

        let changed = match event {
            InputEvent::PointerDown { position } => {
                self.pointer_down(position);
                true
            }
            InputEvent::PointerMove { position } => self.pointer_move(position),
            InputEvent::PointerUp | InputEvent::PointerLeave => self.pointer_up(),
            InputEvent::Wheel { delta_y, position } => self.wheel(delta_y, position),
            InputEvent::ZoomIn => self.zoom_button(ZoomDirection::In),
            InputEvent::ZoomOut => self.zoom_button(ZoomDirection::Out),
            InputEvent::Resize { size } => {
                self.viewport.set_size(size);
                self.emit_view_changed();
                true
            }
        };

        if changed {
            EventHandled::Handled
        } else {
            EventHandled::NotHandled
        }
    }

    /// Cancels a running animation, keeping the view it had reached
    pub fn interrupt(&mut self, now: Instant) -> bool {
        let ControllerState::AnimatingToTarget(transition) = &mut self.state else {
            return false;
        };

        let reached = transition.cancel(now);
        log::debug!(
            "zoom-to-target interrupted at zoom {:.3}, pan ({:.1}, {:.1})",
            reached.zoom,
            reached.pan.x,
            reached.pan.y
        );
        self.state = ControllerState::Idle;
        self.viewport.set_transform(reached);
        self.event_manager
            .emit(MapEvent::TransitionInterrupted { view: self.viewport.transform() });
        self.emit_view_changed();
        true
    }

    fn pointer_down(&mut self, position: Point) {
        let anchor = position.subtract(&self.viewport.pan());
        self.state = ControllerState::Panning { anchor };
        log::debug!("pan start, anchor ({:.1}, {:.1})", anchor.x, anchor.y);
        self.event_manager.emit(MapEvent::PanStart {
            pan: self.viewport.pan(),
        });
    }

    fn pointer_move(&mut self, position: Point) -> bool {
        let ControllerState::Panning { anchor } = self.state else {
            return false;
        };

        let pan = position.subtract(&anchor);
        if pan == self.viewport.pan() {
            return false;
        }
        self.viewport.set_pan(pan);
        self.emit_view_changed();
        true
    }

    fn pointer_up(&mut self) -> bool {
        if !self.is_panning() {
            return false;
        }
        self.state = ControllerState::Idle;
        log::debug!("pan end");
        self.event_manager.emit(MapEvent::PanEnd {
            pan: self.viewport.pan(),
        });
        true
    }

    fn wheel(&mut self, delta_y: f64, cursor: Point) -> bool {
        let Some(direction) = ZoomDirection::from_wheel_delta(delta_y) else {
            return false;
        };
        self.zoom_step(direction, cursor)
    }

    fn zoom_button(&mut self, direction: ZoomDirection) -> bool {
        if self.viewport.is_degenerate() {
            log::debug!("zoom button ignored: viewport has no area");
            return false;
        }
        let center = self.viewport.center();
        self.zoom_step(direction, center)
    }

    fn zoom_step(&mut self, direction: ZoomDirection, cursor: Point) -> bool {
        let old_pan = self.viewport.pan();
        if !self.viewport.step_zoom(direction, cursor) {
            return false;
        }

        // keep a drag in progress consistent with the new pan
        if let ControllerState::Panning { anchor } = &mut self.state {
            *anchor = anchor.add(&old_pan).subtract(&self.viewport.pan());
        }

        self.event_manager.emit(MapEvent::ZoomChanged {
            zoom: self.viewport.zoom(),
        });
        self.emit_view_changed();
        true
    }

    /// Starts an animated move that centres `target` at `zoom` (clamped).
    ///
    /// Jumps straight there when transitions are disabled. Does nothing and
    /// returns `false` when the viewport has zero size. A running animation
    /// is replaced, starting from wherever it had reached.
    pub fn zoom_to_target(&mut self, target: Point, zoom: f64, now: Instant) -> bool {
        let Some(destination) = self.viewport.centered_on(&target, zoom) else {
            log::debug!("zoom-to-target ignored: viewport has no area");
            return false;
        };

        let from = match &mut self.state {
            ControllerState::AnimatingToTarget(transition) => transition.cancel(now),
            _ => self.viewport.transform(),
        };
        self.viewport.set_transform(from);

        let duration = self.animation.duration();
        if duration.is_zero() {
            self.state = ControllerState::Idle;
            self.apply_destination(destination, true);
            return true;
        }

        log::debug!(
            "zoom-to-target ({:.2}, {:.2}) at zoom {:.2} over {:?}",
            target.x,
            target.y,
            destination.zoom,
            duration
        );
        self.state = ControllerState::AnimatingToTarget(ViewTransition::new(
            from,
            destination,
            now,
            duration,
            self.animation.easing,
        ));
        self.event_manager.emit(MapEvent::TransitionStart { target: destination });
        if destination.zoom != from.zoom {
            self.event_manager.emit(MapEvent::ZoomChanged {
                zoom: destination.zoom,
            });
        }
        true
    }

    /// Advances a running animation. Returns `true` if the view moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let ControllerState::AnimatingToTarget(transition) = &mut self.state else {
            return false;
        };

        let view = transition.update(now);
        let finished = transition.is_finished(now);
        let moved = view != self.viewport.transform();

        if finished {
            self.state = ControllerState::Idle;
            // zoom was announced when the animation started
            self.apply_destination(view, false);
            return true;
        }

        if moved {
            self.viewport.set_transform(view);
            self.emit_view_changed();
        }
        moved
    }

    fn apply_destination(&mut self, destination: Transform, announce_zoom: bool) {
        let zoom_changed = destination.zoom != self.viewport.zoom();
        self.viewport.set_transform(destination);
        if announce_zoom && zoom_changed {
            self.event_manager.emit(MapEvent::ZoomChanged {
                zoom: self.viewport.zoom(),
            });
        }
        self.event_manager.emit(MapEvent::TransitionEnd {
            view: self.viewport.transform(),
        });
        self.emit_view_changed();
    }

    fn emit_view_changed(&mut self) {
        self.event_manager.emit(MapEvent::ViewChanged {
            view: self.viewport.transform(),
        });
    }
}
