use crate::animation::interpolation::{EasingType, Interpolatable};
use crate::core::viewport::Transform;
use crate::prelude::{Duration, Instant};

/// State of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Running,
    Completed,
    Cancelled,
}

/// An eased pan/zoom animation from one view to another.
///
/// Intermediate samples are cosmetic; once the duration has elapsed the
/// transition reports the target view exactly, never an interpolated value.
#[derive(Debug, Clone)]
pub struct ViewTransition {
    from: Transform,
    to: Transform,
    start_time: Instant,
    duration: Duration,
    easing: EasingType,
    state: TransitionState,
}

impl ViewTransition {
    pub fn new(
        from: Transform,
        to: Transform,
        start_time: Instant,
        duration: Duration,
        easing: EasingType,
    ) -> Self {
        Self {
            from,
            to,
            start_time,
            duration,
            easing,
            state: TransitionState::Running,
        }
    }

    pub fn from(&self) -> Transform {
        self.from
    }

    /// The exact view the transition comes to rest on
    pub fn target(&self) -> Transform {
        self.to
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// The view to show at `now`
    pub fn sample(&self, now: Instant) -> Transform {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.to;
        }

        let eased = self.easing.apply(progress);
        Transform::new(
            self.from.zoom.lerp(&self.to.zoom, eased),
            self.from.pan.lerp(&self.to.pan, eased),
        )
    }

    /// Samples at `now` and marks the transition completed once it has run its course
    pub fn update(&mut self, now: Instant) -> Transform {
        let view = self.sample(now);
        if self.state == TransitionState::Running && self.is_finished(now) {
            self.state = TransitionState::Completed;
        }
        view
    }

    /// Stops the transition where it is; returns the view reached at `now`
    pub fn cancel(&mut self, now: Instant) -> Transform {
        let view = self.sample(now);
        self.state = TransitionState::Cancelled;
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;

    fn transition(start: Instant, ms: u64) -> ViewTransition {
        ViewTransition::new(
            Transform::new(1.0, Point::new(0.0, 0.0)),
            Transform::new(2.0, Point::new(-100.0, 40.0)),
            start,
            Duration::from_millis(ms),
            EasingType::css_ease(),
        )
    }

    #[test]
    fn test_sample_endpoints() {
        let start = Instant::now();
        let t = transition(start, 500);

        assert_eq!(t.sample(start), t.from());
        assert_eq!(t.sample(start + Duration::from_millis(500)), t.target());
        assert_eq!(t.sample(start + Duration::from_secs(10)), t.target());
    }

    #[test]
    fn test_sample_midway_moves_toward_target() {
        let start = Instant::now();
        let t = transition(start, 500);
        let mid = t.sample(start + Duration::from_millis(250));

        assert!(mid.zoom > 1.0 && mid.zoom < 2.0);
        assert!(mid.pan.x < 0.0 && mid.pan.x > -100.0);
        assert!(mid.pan.y > 0.0 && mid.pan.y < 40.0);
    }

    #[test]
    fn test_update_completes() {
        let start = Instant::now();
        let mut t = transition(start, 500);

        t.update(start + Duration::from_millis(100));
        assert_eq!(t.state(), TransitionState::Running);

        let last = t.update(start + Duration::from_millis(600));
        assert_eq!(t.state(), TransitionState::Completed);
        assert_eq!(last, t.target());
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let start = Instant::now();
        let t = transition(start, 0);
        assert!(t.is_finished(start));
        assert_eq!(t.sample(start), t.target());
    }

    #[test]
    fn test_cancel_keeps_reached_view() {
        let start = Instant::now();
        let mut t = transition(start, 500);
        let now = start + Duration::from_millis(200);

        let reached = t.cancel(now);
        assert_eq!(t.state(), TransitionState::Cancelled);
        assert_eq!(reached, t.sample(now));
        assert_ne!(reached, t.target());
    }

    #[test]
    fn test_time_before_start_clamps_to_origin() {
        let start = Instant::now() + Duration::from_secs(1);
        let t = transition(start, 500);
        assert_eq!(t.progress(Instant::now()), 0.0);
    }
}
