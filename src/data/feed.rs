//! Hazard sources.
//!
//! A [`PointSource`] hands out an initial batch of hazards and pushes later
//! arrivals to subscribers. [`SimulatedFeed`] fabricates both from a seeded
//! RNG on a jittered schedule; [`StaticSource`] serves a fixed list.

use crate::{
    core::{clock::Clock, config::FeedConfig, constants, geo::Point},
    data::hazard::{Hazard, HazardType, Severity},
    prelude::{Arc, Duration, Instant},
    MapError, Result,
};
use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::Path;

/// Handle returned by [`PointSource::subscribe`]
pub type SubscriptionId = u64;

/// Callback invoked for every newly reported hazard
pub type HazardCallback = Box<dyn FnMut(&Hazard) + Send + Sync>;

#[async_trait]
pub trait PointSource: Send + Sync {
    /// The initial set of hazards
    async fn fetch_all(&self) -> Result<Vec<Hazard>>;

    /// Registers a callback for hazards reported from now on
    fn subscribe(&mut self, callback: HazardCallback) -> SubscriptionId;

    /// Removes a callback; unknown ids are an error
    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<()>;
}

/// Keeps subscribers in registration order
#[derive(Default)]
struct Listeners {
    entries: Vec<(SubscriptionId, HazardCallback)>,
    next_id: SubscriptionId,
}

impl Listeners {
    fn add(&mut self, callback: HazardCallback) -> SubscriptionId {
        self.next_id += 1;
        self.entries.push((self.next_id, callback));
        self.next_id
    }

    fn remove(&mut self, id: SubscriptionId) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|(entry, _)| *entry == id)
            .ok_or_else(|| MapError::Feed(format!("unknown subscription {}", id)))?;
        self.entries.remove(index);
        Ok(())
    }

    fn notify(&mut self, hazard: &Hazard) {
        for (_, callback) in self.entries.iter_mut() {
            callback(hazard);
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A mock live feed.
///
/// Deliveries happen only inside [`SimulatedFeed::advance`]; each one is
/// followed by a fresh random wait in `[min_interval, max_interval)`. The
/// feed starts when the first listener subscribes and stops when the last
/// one leaves.
pub struct SimulatedFeed {
    config: FeedConfig,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    initial: Vec<Hazard>,
    listeners: Listeners,
    next_due: Option<Instant>,
    delivered: usize,
}

impl SimulatedFeed {
    pub fn new(config: FeedConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let mut feed = Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            clock,
            initial: Vec::new(),
            listeners: Listeners::default(),
            next_due: None,
            delivered: 0,
        };
        let initial: Vec<Hazard> = (0..feed.config.initial_count)
            .map(|_| feed.generate_hazard())
            .collect();
        feed.initial = initial;
        log::debug!("simulated feed seeded with {} hazards", feed.initial.len());
        Ok(feed)
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// The batch returned by `fetch_all`, without the simulated delay
    pub fn initial_hazards(&self) -> &[Hazard] {
        &self.initial
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// When the next hazard will be reported, if running
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of live hazards reported so far
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Schedules the first delivery one jittered interval after `now`.
    /// Starting a running feed changes nothing.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            return;
        }
        let due = now + self.next_interval();
        self.next_due = Some(due);
        log::info!(
            "simulated feed started, first hazard in {:?}",
            due.saturating_duration_since(now)
        );
    }

    pub fn stop(&mut self) {
        if self.next_due.take().is_some() {
            log::info!("simulated feed stopped after {} deliveries", self.delivered);
        }
    }

    /// Reports every hazard due at or before `now` to all listeners and
    /// returns them in delivery order
    pub fn advance(&mut self, now: Instant) -> Vec<Hazard> {
        let mut reported = Vec::new();

        while let Some(due) = self.next_due {
            if due > now {
                break;
            }
            let hazard = self.generate_hazard();
            log::debug!(
                "feed delivering {} ({}, {}) to {} listeners",
                hazard.id,
                hazard.kind,
                hazard.severity,
                self.listeners.len()
            );
            self.listeners.notify(&hazard);
            self.delivered += 1;
            reported.push(hazard);
            self.next_due = Some(due + self.next_interval());
        }

        reported
    }

    /// Like [`SimulatedFeed::advance`] using the feed's own clock
    pub fn poll(&mut self) -> Vec<Hazard> {
        let now = self.clock.now();
        self.advance(now)
    }

    fn next_interval(&mut self) -> Duration {
        let (min, max) = (self.config.min_interval_ms, self.config.max_interval_ms);
        let ms = if min < max {
            self.rng.gen_range(min..max)
        } else {
            min
        };
        Duration::from_millis(ms)
    }

    fn generate_hazard(&mut self) -> Hazard {
        let kind = HazardType::ALL[self.rng.gen_range(0..HazardType::ALL.len())];
        let severity = Severity::ALL[self.rng.gen_range(0..Severity::ALL.len())];

        let span = constants::MAP_EXTENT - 2.0 * constants::GENERATED_EDGE_MARGIN;
        let location = Point::new(
            constants::GENERATED_EDGE_MARGIN + self.rng.gen::<f64>() * span,
            constants::GENERATED_EDGE_MARGIN + self.rng.gen::<f64>() * span,
        );

        let wall = self.clock.wall_time();
        let age_ms = self.rng.gen_range(0..constants::HAZARD_MAX_AGE_MS);
        let timestamp = wall - chrono::Duration::milliseconds(age_ms);

        let id = format!("haz-{}-{}", wall.timestamp_millis(), self.random_suffix());
        Hazard::new(id, kind, severity, location, timestamp)
            .with_confidence(self.rng.gen_range(70..100))
            .with_image_url(kind.sample_image_url())
    }

    fn random_suffix(&mut self) -> String {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        (0..9)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

#[cfg(feature = "tokio-runtime")]
async fn simulated_delay(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(not(feature = "tokio-runtime"))]
async fn simulated_delay(_delay: Duration) {}

#[async_trait]
impl PointSource for SimulatedFeed {
    async fn fetch_all(&self) -> Result<Vec<Hazard>> {
        simulated_delay(self.config.initial_load_delay()).await;
        Ok(self.initial.clone())
    }

    fn subscribe(&mut self, callback: HazardCallback) -> SubscriptionId {
        let id = self.listeners.add(callback);
        let now = self.clock.now();
        self.start(now);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<()> {
        self.listeners.remove(id)?;
        if self.listeners.is_empty() {
            self.stop();
        }
        Ok(())
    }
}

/// A fixed list of hazards; subscribers never hear anything
#[derive(Default)]
pub struct StaticSource {
    hazards: Vec<Hazard>,
    listeners: Listeners,
}

impl StaticSource {
    pub fn new(hazards: Vec<Hazard>) -> Self {
        Self {
            hazards,
            listeners: Listeners::default(),
        }
    }

    /// Parses a JSON array of hazards
    pub fn from_json(json: &str) -> Result<Self> {
        let hazards: Vec<Hazard> = serde_json::from_str(json)?;
        Ok(Self::new(hazards))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }
}

#[async_trait]
impl PointSource for StaticSource {
    async fn fetch_all(&self) -> Result<Vec<Hazard>> {
        Ok(self.hazards.clone())
    }

    fn subscribe(&mut self, callback: HazardCallback) -> SubscriptionId {
        self.listeners.add(callback)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<()> {
        self.listeners.remove(id)
    }
}
