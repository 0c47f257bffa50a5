//! Dashboard state: the hazard set, filters, viewport controller, selection
//! and notifications, wired into per-frame marker output.
//!
//! Nothing is cached between frames. [`Dashboard::frame`] filters, culls and
//! clusters the current hazards against the current view every time, so a
//! frame always reflects the latest zoom and point set.

use crate::{
    core::{
        config::MapConfig,
        constants,
        geo::Point,
        viewport::{Transform, Viewport},
    },
    data::{
        feed::{PointSource, SubscriptionId},
        filter::{FilterUpdate, Filters},
        hazard::{Hazard, HazardType, Severity},
    },
    input::{
        events::{EventHandled, InputEvent, MapEvent},
        handler::ViewportController,
    },
    prelude::{Duration, Instant},
    spatial::{
        clustering::{cluster, Clustering},
        culling::Culling,
    },
    Result,
};
use futures::channel::mpsc;
use serde::{Deserialize, Serialize};

/// Owned snapshot of a clicked cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSelection {
    pub id: String,
    pub centroid: Point,
    pub hazards: Vec<Hazard>,
}

impl ClusterSelection {
    pub fn count(&self) -> usize {
        self.hazards.len()
    }
}

/// What the user clicked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    Hazard(Hazard),
    Cluster(ClusterSelection),
}

impl Selection {
    pub fn id(&self) -> &str {
        match self {
            Selection::Hazard(hazard) => &hazard.id,
            Selection::Cluster(cluster) => &cluster.id,
        }
    }
}

/// Receives every selection made on the map
pub trait SelectionSink: Send {
    fn on_select(&mut self, selection: &Selection);
}

impl<F> SelectionSink for F
where
    F: FnMut(&Selection) + Send,
{
    fn on_select(&mut self, selection: &Selection) {
        self(selection)
    }
}

/// Alert raised for a live high-severity hazard
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub hazard: Hazard,
    pub raised_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at)
            >= Duration::from_millis(constants::NOTIFICATION_TIMEOUT_MS)
    }
}

/// A marker ready to draw, in container pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PositionedMarker {
    #[serde(rename_all = "camelCase")]
    Hazard {
        id: String,
        screen: Point,
        hazard_type: HazardType,
        severity: Severity,
        /// The most recent live arrival
        is_new: bool,
    },
    #[serde(rename_all = "camelCase")]
    Cluster {
        id: String,
        screen: Point,
        count: usize,
        member_ids: Vec<String>,
    },
}

impl PositionedMarker {
    pub fn id(&self) -> &str {
        match self {
            PositionedMarker::Hazard { id, .. } | PositionedMarker::Cluster { id, .. } => id,
        }
    }

    pub fn screen(&self) -> Point {
        match self {
            PositionedMarker::Hazard { screen, .. } | PositionedMarker::Cluster { screen, .. } => {
                *screen
            }
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, PositionedMarker::Cluster { .. })
    }
}

/// Everything a renderer needs for one frame. Markers are in draw order:
/// single hazards first, clusters on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerFrame {
    pub view: Transform,
    pub cluster_radius: f64,
    pub markers: Vec<PositionedMarker>,
}

impl MarkerFrame {
    pub fn cluster_count(&self) -> usize {
        self.markers.iter().filter(|marker| marker.is_cluster()).count()
    }

    pub fn hazard_count(&self) -> usize {
        self.markers.len() - self.cluster_count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// What one [`Dashboard::update`] did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOutcome {
    /// Live hazards taken off the queue
    pub arrived: usize,
    /// The view animation advanced
    pub moved: bool,
    /// Map events flushed to listeners
    pub events: Vec<MapEvent>,
}

impl UpdateOutcome {
    /// True if anything visible changed
    pub fn changed(&self) -> bool {
        self.arrived > 0 || self.moved || !self.events.is_empty()
    }
}

pub struct Dashboard {
    config: MapConfig,
    controller: ViewportController,
    /// Every known hazard in arrival order
    hazards: Vec<Hazard>,
    filters: Filters,
    loading: bool,
    selection: Option<Selection>,
    sinks: Vec<Box<dyn SelectionSink>>,
    latest_hazard_id: Option<String>,
    notification: Option<Notification>,
    live: Option<LiveSubscription>,
}

/// The dashboard's listener on a live source and the queue it fills
struct LiveSubscription {
    id: SubscriptionId,
    receiver: mpsc::UnboundedReceiver<Hazard>,
}

impl Dashboard {
    pub fn new(config: MapConfig, size: Point) -> Result<Self> {
        config.validate()?;
        let viewport = Viewport::with_options(size, config.viewport.clone());
        let controller = ViewportController::new(viewport, config.animation.clone());

        Ok(Self {
            config,
            controller,
            hazards: Vec::new(),
            filters: Filters::all(),
            loading: true,
            selection: None,
            sinks: Vec::new(),
            latest_hazard_id: None,
            notification: None,
            live: None,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    pub fn viewport(&self) -> &Viewport {
        self.controller.viewport()
    }

    /// True until the first batch of hazards has been loaded
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replaces the hazard set with an initial batch
    pub fn load(&mut self, hazards: Vec<Hazard>) {
        log::info!("loaded {} hazards", hazards.len());
        self.hazards = hazards;
        self.loading = false;
    }

    /// Fetches the initial batch from `source`; returns how many were loaded
    pub async fn load_from<S>(&mut self, source: &S) -> Result<usize>
    where
        S: PointSource + ?Sized,
    {
        self.loading = true;
        let hazards = source.fetch_all().await?;
        let count = hazards.len();
        self.load(hazards);
        Ok(count)
    }

    /// Subscribes to live hazards from `source`. Arrivals are queued and
    /// picked up by [`Dashboard::update`].
    ///
    /// Attaching again first unsubscribes the earlier listener from `source`,
    /// so a re-attach must go to the same source. Call [`Dashboard::detach`]
    /// before switching sources.
    pub fn attach<S>(&mut self, source: &mut S) -> SubscriptionId
    where
        S: PointSource + ?Sized,
    {
        if let Err(err) = self.detach(source) {
            log::warn!("could not drop the previous live subscription: {}", err);
        }

        let (sender, receiver) = mpsc::unbounded();
        let id = source.subscribe(Box::new(move |hazard: &Hazard| {
            if sender.unbounded_send(hazard.clone()).is_err() {
                log::warn!("dashboard is gone, dropping hazard {}", hazard.id);
            }
        }));
        self.live = Some(LiveSubscription { id, receiver });
        id
    }

    /// Unsubscribes from `source`. Hazards already queued are discarded.
    pub fn detach<S>(&mut self, source: &mut S) -> Result<()>
    where
        S: PointSource + ?Sized,
    {
        match self.live.take() {
            Some(live) => source.unsubscribe(live.id),
            None => Ok(()),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.live.is_some()
    }

    /// Adds one live hazard: it becomes the "new" marker and, if severe,
    /// raises a notification
    pub fn ingest(&mut self, hazard: Hazard, now: Instant) {
        log::debug!("live hazard {} ({}, {})", hazard.id, hazard.kind, hazard.severity);
        self.latest_hazard_id = Some(hazard.id.clone());
        if hazard.severity == Severity::High {
            self.notification = Some(Notification {
                hazard: hazard.clone(),
                raised_at: now,
            });
        }
        self.hazards.push(hazard);
    }

    /// Drains queued live hazards, advances the view animation and flushes
    /// map events. The flushed events are returned in the outcome, so a
    /// later [`Dashboard::process_events`] only sees what was queued after.
    pub fn update(&mut self, now: Instant) -> UpdateOutcome {
        let mut arrivals = Vec::new();
        if let Some(live) = self.live.as_mut() {
            while let Ok(Some(hazard)) = live.receiver.try_next() {
                arrivals.push(hazard);
            }
        }
        let arrived = arrivals.len();
        for hazard in arrivals {
            self.ingest(hazard, now);
        }

        if self
            .notification
            .as_ref()
            .is_some_and(|notification| notification.is_expired(now))
        {
            self.notification = None;
        }

        let moved = self.controller.tick(now);
        UpdateOutcome {
            arrived,
            moved,
            events: self.controller.process_events(),
        }
    }

    /// Routes pointer, wheel and button input to the viewport controller
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> EventHandled {
        self.controller.handle_event(event, now)
    }

    /// Drains map events queued since the last call or the last
    /// [`Dashboard::update`], dispatching listeners
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.controller.process_events()
    }

    pub fn zoom_to(&mut self, target: Point, zoom: f64, now: Instant) -> bool {
        self.controller.zoom_to_target(target, zoom, now)
    }

    pub fn filters(&self) -> Filters {
        self.filters
    }

    pub fn update_filters(&mut self, update: FilterUpdate) -> bool {
        let changed = self.filters.apply(update);
        if changed {
            log::debug!("filters now {:?}", self.filters);
        }
        changed
    }

    /// Hazards passing the filters, newest first; ties keep arrival order
    pub fn hazards(&self) -> Vec<&Hazard> {
        let mut hazards: Vec<&Hazard> = self
            .hazards
            .iter()
            .filter(|hazard| self.filters.matches(hazard))
            .collect();
        hazards.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        hazards
    }

    pub fn total_hazards(&self) -> usize {
        self.hazards.len()
    }

    pub fn latest_hazard_id(&self) -> Option<&str> {
        self.latest_hazard_id.as_deref()
    }

    /// The current notification, unless it has timed out
    pub fn notification(&self, now: Instant) -> Option<&Notification> {
        self.notification
            .as_ref()
            .filter(|notification| !notification.is_expired(now))
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    /// Radius used for clustering right now, from the zoom the view is
    /// settling on so clusters do not churn during an animation
    pub fn cluster_radius(&self) -> f64 {
        self.config
            .clustering
            .radius_at(self.controller.resting_view().zoom)
    }

    fn clustering(&self) -> Clustering<'_, Hazard> {
        let radius = self.cluster_radius();
        let filtered = self.hazards();

        let candidates = if self.config.clustering.cull_to_viewport {
            let mut settled = self.viewport().clone();
            settled.set_transform(self.controller.resting_view());
            Culling::visible_in(filtered, &settled, radius)
        } else {
            filtered
        };

        let clustering = cluster(candidates, radius);
        log::trace!(
            "recluster at radius {:.2}: {} clusters, {} singletons",
            radius,
            clustering.clusters.len(),
            clustering.singletons.len()
        );
        clustering
    }

    /// Positions every marker for the current view
    pub fn frame(&self) -> MarkerFrame {
        let view = self.controller.view();
        let clustering = self.clustering();
        let latest = self.latest_hazard_id.as_deref();

        let singles = clustering.singletons.iter().map(|hazard| PositionedMarker::Hazard {
            id: hazard.id.clone(),
            screen: view.to_screen(&hazard.location),
            hazard_type: hazard.kind,
            severity: hazard.severity,
            is_new: latest == Some(hazard.id.as_str()),
        });
        let clusters = clustering.clusters.iter().map(|group| PositionedMarker::Cluster {
            id: group.id.clone(),
            screen: view.to_screen(&group.centroid),
            count: group.count(),
            member_ids: group.members.iter().map(|hazard| hazard.id.clone()).collect(),
        });

        MarkerFrame {
            view,
            cluster_radius: self.cluster_radius(),
            markers: singles.chain(clusters).collect(),
        }
    }

    /// Selects the topmost marker within its hit radius of `screen`, notifies
    /// the selection sinks and returns the selection
    pub fn click(&mut self, screen: Point) -> Option<Selection> {
        let selection = self.hit_test(screen)?;
        log::debug!("selected {}", selection.id());
        for sink in self.sinks.iter_mut() {
            sink.on_select(&selection);
        }
        self.selection = Some(selection.clone());
        Some(selection)
    }

    fn hit_test(&self, screen: Point) -> Option<Selection> {
        let view = self.controller.view();
        let clustering = self.clustering();
        let hit = &self.config.hit_test;

        // clusters are drawn last, so they win; later markers sit above earlier ones
        let cluster = clustering.clusters.iter().rev().find(|group| {
            view.to_screen(&group.centroid).distance_to(&screen) <= hit.cluster_radius_px
        });
        if let Some(group) = cluster {
            return Some(Selection::Cluster(ClusterSelection {
                id: group.id.clone(),
                centroid: group.centroid,
                hazards: group.members.iter().map(|hazard| (*hazard).clone()).collect(),
            }));
        }

        clustering
            .singletons
            .iter()
            .rev()
            .find(|hazard| {
                view.to_screen(&hazard.location).distance_to(&screen) <= hit.marker_radius_px
            })
            .map(|hazard| Selection::Hazard((*hazard).clone()))
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn add_selection_sink<S>(&mut self, sink: S)
    where
        S: SelectionSink + 'static,
    {
        self.sinks.push(Box::new(sink));
    }

    /// Zooms one increment into the selected cluster, centring it. The
    /// selection is cleared whatever it was.
    pub fn zoom_to_selection(&mut self, now: Instant) -> bool {
        let Some(Selection::Cluster(group)) = self.selection.take() else {
            return false;
        };
        let zoom = self.controller.resting_view().zoom + self.config.viewport.cluster_zoom_increment;
        self.controller.zoom_to_target(group.centroid, zoom, now)
    }
}
