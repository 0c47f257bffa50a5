use anyhow::Context;
use hazardmap::{
    core::{config::FeedConfig, dashboard::PositionedMarker},
    prelude::{Arc, Duration, Instant},
    Clock, Dashboard, InputEvent, MapConfig, Point, Selection, SimulatedFeed,
    SystemClock,
};

const DEFAULT_RUN_SECS: u64 = 30;
const FRAME_INTERVAL_MS: u64 = 100;

/// Headless hazard map: loads the simulated feed, plays a few gestures and
/// logs what a renderer would draw.
///
/// Usage: `hazardmap-app [config.json]`. `HAZARDMAP_RUN_SECS` sets how long
/// the live feed runs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            MapConfig::from_json(&json).with_context(|| format!("parsing config {}", path))?
        }
        None => MapConfig::default(),
    };
    let run_for = std::env::var("HAZARDMAP_RUN_SECS")
        .ok()
        .and_then(|secs| secs.parse().ok())
        .unwrap_or(DEFAULT_RUN_SECS);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut feed = SimulatedFeed::new(FeedConfig::default(), Arc::clone(&clock))?;
    let mut dashboard = Dashboard::new(config, Point::new(1200.0, 800.0))?;

    dashboard.add_selection_sink(|selection: &Selection| match selection {
        Selection::Hazard(hazard) => log::info!(
            "selected {} {} ({}%, {})",
            hazard.severity,
            hazard.kind,
            hazard.confidence,
            hazard.timestamp.format("%Y-%m-%d %H:%M")
        ),
        Selection::Cluster(cluster) => {
            log::info!("selected {} with {} hazards", cluster.id, cluster.count())
        }
    });

    let loaded = dashboard.load_from(&feed).await?;
    log::info!("initial load: {} hazards", loaded);
    let subscription = dashboard.attach(&mut feed);
    log::debug!("live subscription {}", subscription);

    play_gestures(&mut dashboard, clock.now());

    let deadline = clock.now() + Duration::from_secs(run_for);
    let mut ticker = tokio::time::interval(Duration::from_millis(FRAME_INTERVAL_MS));
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("interrupted");
                break;
            }
        }

        let now = clock.now();
        if now >= deadline {
            break;
        }
        feed.advance(now);
        if dashboard.update(now).changed() {
            let frame = dashboard.frame();
            log::info!(
                "frame: zoom {:.2}, {} clusters, {} hazards",
                frame.view.zoom,
                frame.cluster_count(),
                frame.hazard_count()
            );
        }
        if let Some(notification) = dashboard.take_notification() {
            log::warn!(
                "high severity {} reported at ({:.1}, {:.1})",
                notification.hazard.kind,
                notification.hazard.location.x,
                notification.hazard.location.y
            );
        }
    }

    dashboard.detach(&mut feed)?;
    println!("{}", dashboard.frame().to_json()?);
    Ok(())
}

/// Drag, zoom at the cursor, open and close one hazard popup, then click the
/// largest cluster and zoom into it
fn play_gestures(dashboard: &mut Dashboard, now: Instant) {
    let center = dashboard.viewport().center();
    for event in [
        InputEvent::PointerDown { position: center },
        InputEvent::PointerMove {
            position: center.add(&Point::new(40.0, 25.0)),
        },
        InputEvent::PointerUp,
        InputEvent::Wheel {
            delta_y: -100.0,
            position: Point::new(200.0, 150.0),
        },
        InputEvent::ZoomIn,
    ] {
        dashboard.handle_input(event, now);
    }

    let frame = dashboard.frame();
    if let Some(single) = frame.markers.iter().find(|marker| !marker.is_cluster()) {
        dashboard.click(single.screen());
        dashboard.clear_selection();
    }

    let largest = frame
        .markers
        .iter()
        .filter_map(|marker| match marker {
            PositionedMarker::Cluster { screen, count, .. } => {
                Some((*screen, *count))
            }
            _ => None,
        })
        .max_by_key(|(_, count)| *count);

    if let Some((screen, _)) = largest {
        dashboard.click(screen);
        dashboard.zoom_to_selection(now);
    }
}
