use hazardmap::prelude::*;

/// End-to-end tests that drive the dashboard the way a host application does:
/// load from a source, feed input events, advance time, read frames.
#[cfg(test)]
mod integration_tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn quiet_feed(seed: u64, clock: &ManualClock) -> SimulatedFeed {
        let config = FeedConfig {
            seed,
            initial_load_delay_ms: 0,
            ..FeedConfig::default()
        };
        SimulatedFeed::new(config, Arc::new(clock.clone())).unwrap()
    }

    fn marker_population(frame: &MarkerFrame) -> usize {
        frame
            .markers
            .iter()
            .map(|marker| match marker {
                PositionedMarker::Hazard { .. } => 1,
                PositionedMarker::Cluster { count, .. } => *count,
            })
            .sum()
    }

    /// Live hazards from the simulated feed flow into the next frame
    #[tokio::test]
    async fn test_simulated_feed_drives_dashboard() {
        let clock = ManualClock::new();
        let mut feed = quiet_feed(21, &clock);
        let mut dashboard = Dashboard::new(MapConfig::default(), Point::new(800.0, 600.0)).unwrap();
        assert!(dashboard.is_loading());

        let loaded = dashboard.load_from(&feed).await.unwrap();
        assert_eq!(loaded, 50);
        assert!(!dashboard.is_loading());
        assert_eq!(marker_population(&dashboard.frame()), 50);

        dashboard.attach(&mut feed);
        assert!(feed.is_running());

        clock.advance(Duration::from_secs(30));
        let reported = feed.poll();
        assert!(!reported.is_empty());

        assert!(dashboard.update(clock.now()).changed());
        assert_eq!(dashboard.total_hazards(), 50 + reported.len());
        assert_eq!(dashboard.latest_hazard_id(), reported.last().map(|h| h.id.as_str()));
        assert_eq!(marker_population(&dashboard.frame()), 50 + reported.len());

        // nothing new: no change
        assert!(!dashboard.update(clock.now()).changed());
    }

    /// A high-severity arrival raises a notification naming that hazard
    #[tokio::test]
    async fn test_high_severity_arrival_notifies() {
        let clock = ManualClock::new();
        let mut feed = quiet_feed(5, &clock);
        let mut dashboard = Dashboard::new(MapConfig::default(), Point::new(800.0, 600.0)).unwrap();
        dashboard.load_from(&feed).await.unwrap();
        dashboard.attach(&mut feed);

        let mut last_high = None;
        for _ in 0..60 {
            clock.advance(Duration::from_secs(10));
            let reported = feed.poll();
            dashboard.update(clock.now());
            if let Some(high) = reported.iter().rev().find(|h| h.severity == Severity::High) {
                last_high = Some(high.id.clone());
                break;
            }
        }

        let expected = last_high.expect("sixty deliveries without a high severity hazard");
        let notification = dashboard.take_notification().unwrap();
        assert_eq!(notification.hazard.id, expected);
        assert!(dashboard.take_notification().is_none());
    }

    /// Filters narrow both the list and the map
    #[tokio::test]
    async fn test_filters_apply_to_list_and_frame() {
        let clock = ManualClock::new();
        let feed = quiet_feed(8, &clock);
        let mut dashboard = Dashboard::new(MapConfig::default(), Point::new(800.0, 600.0)).unwrap();
        dashboard.load_from(&feed).await.unwrap();

        dashboard.update_filters(FilterUpdate::kind(Some(HazardType::Flooding)));
        let listed = dashboard.hazards();
        assert!(listed.iter().all(|h| h.kind == HazardType::Flooding));
        assert!(listed.windows(2).all(|pair| pair[0].timestamp >= pair[1].timestamp));
        assert_eq!(marker_population(&dashboard.frame()), listed.len());

        dashboard.update_filters(FilterUpdate::kind(None));
        assert_eq!(dashboard.hazards().len(), 50);
    }

    /// Click a cluster, zoom into it, and grab the map halfway through
    #[test]
    fn test_zoom_into_cluster_then_interrupt() {
        let json = r#"[
            { "id": "p1", "type": "Pothole", "severity": "Low",
              "location": { "lat": 40.0, "lng": 40.0 }, "timestamp": "2024-06-01T10:00:00Z", "confidence": 80 },
            { "id": "p2", "type": "Debris", "severity": "Medium",
              "location": { "lat": 44.0, "lng": 40.0 }, "timestamp": "2024-06-01T11:00:00Z", "confidence": 90 },
            { "id": "p3", "type": "Flooding", "severity": "High",
              "location": { "lat": 90.0, "lng": 90.0 }, "timestamp": "2024-06-01T12:00:00Z", "confidence": 75 }
        ]"#;
        let source = StaticSource::from_json(json).unwrap();
        let mut dashboard = Dashboard::new(MapConfig::default(), Point::new(400.0, 400.0)).unwrap();
        dashboard.load(source.hazards().to_vec());

        let selection = dashboard.click(Point::new(40.0, 42.0)).unwrap();
        let Selection::Cluster(group) = selection else {
            panic!("expected the p1/p2 cluster");
        };
        assert_eq!(group.id, "cluster-p1");
        assert!(group.centroid.approx_eq(&Point::new(40.0, 42.0), EPSILON));

        let start = Instant::now();
        assert!(dashboard.zoom_to_selection(start));
        assert!(dashboard.controller().is_animating());

        let midway = start + Duration::from_millis(250);
        dashboard.update(midway);
        let reached = dashboard.controller().view();
        assert!(reached.zoom > 1.0 && reached.zoom < 1.5);

        dashboard.handle_input(InputEvent::PointerDown { position: Point::new(10.0, 10.0) }, midway);
        assert!(dashboard.controller().is_panning());
        assert_eq!(dashboard.controller().view(), reached);

        // the abandoned animation never lands later
        dashboard.update(start + Duration::from_secs(2));
        assert_eq!(dashboard.controller().view(), reached);
    }

    /// Three points, radius 5: one pair and one singleton
    #[test]
    fn test_three_point_scenario() {
        let points = [
            Hazard::new("1", HazardType::Pothole, Severity::Low, Point::new(10.0, 10.0), chrono::Utc::now()),
            Hazard::new("2", HazardType::Pothole, Severity::Low, Point::new(10.0, 11.0), chrono::Utc::now()),
            Hazard::new("3", HazardType::Pothole, Severity::Low, Point::new(80.0, 80.0), chrono::Utc::now()),
        ];
        let clustering = cluster(&points, 5.0);

        assert_eq!(clustering.clusters.len(), 1);
        assert_eq!(clustering.clusters[0].count(), 2);
        assert!(clustering.clusters[0].centroid.approx_eq(&Point::new(10.0, 10.5), EPSILON));
        assert_eq!(clustering.singletons.len(), 1);
        assert_eq!(clustering.singletons[0].position(), Point::new(80.0, 80.0));
    }

    /// Wheel up at (100, 100) from the identity view keeps that map point under the cursor
    #[test]
    fn test_wheel_zoom_scenario() {
        let mut dashboard = Dashboard::new(MapConfig::default(), Point::new(800.0, 600.0)).unwrap();
        let cursor = Point::new(100.0, 100.0);
        dashboard.handle_input(InputEvent::Wheel { delta_y: -120.0, position: cursor }, Instant::now());

        let view = dashboard.controller().view();
        assert!((view.zoom - 1.2).abs() < EPSILON);
        assert!(view.to_screen(&Point::new(100.0, 100.0)).approx_eq(&cursor, EPSILON));
    }

    /// Screen -> map -> screen over a grid of views
    #[test]
    fn test_transform_round_trip() {
        for zoom in [0.5, 0.75, 1.0, 2.2, 3.0] {
            for pan in [Point::ORIGIN, Point::new(-130.5, 42.0), Point::new(900.0, -3.25)] {
                let transform = Transform::new(zoom, pan);
                for map in [Point::new(0.0, 0.0), Point::new(5.5, 95.0), Point::new(-40.0, 1e4)] {
                    let back = transform.to_map(&transform.to_screen(&map));
                    assert!(back.approx_eq(&map, 1e-6), "{:?} at {:?}", map, transform);
                }
            }
        }
    }
}
