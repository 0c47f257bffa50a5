use crate::core::{bounds::Bounds, geo::Point, viewport::Viewport};
use crate::spatial::clustering::Located;

/// Viewport culling for marker sets.
///
/// Clustering only needs the markers that can appear on screen; a margin keeps
/// points just outside the edge so clusters straddling it keep their members.
pub struct Culling;

impl Culling {
    /// Returns `true` if a point lies inside the rectangle.
    pub fn point_visible(view: &Bounds, p: &Point) -> bool {
        view.contains(p)
    }

    /// Keeps the points inside `view` grown by `margin` map units, preserving order.
    pub fn visible<'a, T, I>(points: I, view: &Bounds, margin: f64) -> Vec<&'a T>
    where
        T: Located + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let area = view.expanded(margin.max(0.0));
        points
            .into_iter()
            .filter(|point| Self::point_visible(&area, &point.position()))
            .collect()
    }

    /// Culls against what `viewport` shows; a zero-size viewport culls nothing
    pub fn visible_in<'a, T, I>(points: I, viewport: &Viewport, margin: f64) -> Vec<&'a T>
    where
        T: Located + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        match viewport.visible_map_bounds() {
            Some(view) => Self::visible(points, &view, margin),
            None => points.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::viewport::Transform;

    struct Spot(&'static str, Point);

    impl Located for Spot {
        fn id(&self) -> &str {
            self.0
        }

        fn position(&self) -> Point {
            self.1
        }
    }

    fn spots() -> Vec<Spot> {
        vec![
            Spot("inside", Point::new(50.0, 50.0)),
            Spot("edge", Point::new(100.0, 0.0)),
            Spot("near", Point::new(103.0, 50.0)),
            Spot("far", Point::new(300.0, 300.0)),
        ]
    }

    fn ids(points: &[&Spot]) -> Vec<&'static str> {
        points.iter().map(|s| s.0).collect()
    }

    #[test]
    fn test_visible_with_margin() {
        let view = Bounds::from_coords(0.0, 0.0, 100.0, 100.0);
        let points = spots();

        assert_eq!(ids(&Culling::visible(&points, &view, 0.0)), vec!["inside", "edge"]);
        assert_eq!(
            ids(&Culling::visible(&points, &view, 5.0)),
            vec!["inside", "edge", "near"]
        );
        // negative margins are treated as zero
        assert_eq!(ids(&Culling::visible(&points, &view, -50.0)).len(), 2);
    }

    #[test]
    fn test_visible_in_viewport() {
        let mut viewport = Viewport::new(Point::new(200.0, 200.0));
        viewport.set_transform(Transform::new(2.0, Point::new(-100.0, -100.0)));
        // visible map region is [50, 150] x [50, 150]
        let points = spots();
        assert_eq!(ids(&Culling::visible_in(&points, &viewport, 0.0)), vec!["inside", "near"]);
    }

    #[test]
    fn test_degenerate_viewport_keeps_everything() {
        let viewport = Viewport::new(Point::new(0.0, 0.0));
        let points = spots();
        assert_eq!(Culling::visible_in(&points, &viewport, 0.0).len(), 4);
    }

    #[test]
    fn test_point_visible() {
        let view = Bounds::from_coords(0.0, 0.0, 10.0, 10.0);
        assert!(Culling::point_visible(&view, &Point::new(10.0, 10.0)));
        assert!(!Culling::point_visible(&view, &Point::new(10.1, 10.0)));
    }
}
