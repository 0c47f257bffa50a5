//! Greedy marker clustering.
//!
//! Points are visited in input order and each joins the first existing
//! cluster (in creation order) whose running centroid lies strictly within
//! the radius; otherwise it opens a new cluster. The result depends on input
//! order and is not a nearest-centroid assignment. The cost is O(n·k) for
//! `k` open clusters, which is fine for the few hundred markers on screen.

use crate::core::bounds::Bounds;
use crate::core::geo::Point;
use crate::prelude::HashSet;

/// Anything that can be placed on the map as a marker
pub trait Located {
    /// Unique identifier
    fn id(&self) -> &str;
    /// Position in map space
    fn position(&self) -> Point;
}

impl<T: Located + ?Sized> Located for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn position(&self) -> Point {
        (**self).position()
    }
}

/// Radius to cluster with at `zoom`: clusters shrink and split as the user zooms in
pub fn cluster_radius(base_radius: f64, zoom: f64) -> f64 {
    if zoom > 0.0 {
        base_radius / zoom
    } else {
        base_radius
    }
}

/// A group of two or more points that render as a single marker
#[derive(Debug, Clone)]
pub struct Cluster<'a, T> {
    /// `cluster-<lowest member id>`; stable while membership is unchanged
    pub id: String,
    /// Running mean of member positions
    pub centroid: Point,
    /// Members in the order they joined
    pub members: Vec<&'a T>,
}

impl<'a, T: Located> Cluster<'a, T> {
    /// Get the number of items in the cluster
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Map-space bounding box of the members
    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(self.members.iter().map(|member| member.position()))
            .unwrap_or_else(Bounds::empty)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|member| member.id() == id)
    }
}

/// Either kind of marker produced by a clustering pass
#[derive(Debug)]
pub enum MarkerRef<'c, 'a, T> {
    Single(&'a T),
    Cluster(&'c Cluster<'a, T>),
}

impl<'c, 'a, T: Located> MarkerRef<'c, 'a, T> {
    pub fn position(&self) -> Point {
        match self {
            MarkerRef::Single(point) => point.position(),
            MarkerRef::Cluster(cluster) => cluster.centroid,
        }
    }
}

/// Output of [`cluster`]: finalized clusters plus the points left on their own
#[derive(Debug, Clone)]
pub struct Clustering<'a, T> {
    pub clusters: Vec<Cluster<'a, T>>,
    pub singletons: Vec<&'a T>,
}

impl<'a, T> Clustering<'a, T> {
    /// Number of markers (clusters + singletons)
    pub fn len(&self) -> usize {
        self.clusters.len() + self.singletons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.singletons.is_empty()
    }

    /// Singletons first, then clusters, matching draw order
    pub fn markers(&self) -> impl Iterator<Item = MarkerRef<'_, 'a, T>> + '_ {
        self.singletons
            .iter()
            .map(|point| MarkerRef::Single(*point))
            .chain(self.clusters.iter().map(MarkerRef::Cluster))
    }
}

impl<'a, T> Default for Clustering<'a, T> {
    fn default() -> Self {
        Self {
            clusters: Vec::new(),
            singletons: Vec::new(),
        }
    }
}

struct OpenCluster<'a, T> {
    centroid: Point,
    members: Vec<&'a T>,
}

impl<'a, T> OpenCluster<'a, T> {
    fn absorb(&mut self, member: &'a T, position: Point) {
        let count = self.members.len() as f64;
        let total = count + 1.0;
        self.centroid = Point::new(
            (self.centroid.x * count + position.x) / total,
            (self.centroid.y * count + position.y) / total,
        );
        self.members.push(member);
    }
}

/// Partitions `points` into clusters and singletons.
///
/// The caller supplies `radius`, normally `BASE_RADIUS / zoom` via
/// [`cluster_radius`]. A radius of zero or less (or NaN) leaves every point on
/// its own. A point whose id was already seen earlier in the input is skipped.
pub fn cluster<'a, T, I>(points: I, radius: f64) -> Clustering<'a, T>
where
    T: Located + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut open: Vec<OpenCluster<'a, T>> = Vec::new();
    let mut assigned: HashSet<&'a str> = HashSet::default();

    for point in points {
        if !assigned.insert(point.id()) {
            continue;
        }
        let position = point.position();

        match open
            .iter_mut()
            .find(|candidate| candidate.centroid.distance_to(&position) < radius)
        {
            Some(existing) => existing.absorb(point, position),
            None => open.push(OpenCluster {
                centroid: position,
                members: vec![point],
            }),
        }
    }

    let mut result = Clustering::default();
    for candidate in open {
        if candidate.members.len() > 1 {
            result.clusters.push(Cluster {
                id: cluster_id(&candidate.members),
                centroid: candidate.centroid,
                members: candidate.members,
            });
        } else {
            result.singletons.extend(candidate.members);
        }
    }

    log::trace!(
        "clustered {} points at radius {:.3}: {} clusters, {} singletons",
        assigned.len(),
        radius,
        result.clusters.len(),
        result.singletons.len()
    );
    result
}

fn cluster_id<T: Located>(members: &[&T]) -> String {
    let lowest = members
        .iter()
        .map(|member| member.id())
        .min()
        .unwrap_or_default();
    format!("cluster-{}", lowest)
}
