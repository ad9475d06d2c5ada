//! Nearest-neighbour search under the great-circle metric.
//!
//! Points are stored in an R*-tree as unit vectors on the sphere. The chord
//! between two unit vectors grows monotonically with the angle between them,
//! so the Euclidean nearest neighbour is also the great-circle nearest
//! neighbour; the reported distance is then recomputed with the haversine
//! formula.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::edge::EdgePoint;

/// A reference point on the unit sphere.
#[derive(Debug, Clone, Copy)]
struct SpherePoint {
    xyz: [f64; 3],
    lat: f64,
    lon: f64,
    index: usize,
}

impl RTreeObject for SpherePoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xyz)
    }
}

impl PointDistance for SpherePoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.xyz[0] - point[0];
        let dy = self.xyz[1] - point[1];
        let dz = self.xyz[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Unit vector for a latitude/longitude in degrees.
fn to_unit_vector(lat: f64, lon: f64) -> [f64; 3] {
    let (lat, lon) = (lat.to_radians(), lon.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Central angle in radians between two points given in degrees.
pub fn haversine_angle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = phi2 - phi1;
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * a.sqrt().min(1.0).asin()
}

/// Great-circle distance in kilometres on a sphere of the given radius.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius_km: f64) -> f64 {
    haversine_angle(lat1, lon1, lat2, lon2) * radius_km
}

/// Result of a nearest-neighbour query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Position of the matched point in the indexed slice.
    pub index: usize,
    /// Central angle to the matched point, in radians.
    pub angle: f64,
}

/// Spatial index over reference points answering great-circle nearest queries.
pub struct HaversineIndex {
    tree: RTree<SpherePoint>,
}

impl HaversineIndex {
    /// Build the index over `points` (degrees).
    pub fn new(points: &[EdgePoint]) -> Self {
        let items = points
            .iter()
            .enumerate()
            .map(|(index, p)| SpherePoint {
                xyz: to_unit_vector(p.lat, p.lon),
                lat: p.lat,
                lon: p.lon,
                index,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest indexed point to a latitude/longitude in degrees.
    ///
    /// Returns `None` only when the index is empty.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<Nearest> {
        self.tree
            .nearest_neighbor(&to_unit_vector(lat, lon))
            .map(|p| Nearest {
                index: p.index,
                angle: haversine_angle(lat, lon, p.lat, p.lon),
            })
    }
}
