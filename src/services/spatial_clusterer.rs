//! Spatial Clusterer
//!
//! Greedy single-pass grouping of places into geographic clusters so the
//! sequencer only has to order small neighbourhoods. Deterministic and O(n²);
//! n is bounded by the candidate cap upstream.

use log::debug;

use crate::models::place::{Coordinate, Place};

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Members in input order; the seed is first.
    pub places: Vec<Place>,
    pub centroid: Coordinate,
}

impl Cluster {
    fn seeded(place: Place) -> Self {
        let centroid = place.location;
        Self {
            places: vec![place],
            centroid,
        }
    }

    fn absorb(&mut self, place: Place) {
        self.places.push(place);
        if let Some(c) = Coordinate::centroid(self.places.iter().map(|p| &p.location)) {
            self.centroid = c;
        }
    }

    pub fn place_ids(&self) -> Vec<&str> {
        self.places.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

pub struct SpatialClusterer;

impl SpatialClusterer {
    /// Partition `places` into clusters of radius `radius_km`.
    ///
    /// Each unassigned place seeds a cluster, which then absorbs every later
    /// unassigned place lying within the radius of the current centroid. The
    /// centroid is recomputed after each absorption. Clusters come back in the
    /// order their seeds appeared.
    pub fn cluster(places: Vec<Place>, radius_km: f64) -> Vec<Cluster> {
        let radius_m = radius_km * 1000.0;
        let mut pending: Vec<Option<Place>> = places.into_iter().map(Some).collect();
        let mut clusters = Vec::new();

        for seed_idx in 0..pending.len() {
            let Some(seed) = pending[seed_idx].take() else {
                continue;
            };
            let mut cluster = Cluster::seeded(seed);

            for slot in pending.iter_mut().skip(seed_idx + 1) {
                let within = slot
                    .as_ref()
                    .map(|p| cluster.centroid.distance_m(&p.location) <= radius_m)
                    .unwrap_or(false);
                if within {
                    if let Some(place) = slot.take() {
                        cluster.absorb(place);
                    }
                }
            }

            debug!(
                "Cluster {} seeded at '{}' with {} members",
                clusters.len(),
                cluster.places[0].name,
                cluster.len()
            );
            clusters.push(cluster);
        }

        clusters
    }
}
