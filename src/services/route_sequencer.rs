//! Route Sequencer
//!
//! Orders clustered places into a single visiting sequence with a greedy
//! nearest-neighbor heuristic. Clusters are visited nearest-centroid first from
//! the start point; inside a cluster we keep hopping to the closest unvisited
//! member. This is not an optimal tour.
//!
//! The distances computed here only drive ordering decisions. Reported travel
//! metrics come from the route collaborator, which is called with the final order.

use std::cmp::Ordering;

use log::debug;

use crate::models::place::{Coordinate, Place};
use crate::services::spatial_clusterer::Cluster;

pub struct RouteSequencer;

impl RouteSequencer {
    pub fn sequence(clusters: Vec<Cluster>, start: Coordinate) -> Vec<Place> {
        let total: usize = clusters.iter().map(Cluster::len).sum();
        let mut route = Vec::with_capacity(total);
        let mut current = start;
        let mut heuristic_length_m = 0.0;

        for cluster in Self::order_clusters(clusters, start) {
            let mut unvisited = cluster.places;

            while !unvisited.is_empty() {
                let (idx, distance) = Self::nearest(&unvisited, &current);
                let next = unvisited.remove(idx);
                heuristic_length_m += distance;
                current = next.location;
                route.push(next);
            }
        }

        debug!(
            "Sequenced {} places, heuristic path length {:.0} m",
            route.len(),
            heuristic_length_m
        );
        route
    }

    /// Clusters sorted by centroid distance from `start`. The sort is stable,
    /// so equidistant clusters keep their seed order.
    fn order_clusters(clusters: Vec<Cluster>, start: Coordinate) -> Vec<Cluster> {
        let mut keyed: Vec<(f64, Cluster)> = clusters
            .into_iter()
            .map(|c| (start.distance_m(&c.centroid), c))
            .collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        keyed.into_iter().map(|(_, c)| c).collect()
    }

    /// Index of the closest place. Ties go to the earlier index.
    fn nearest(candidates: &[Place], from: &Coordinate) -> (usize, f64) {
        let mut best = (0, f64::INFINITY);
        for (idx, place) in candidates.iter().enumerate() {
            let d = from.distance_m(&place.location);
            if d < best.1 {
                best = (idx, d);
            }
        }
        best
    }
}
