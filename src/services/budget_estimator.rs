use std::collections::{BTreeMap, HashMap};

use crate::models::itinerary::BudgetEstimate;
use crate::models::place::{Place, PlaceCategory};

const DEFAULT_COST: f64 = 15.0;

/// Cost multiplier by provider price level 0..=4. Level 2 (moderate) is the
/// table price; places without a price level are priced as moderate.
const PRICE_LEVEL_MULTIPLIERS: [f64; 5] = [0.5, 0.75, 1.0, 1.5, 2.5];

/// Per-place cost bucket for each category.
#[derive(Debug, Clone)]
pub struct BudgetTable {
    costs: HashMap<PlaceCategory, f64>,
    pub default_cost: f64,
}

impl Default for BudgetTable {
    fn default() -> Self {
        let costs = HashMap::from([
            (PlaceCategory::Museum, 20.0),
            (PlaceCategory::Food, 10.0),
            (PlaceCategory::Outdoor, 0.0),
            (PlaceCategory::Attraction, 20.0),
            (PlaceCategory::Lodging, 120.0),
        ]);
        Self {
            costs,
            default_cost: DEFAULT_COST,
        }
    }
}

impl BudgetTable {
    /// A table with no category buckets; everything costs `default_cost`.
    pub fn empty(default_cost: f64) -> Self {
        Self {
            costs: HashMap::new(),
            default_cost,
        }
    }

    pub fn set_cost(&mut self, category: PlaceCategory, cost: f64) {
        self.costs.insert(category, cost.max(0.0));
    }

    pub fn cost_for(&self, category: PlaceCategory) -> f64 {
        self.costs
            .get(&category)
            .copied()
            .unwrap_or(self.default_cost)
    }

    /// Category cost scaled by the place's price level.
    pub fn cost_for_place(&self, place: &Place) -> f64 {
        let multiplier = place
            .price_level
            .and_then(|level| PRICE_LEVEL_MULTIPLIERS.get(level as usize))
            .copied()
            .unwrap_or(1.0);
        self.cost_for(place.category) * multiplier
    }
}

pub struct BudgetEstimator;

impl BudgetEstimator {
    /// Sum per-category costs for the visiting sequence.
    pub fn estimate(places: &[Place], table: &BudgetTable) -> BudgetEstimate {
        let mut breakdown: BTreeMap<String, f64> = BTreeMap::new();

        for place in places {
            let cost = table.cost_for_place(place);
            *breakdown
                .entry(place.category.label().to_string())
                .or_insert(0.0) += cost;
        }

        BudgetEstimate::from_breakdown(breakdown)
    }
}
