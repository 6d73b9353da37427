//! Place Candidate Normalizer
//!
//! Converts raw place records from the search provider (or from a client that
//! echoes them back) into typed [`Place`] values. Malformed records are dropped,
//! not reported: upstream search quality varies and partial results are normal.
//!
//! Accepted record shapes:
//! - Google Places: `place_id`, `name`, `geometry.location.{lat,lng}`, `types`,
//!   `rating`, `price_level`, `formatted_address` / `vicinity`
//! - Our own serialized `Place`: `id`, `name`, `location.{lat,lng}`, `types`, `address`
//! - Flat records: `id`, `name`, `lat`, `lng`

use std::collections::{HashMap, HashSet};

use log::debug;
use serde_json::Value;

use crate::error::ItineraryError;
use crate::models::place::{Coordinate, Place, PlaceCategory};

const NO_INTEREST: &str = "";

pub struct PlaceNormalizer;

impl PlaceNormalizer {
    /// Normalize a sequence of raw records.
    ///
    /// `interest` labels records that do not carry their own `interest` field.
    /// At most `max_per_interest` places are kept for each interest, in source
    /// order, and identifiers are unique in the output.
    pub fn normalize(
        raw: &Value,
        interest: Option<&str>,
        max_per_interest: usize,
    ) -> Result<Vec<Place>, ItineraryError> {
        let records = raw.as_array().ok_or_else(|| {
            ItineraryError::invalid_input("place candidates must be a JSON array")
        })?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut per_interest: HashMap<String, usize> = HashMap::new();
        let mut places = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let Some(mut place) = Self::normalize_record(record) else {
                debug!("Dropping malformed place record at index {}", idx);
                continue;
            };

            if place.interest.is_none() {
                place.interest = interest.map(str::to_string);
            }

            if seen.contains(&place.id) {
                debug!("Dropping duplicate place {}", place.id);
                continue;
            }

            let key = place
                .interest
                .as_deref()
                .unwrap_or(NO_INTEREST)
                .to_lowercase();
            let count = per_interest.entry(key).or_insert(0);
            if *count >= max_per_interest {
                continue;
            }
            *count += 1;

            seen.insert(place.id.clone());
            places.push(place);
        }

        Ok(places)
    }

    /// Combine per-interest batches, keeping the first occurrence of each id
    /// and at most `max_total` places overall.
    pub fn merge(batches: Vec<Vec<Place>>, max_total: usize) -> Vec<Place> {
        let mut seen = HashSet::new();
        batches
            .into_iter()
            .flatten()
            .filter(|p| seen.insert(p.id.clone()))
            .take(max_total)
            .collect()
    }

    fn normalize_record(record: &Value) -> Option<Place> {
        let obj = record.as_object()?;

        let id = ["place_id", "id"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(scalar_string))?;

        let name = obj.get("name").and_then(scalar_string)?;

        let location = Self::coordinate(record)?;

        let types: Vec<String> = obj
            .get("types")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let rating = obj
            .get("rating")
            .and_then(number)
            .filter(|r| (0.0..=5.0).contains(r));

        let price_level = obj
            .get("price_level")
            .and_then(number)
            .filter(|p| p.fract() == 0.0 && (0.0..=4.0).contains(p))
            .map(|p| p as u8);

        let address = ["formatted_address", "address", "vicinity"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(non_empty_str));

        let interest = obj.get("interest").and_then(non_empty_str);

        Some(Place {
            id,
            name,
            category: PlaceCategory::from_tags(&types),
            types,
            location,
            rating,
            price_level,
            address,
            interest,
        })
    }

    fn coordinate(record: &Value) -> Option<Coordinate> {
        let candidates = [
            record.pointer("/geometry/location"),
            record.get("location"),
            Some(record),
        ];
        candidates.into_iter().flatten().find_map(|loc| {
            let lat = loc.get("lat").and_then(number)?;
            let lng = loc.get("lng").and_then(number)?;
            Coordinate::new(lat, lng)
        })
    }
}

/// Finite number, or a string that parses as one.
fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value.as_str().and_then(non_empty)
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
