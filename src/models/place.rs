use serde::{Deserialize, Serialize};

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Validated constructor. Rejects non-finite values, out-of-range degrees
    /// and the (0, 0) sentinel that providers emit for missing geometry.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        if lat == 0.0 && lng == 0.0 {
            return None;
        }
        Some(Self { lat, lng })
    }

    /// Great-circle distance in meters.
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        let km = haversine::distance(
            haversine::Location {
                latitude: self.lat,
                longitude: self.lng,
            },
            haversine::Location {
                latitude: other.lat,
                longitude: other.lng,
            },
            haversine::Units::Kilometers,
        );
        km * 1000.0
    }

    /// Arithmetic mean of a set of coordinates.
    pub fn centroid<'a, I>(points: I) -> Option<Coordinate>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let (mut lat, mut lng, mut n) = (0.0, 0.0, 0usize);
        for p in points {
            lat += p.lat;
            lng += p.lng;
            n += 1;
        }
        if n == 0 {
            return None;
        }
        Some(Coordinate {
            lat: lat / n as f64,
            lng: lng / n as f64,
        })
    }

    pub fn to_query(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Museum,
    Food,
    Outdoor,
    Attraction,
    Lodging,
    Other,
}

impl PlaceCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PlaceCategory::Museum => "museum",
            PlaceCategory::Food => "food",
            PlaceCategory::Outdoor => "outdoor",
            PlaceCategory::Attraction => "attraction",
            PlaceCategory::Lodging => "lodging",
            PlaceCategory::Other => "other",
        }
    }

    /// Map a single provider tag to a category, if it is one we recognize.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "museum" | "art_gallery" | "library" | "gallery" => Some(PlaceCategory::Museum),
            "restaurant" | "food" | "cafe" | "bakery" | "bar" | "meal_takeaway"
            | "meal_delivery" => Some(PlaceCategory::Food),
            "park" | "natural_feature" | "campground" | "beach" | "hiking_area" | "garden" => {
                Some(PlaceCategory::Outdoor)
            }
            "tourist_attraction" | "amusement_park" | "zoo" | "aquarium" | "church"
            | "place_of_worship" => Some(PlaceCategory::Attraction),
            "lodging" | "hotel" | "hostel" => Some(PlaceCategory::Lodging),
            _ => None,
        }
    }

    /// First recognized tag wins; unknown taxonomies degrade to `Other`.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        tags.iter()
            .find_map(|t| Self::from_tag(t.as_ref()))
            .unwrap_or(PlaceCategory::Other)
    }
}

/// A validated candidate place. Built only by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub category: PlaceCategory,
    #[serde(default)]
    pub types: Vec<String>,
    pub location: Coordinate,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    pub address: Option<String>,
    /// The interest query that surfaced this place.
    pub interest: Option<String>,
}
