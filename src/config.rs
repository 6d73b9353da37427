use std::env;
use std::str::FromStr;

use crate::error::ItineraryError;
use crate::models::place::PlaceCategory;
use crate::services::budget_estimator::BudgetTable;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "WanderWhiz";
const OPENAI_MODEL: &str = "gpt-4o-mini";

const CLUSTER_RADIUS_KM: f64 = 2.0;
const MAX_PLACES_PER_INTEREST: usize = 10;
const MAX_TOTAL_PLACES: usize = 40;
const CITY_RADIUS_KM: f64 = 30.0;

/// Policy knobs for the itinerary pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub cluster_radius_km: f64,
    pub max_places_per_interest: usize,
    pub max_total_places: usize,
    /// Candidates farther than this from the city center are discarded.
    pub city_radius_km: f64,
    pub budget_table: BudgetTable,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cluster_radius_km: CLUSTER_RADIUS_KM,
            max_places_per_interest: MAX_PLACES_PER_INTEREST,
            max_total_places: MAX_TOTAL_PLACES,
            city_radius_km: CITY_RADIUS_KM,
            budget_table: BudgetTable::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut budget_table = defaults.budget_table.clone();
        for (var, category) in [
            ("BUDGET_MUSEUM", PlaceCategory::Museum),
            ("BUDGET_FOOD", PlaceCategory::Food),
            ("BUDGET_OUTDOOR", PlaceCategory::Outdoor),
            ("BUDGET_ATTRACTION", PlaceCategory::Attraction),
            ("BUDGET_LODGING", PlaceCategory::Lodging),
        ] {
            if let Some(cost) = env_parse::<f64>(var).filter(|c| *c >= 0.0) {
                budget_table.set_cost(category, cost);
            }
        }
        if let Some(cost) = env_parse::<f64>("BUDGET_DEFAULT").filter(|c| *c >= 0.0) {
            budget_table.default_cost = cost;
        }

        Self {
            cluster_radius_km: env_parse::<f64>("CLUSTER_RADIUS_KM")
                .filter(|r| *r > 0.0)
                .unwrap_or(defaults.cluster_radius_km),
            max_places_per_interest: env_parse("MAX_PLACES_PER_INTEREST")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_places_per_interest),
            max_total_places: env_parse("MAX_TOTAL_PLACES")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_total_places),
            city_radius_km: env_parse::<f64>("CITY_RADIUS_KM")
                .filter(|r| *r > 0.0)
                .unwrap_or(defaults.city_radius_km),
            budget_table,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_uri: Option<String>,
    pub mongo_database: String,
    pub google_maps_api_key: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ItineraryError> {
        let google_maps_api_key = required("GOOGLE_MAPS_API_KEY")?;
        let openai_api_key = required("OPENAI_API_KEY")?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port: env_parse("PORT").unwrap_or(PORT),
            mongo_uri: env::var("MONGODB_URI").ok().filter(|v| !v.trim().is_empty()),
            mongo_database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| DATABASE.to_string()),
            google_maps_api_key,
            openai_api_key,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| OPENAI_MODEL.to_string()),
            pipeline: PipelineConfig::from_env(),
        })
    }
}

fn required(name: &str) -> Result<String, ItineraryError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ItineraryError::Config(format!("{} environment variable not set", name)))
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
