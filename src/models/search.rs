use serde::{Deserialize, Serialize};

use crate::models::place::Coordinate;

pub const ANONYMOUS_USER: &str = "anonymous";

fn default_user() -> String {
    ANONYMOUS_USER.to_string()
}

/// What the intent collaborator extracts from a free-text request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TravelIntent {
    pub city: String,
    pub interests: Vec<String>,
}

/// Free-text planning request.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlanRequest {
    pub prompt: String,
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default)]
    pub save: bool,
}

/// Build from candidates the caller already holds (e.g. a hand-picked subset
/// of an earlier search). `places` is raw provider JSON.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BuildRequest {
    pub city: String,
    #[serde(default)]
    pub interests: Vec<String>,
    pub places: serde_json::Value,
    pub start: Option<Coordinate>,
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlacesPayload {
    pub places: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ListQuery {
    #[serde(default = "default_user")]
    pub user_id: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FavoriteUpdate {
    pub favorite: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TagsUpdate {
    pub tags: Vec<String>,
}
