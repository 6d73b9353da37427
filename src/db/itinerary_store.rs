//! Saved itinerary persistence
//!
//! [`MongoItineraryStore`] keeps itineraries in the `Itineraries` collection.
//! [`MemoryItineraryStore`] is used when no `MONGODB_URI` is configured and by
//! the test suite.

use std::sync::Arc;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, SecondsFormat, Utc};
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::{Client, Collection};
use tokio::sync::RwLock;

use crate::error::ItineraryError;
use crate::models::itinerary::Itinerary;
use crate::services::interface::ItineraryStore;

pub const COLLECTION: &str = "Itineraries";

fn parse_id(id: &str) -> Result<ObjectId, ItineraryError> {
    ObjectId::parse_str(id).map_err(|_| ItineraryError::invalid_input("Invalid ID"))
}

/// Timestamps written through `$set` use the same text form serde gives
/// `DateTime<Utc>` on insert.
fn stored_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn not_found(id: &str) -> ItineraryError {
    ItineraryError::NotFound(format!("itinerary {}", id))
}

pub struct MongoItineraryStore {
    collection: Collection<Itinerary>,
}

impl MongoItineraryStore {
    pub fn new(client: Arc<Client>, database: &str) -> Self {
        Self {
            collection: client.database(database).collection(COLLECTION),
        }
    }
}

#[async_trait]
impl ItineraryStore for MongoItineraryStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn save(&self, itinerary: &Itinerary) -> Result<String, ItineraryError> {
        let result = self.collection.insert_one(itinerary).await?;
        let id = match result.inserted_id.as_object_id() {
            Some(oid) => oid.to_hex(),
            None => result.inserted_id.to_string(),
        };
        info!("Saved itinerary {} for user {}", id, itinerary.user_id);
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Itinerary, ItineraryError> {
        let oid = parse_id(id)?;
        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<Itinerary>, ItineraryError> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?;
        let itineraries: Vec<Itinerary> = cursor.try_collect().await?;
        debug!("Listed {} itineraries for {}", itineraries.len(), user_id);
        Ok(itineraries)
    }

    async fn delete(&self, id: &str) -> Result<(), ItineraryError> {
        let oid = parse_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        if result.deleted_count == 0 {
            return Err(not_found(id));
        }
        info!("Deleted itinerary {}", id);
        Ok(())
    }

    async fn set_favorite(&self, id: &str, favorite: bool) -> Result<(), ItineraryError> {
        let oid = parse_id(id)?;
        let update = doc! {
            "$set": { "favorite": favorite, "updated_at": stored_timestamp(Utc::now()) }
        };
        let result = self.collection.update_one(doc! { "_id": oid }, update).await?;
        if result.matched_count == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn set_tags(&self, id: &str, tags: Vec<String>) -> Result<(), ItineraryError> {
        let oid = parse_id(id)?;
        let update = doc! {
            "$set": { "tags": tags, "updated_at": stored_timestamp(Utc::now()) }
        };
        let result = self.collection.update_one(doc! { "_id": oid }, update).await?;
        if result.matched_count == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryItineraryStore {
    itineraries: RwLock<Vec<Itinerary>>,
}

impl MemoryItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItineraryStore for MemoryItineraryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn save(&self, itinerary: &Itinerary) -> Result<String, ItineraryError> {
        let id = ObjectId::new();
        let mut stored = itinerary.clone();
        stored.id = Some(id);
        self.itineraries.write().await.push(stored);
        Ok(id.to_hex())
    }

    async fn get(&self, id: &str) -> Result<Itinerary, ItineraryError> {
        let oid = parse_id(id)?;
        self.itineraries
            .read()
            .await
            .iter()
            .find(|i| i.id == Some(oid))
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list(&self, user_id: &str, limit: i64) -> Result<Vec<Itinerary>, ItineraryError> {
        let mut matching: Vec<Itinerary> = self
            .itineraries
            .read()
            .await
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        // Newest first; insertion order breaks ties.
        matching.reverse();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit.max(0) as usize);
        Ok(matching)
    }

    async fn delete(&self, id: &str) -> Result<(), ItineraryError> {
        let oid = parse_id(id)?;
        let mut itineraries = self.itineraries.write().await;
        let before = itineraries.len();
        itineraries.retain(|i| i.id != Some(oid));
        if itineraries.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn set_favorite(&self, id: &str, favorite: bool) -> Result<(), ItineraryError> {
        let oid = parse_id(id)?;
        let mut itineraries = self.itineraries.write().await;
        let itinerary = itineraries
            .iter_mut()
            .find(|i| i.id == Some(oid))
            .ok_or_else(|| not_found(id))?;
        itinerary.favorite = favorite;
        itinerary.updated_at = Utc::now();
        Ok(())
    }

    async fn set_tags(&self, id: &str, tags: Vec<String>) -> Result<(), ItineraryError> {
        let oid = parse_id(id)?;
        let mut itineraries = self.itineraries.write().await;
        let itinerary = itineraries
            .iter_mut()
            .find(|i| i.id == Some(oid))
            .ok_or_else(|| not_found(id))?;
        itinerary.tags = tags;
        itinerary.updated_at = Utc::now();
        Ok(())
    }
}
