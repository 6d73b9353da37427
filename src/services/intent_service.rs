use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ItineraryError;
use crate::models::search::TravelIntent;
use crate::services::interface::IntentExtractor;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const SERVICE: &str = "intent extraction";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    city: Option<String>,
    #[serde(default)]
    interests: Vec<String>,
}

#[derive(Clone)]
pub struct OpenAiIntentService {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenAiIntentService {
    pub fn new(api_key: String, model: String) -> Result<Self, ItineraryError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            model,
            url: CHAT_COMPLETIONS_URL.to_string(),
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn prompt(text: &str) -> String {
        format!(
            r#"You are a travel planning assistant. Extract the city name and key interests (like bookstores, parks, cozy cafes, hidden spots, etc.)
from this prompt: "{}".

Respond in this exact JSON format (no extra text):
{{
    "city": "city_name",
    "interests": ["keyword1", "keyword2", "keyword3"]
}}

Make sure to include 2-4 relevant keywords that would work well with Google Places API."#,
            text
        )
    }
}

/// Pull the `{city, interests}` object out of a model reply. Models sometimes
/// wrap the JSON in prose or code fences.
pub fn parse_intent_reply(reply: &str) -> Result<TravelIntent, ItineraryError> {
    let object = Regex::new(r"(?s)\{.*\}")
        .map_err(|e| ItineraryError::collaborator(SERVICE, e.to_string()))?
        .find(reply)
        .ok_or_else(|| ItineraryError::collaborator(SERVICE, "reply contained no JSON object"))?;

    let raw: RawIntent = serde_json::from_str(object.as_str())
        .map_err(|e| ItineraryError::collaborator(SERVICE, format!("unparseable reply: {}", e)))?;

    let city = raw
        .city
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ItineraryError::collaborator(SERVICE, "reply did not name a city"))?;

    let interests: Vec<String> = raw
        .interests
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if interests.is_empty() {
        return Err(ItineraryError::collaborator(
            SERVICE,
            "reply did not list any interests",
        ));
    }

    Ok(TravelIntent { city, interests })
}

#[async_trait]
impl IntentExtractor for OpenAiIntentService {
    async fn extract_intent(&self, text: &str) -> Result<TravelIntent, ItineraryError> {
        if text.trim().is_empty() {
            return Err(ItineraryError::invalid_input("prompt is empty"));
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::prompt(text),
            }],
            temperature: 0.4,
        };

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ItineraryError::collaborator(
                SERVICE,
                format!("{}: {}", status, body),
            ));
        }

        let chat: ChatResponse = response.json().await?;
        let reply = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ItineraryError::collaborator(SERVICE, "no choices returned"))?;
        debug!("Intent reply: {}", reply);

        let intent = parse_intent_reply(&reply)?;
        info!(
            "Extracted city '{}' with interests {:?}",
            intent.city, intent.interests
        );
        Ok(intent)
    }
}
