use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ListingId = u32;

/// Category of a marketplace listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Land,
    Product,
}

/// Core listing data model. Land-only attributes are `None` on products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    #[serde(rename = "type")]
    pub kind: ListingKind,
    pub title: String,
    pub price: String,
    pub location: String,
    pub image: String,
    pub seller: String,
    pub seller_photo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_source: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ai_tips: Vec<String>,
}

impl Listing {
    pub fn is_land(&self) -> bool {
        self.kind == ListingKind::Land
    }
}

/// Model-generated fit of one listing for a farming query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuitabilityResult {
    pub id: ListingId,
    pub suitability_score: u8,
    pub reason: String,
}

/// A listing annotated with its suitability score, as displayed
#[derive(Debug, Clone, PartialEq)]
pub struct RankedListing {
    pub listing: Listing,
    pub score: u8,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatPart {
    pub text: String,
}

/// One bubble in the AI Guide transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub parts: Vec<ChatPart>,
    /// Data URL preview of an attached image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, image: Option<String>) -> Self {
        Self {
            role: ChatRole::User,
            parts: vec![ChatPart { text: text.into() }],
            image,
            sent_at: Utc::now(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            parts: vec![ChatPart { text: text.into() }],
            image: None,
            sent_at: Utc::now(),
        }
    }

    pub fn append(&mut self, fragment: &str) {
        match self.parts.last_mut() {
            Some(part) => part.text.push_str(fragment),
            None => self.parts.push(ChatPart {
                text: fragment.to_string(),
            }),
        }
    }

    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Inbox entry for a direct conversation with a seller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: u32,
    pub user_name: String,
    pub user_photo: String,
    pub last_message: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<u32>,
    pub listing_title: String,
}

impl Conversation {
    pub fn has_unread(&self) -> bool {
        self.unread_count.unwrap_or(0) > 0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Me,
    Other,
}

/// One message in a direct conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    pub id: u32,
    pub text: String,
    /// Display time, e.g. "10:42 AM"
    pub timestamp: String,
    #[serde(rename = "senderId")]
    pub sender: Sender,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub photo: String,
    pub district: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}
