use crate::fixtures;
use crate::models::{Conversation, DirectMessage, Listing, Sender};
use chrono::Local;
use tracing::debug;

/// Who the user is talking to in a direct chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatDetails {
    pub user_name: String,
    pub user_photo: String,
    pub listing_title: String,
}

impl ChatDetails {
    pub fn for_listing(listing: &Listing) -> Self {
        Self {
            user_name: listing.seller.clone(),
            user_photo: listing.seller_photo.clone(),
            listing_title: listing.title.clone(),
        }
    }

    pub fn for_conversation(conversation: &Conversation) -> Self {
        Self {
            user_name: conversation.user_name.clone(),
            user_photo: conversation.user_photo.clone(),
            listing_title: conversation.listing_title.clone(),
        }
    }
}

/// A direct thread with a seller. Messages stay local; nothing is delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectChat {
    details: ChatDetails,
    messages: Vec<DirectMessage>,
}

impl DirectChat {
    /// Open a thread seeded with the opening messages
    pub fn open(details: ChatDetails) -> Self {
        Self {
            details,
            messages: fixtures::seeded_thread(),
        }
    }

    pub fn details(&self) -> &ChatDetails {
        &self.details
    }

    pub fn messages(&self) -> &[DirectMessage] {
        &self.messages
    }

    /// Append one of the user's messages. Blank input is ignored.
    pub fn send(&mut self, text: &str) -> Option<&DirectMessage> {
        if text.trim().is_empty() {
            return None;
        }

        let message = DirectMessage {
            id: self.messages.len() as u32 + 1,
            text: text.to_string(),
            timestamp: Local::now().format("%I:%M %p").to_string(),
            sender: Sender::Me,
        };
        debug!(to = %self.details.user_name, id = message.id, "Direct message added");
        self.messages.push(message);
        self.messages.last()
    }
}
