use crate::error::{MarketError, Result};
use crate::models::{ListingId, Theme, UserProfile};
use crate::storage::traits::KeyValueStore;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Storage keys shared with the web client
pub mod keys {
    pub const ONBOARDED: &str = "onboarded";
    pub const USER_PROFILE: &str = "userProfile";
    pub const THEME: &str = "theme";
    pub const WISHLIST: &str = "userWishlist";
}

/// Typed access to the persisted local state
pub struct Preferences {
    store: Box<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn is_onboarded(&self) -> bool {
        matches!(self.store.get(keys::ONBOARDED), Ok(Some(flag)) if flag == "true")
    }

    pub fn set_onboarded(&mut self) -> Result<()> {
        self.store.set(keys::ONBOARDED, "true")
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.read_json(keys::USER_PROFILE)
    }

    pub fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        self.write_json(keys::USER_PROFILE, profile)
    }

    pub fn theme(&self) -> Theme {
        match self.store.get(keys::THEME) {
            Ok(Some(value)) => Theme::parse(&value).unwrap_or_else(|| {
                warn!(value = %value, "Unknown theme in store, using light");
                Theme::Light
            }),
            _ => Theme::default(),
        }
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set(keys::THEME, theme.as_str())
    }

    /// Stored wishlist ids; unreadable data counts as an empty list
    pub fn wishlist(&self) -> Vec<ListingId> {
        self.read_json(keys::WISHLIST).unwrap_or_default()
    }

    pub fn save_wishlist(&mut self, ids: &[ListingId]) -> Result<()> {
        self.write_json(keys::WISHLIST, &ids)
    }

    /// Wipe all local state (logout)
    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read from store");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Malformed JSON in store");
                None
            }
        }
    }

    fn write_json<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).map_err(|e| MarketError::Storage(e.to_string()))?;
        self.store.set(key, &json)
    }
}
