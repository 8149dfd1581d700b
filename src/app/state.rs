use crate::app::direct_chat::{ChatDetails, DirectChat};
use crate::error::{MarketError, Result};
use crate::fixtures;
use crate::models::{Listing, ListingId, Theme, UserProfile};
use crate::storage::Preferences;
use crate::wishlist::Wishlist;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Onboarding flow, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Welcome,
    RoleSelection,
    PhoneAuth,
    Otp,
    ProfileCompletion,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    LandOwner,
    Farmer,
    Trader,
    Investor,
}

/// User actions that move onboarding forward
#[derive(Debug, Clone, PartialEq)]
pub enum OnboardingEvent {
    Started,
    RoleSelected(UserRole),
    OtpRequested { phone: String },
    OtpVerified,
    ProfileCompleted(UserProfile),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Marketplace,
    RentLand,
    Messages,
    AiGuide,
    Profile,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Marketplace => "Marketplace",
            Tab::RentLand => "Rent Land",
            Tab::Messages => "Messages",
            Tab::AiGuide => "AI Guide",
            Tab::Profile => "Profile",
        }
    }
}

/// What is on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen<'a> {
    Onboarding(OnboardingStep),
    Chat(&'a DirectChat),
    Tab(Tab),
}

/// Single owner of the app's mutable state and its persistence
pub struct AppState {
    prefs: Preferences,
    onboarding: OnboardingStep,
    role: Option<UserRole>,
    phone: Option<String>,
    profile: UserProfile,
    theme: Theme,
    tab: Tab,
    active_chat: Option<DirectChat>,
    wishlist: Wishlist,
}

impl AppState {
    /// Restore state from storage. Returning users skip onboarding.
    pub fn load(prefs: Preferences) -> Self {
        let onboarded = prefs.is_onboarded();
        let profile = if onboarded {
            prefs.profile().unwrap_or_default()
        } else {
            UserProfile::default()
        };
        let theme = prefs.theme();
        let wishlist = Wishlist::load(&prefs);

        debug!(onboarded, theme = theme.as_str(), saved = wishlist.len(), "Loaded app state");

        Self {
            prefs,
            onboarding: if onboarded {
                OnboardingStep::Complete
            } else {
                OnboardingStep::Welcome
            },
            role: None,
            phone: None,
            profile,
            theme,
            tab: Tab::Home,
            active_chat: None,
            wishlist,
        }
    }

    pub fn screen(&self) -> Screen<'_> {
        if self.onboarding != OnboardingStep::Complete {
            return Screen::Onboarding(self.onboarding);
        }
        match &self.active_chat {
            Some(chat) => Screen::Chat(chat),
            None => Screen::Tab(self.tab),
        }
    }

    pub fn onboarding_step(&self) -> OnboardingStep {
        self.onboarding
    }

    pub fn role(&self) -> Option<UserRole> {
        self.role
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Apply an onboarding event; events out of order are rejected
    pub fn advance(&mut self, event: OnboardingEvent) -> Result<OnboardingStep> {
        let next = match (self.onboarding, event) {
            (OnboardingStep::Welcome, OnboardingEvent::Started) => OnboardingStep::RoleSelection,
            (OnboardingStep::RoleSelection, OnboardingEvent::RoleSelected(role)) => {
                self.role = Some(role);
                OnboardingStep::PhoneAuth
            }
            (OnboardingStep::PhoneAuth, OnboardingEvent::OtpRequested { phone }) => {
                if phone.trim().is_empty() {
                    return Err(MarketError::InvalidTransition(
                        "phone number is required".to_string(),
                    ));
                }
                self.phone = Some(phone.trim().to_string());
                OnboardingStep::Otp
            }
            (OnboardingStep::Otp, OnboardingEvent::OtpVerified) => {
                OnboardingStep::ProfileCompletion
            }
            (OnboardingStep::ProfileCompletion, OnboardingEvent::ProfileCompleted(profile)) => {
                self.complete_onboarding(profile)?;
                OnboardingStep::Complete
            }
            (step, event) => {
                return Err(MarketError::InvalidTransition(format!(
                    "{event:?} during {step:?}"
                )));
            }
        };

        debug!(from = ?self.onboarding, to = ?next, "Onboarding advanced");
        self.onboarding = next;
        Ok(next)
    }

    fn complete_onboarding(&mut self, profile: UserProfile) -> Result<()> {
        if profile.name.trim().is_empty()
            || profile.district.trim().is_empty()
            || profile.photo.trim().is_empty()
        {
            return Err(MarketError::InvalidTransition(
                "name, district and photo are required".to_string(),
            ));
        }

        self.prefs.set_onboarded()?;
        self.prefs.save_profile(&profile)?;
        info!(district = %profile.district, "Onboarding complete");
        self.profile = profile;
        Ok(())
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Open a direct chat over the current tab
    pub fn start_chat(&mut self, details: ChatDetails) -> &mut DirectChat {
        debug!(with = %details.user_name, "Chat opened");
        self.active_chat.insert(DirectChat::open(details))
    }

    /// Open the inbox conversation with `id`, if there is one
    pub fn open_conversation(&mut self, id: u32) -> Option<&mut DirectChat> {
        let conversation = fixtures::conversations().into_iter().find(|c| c.id == id)?;
        Some(self.start_chat(ChatDetails::for_conversation(&conversation)))
    }

    pub fn active_chat(&self) -> Option<&DirectChat> {
        self.active_chat.as_ref()
    }

    pub fn active_chat_mut(&mut self) -> Option<&mut DirectChat> {
        self.active_chat.as_mut()
    }

    pub fn close_chat(&mut self) {
        self.active_chat = None;
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme.toggled();
        self.prefs.save_theme(next)?;
        self.theme = next;
        Ok(next)
    }

    /// Returns whether the listing is now saved
    pub fn toggle_wishlist(&mut self, id: ListingId) -> Result<bool> {
        self.wishlist.toggle(&mut self.prefs, id)
    }

    /// Saved listings, in catalogue order
    pub fn wishlisted_listings(&self) -> Vec<Listing> {
        fixtures::listings_by_ids(self.wishlist.ids())
    }

    /// Wipe local state and return to the start of onboarding
    pub fn logout(&mut self) -> Result<()> {
        self.prefs.clear()?;
        self.onboarding = OnboardingStep::Welcome;
        self.role = None;
        self.phone = None;
        self.profile = UserProfile::default();
        self.theme = Theme::default();
        self.tab = Tab::Home;
        self.active_chat = None;
        self.wishlist = Wishlist::load(&self.prefs);
        info!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    fn profile() -> UserProfile {
        UserProfile {
            name: "Grace A.".to_string(),
            photo: "data:image/png;base64,AA==".to_string(),
            district: "Gulu".to_string(),
        }
    }

    fn onboard(state: &mut AppState) {
        state.advance(OnboardingEvent::Started).unwrap();
        state.advance(OnboardingEvent::RoleSelected(UserRole::Farmer)).unwrap();
        state
            .advance(OnboardingEvent::OtpRequested {
                phone: "+256 700 000000".to_string(),
            })
            .unwrap();
        state.advance(OnboardingEvent::OtpVerified).unwrap();
        state.advance(OnboardingEvent::ProfileCompleted(profile())).unwrap();
    }

    #[test]
    fn new_user_starts_at_welcome() {
        let state = AppState::load(Preferences::new(MemoryStore::new()));
        assert_eq!(state.screen(), Screen::Onboarding(OnboardingStep::Welcome));
    }

    #[test]
    fn onboarding_walks_every_step() {
        let mut state = AppState::load(Preferences::new(MemoryStore::new()));
        onboard(&mut state);

        assert_eq!(state.onboarding_step(), OnboardingStep::Complete);
        assert_eq!(state.role(), Some(UserRole::Farmer));
        assert_eq!(state.screen(), Screen::Tab(Tab::Home));
    }

    #[test]
    fn out_of_order_event_is_rejected() {
        let mut state = AppState::load(Preferences::new(MemoryStore::new()));
        let err = state.advance(OnboardingEvent::OtpVerified).unwrap_err();
        assert!(matches!(err, MarketError::InvalidTransition(_)));
        assert_eq!(state.onboarding_step(), OnboardingStep::Welcome);
    }

    #[test]
    fn incomplete_profile_is_rejected() {
        let mut state = AppState::load(Preferences::new(MemoryStore::new()));
        state.advance(OnboardingEvent::Started).unwrap();
        state.advance(OnboardingEvent::RoleSelected(UserRole::Trader)).unwrap();
        state
            .advance(OnboardingEvent::OtpRequested { phone: "0700".to_string() })
            .unwrap();
        state.advance(OnboardingEvent::OtpVerified).unwrap();

        let mut missing_photo = profile();
        missing_photo.photo.clear();
        assert!(state.advance(OnboardingEvent::ProfileCompleted(missing_photo)).is_err());
        assert_eq!(state.onboarding_step(), OnboardingStep::ProfileCompletion);
    }

    #[test]
    fn returning_user_skips_onboarding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut state = AppState::load(Preferences::new(FileStore::open(&path).unwrap()));
        onboard(&mut state);
        state.toggle_wishlist(3).unwrap();
        state.toggle_theme().unwrap();
        drop(state);

        let state = AppState::load(Preferences::new(FileStore::open(&path).unwrap()));
        assert_eq!(state.onboarding_step(), OnboardingStep::Complete);
        assert_eq!(state.profile(), &profile());
        assert_eq!(state.theme(), Theme::Dark);
        assert_eq!(state.wishlist().ids(), &[3]);
    }

    #[test]
    fn chat_overlays_tabs() {
        let mut state = AppState::load(Preferences::new(MemoryStore::new()));
        onboard(&mut state);
        state.set_tab(Tab::RentLand);

        let listing = fixtures::find_listing(4).unwrap();
        state.start_chat(ChatDetails::for_listing(&listing));
        assert!(matches!(state.screen(), Screen::Chat(c) if c.details().user_name == "David O."));

        state.close_chat();
        assert_eq!(state.screen(), Screen::Tab(Tab::RentLand));
    }

    #[test]
    fn inbox_conversation_opens_thread() {
        let mut state = AppState::load(Preferences::new(MemoryStore::new()));
        onboard(&mut state);
        state.set_tab(Tab::Messages);

        let chat = state.open_conversation(3).unwrap();
        assert_eq!(chat.details().listing_title, "NPK Fertilizer");
        chat.send("Do you deliver to Gulu?");

        let chat = state.active_chat().unwrap();
        assert_eq!(chat.messages().len(), 4);
        assert!(state.open_conversation(99).is_none());

        state.close_chat();
        assert_eq!(state.screen(), Screen::Tab(Tab::Messages));
    }

    #[test]
    fn wishlisted_listings_follow_toggles() {
        let mut state = AppState::load(Preferences::new(MemoryStore::new()));
        state.toggle_wishlist(101).unwrap();
        state.toggle_wishlist(2).unwrap();

        let titles: Vec<_> = state.wishlisted_listings().into_iter().map(|l| l.title).collect();
        assert_eq!(titles, vec!["Lakeside Plot", "Organic Maize"]);
    }

    #[test]
    fn logout_clears_everything() {
        let mut state = AppState::load(Preferences::new(MemoryStore::new()));
        onboard(&mut state);
        state.toggle_wishlist(1).unwrap();
        state.set_tab(Tab::Profile);

        state.logout().unwrap();

        assert_eq!(state.screen(), Screen::Onboarding(OnboardingStep::Welcome));
        assert_eq!(state.tab(), Tab::Home);
        assert!(state.wishlist().is_empty());
        assert_eq!(state.profile(), &UserProfile::default());
    }
}
