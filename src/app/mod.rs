pub mod direct_chat;
pub mod guide_session;
pub mod land_search;
pub mod state;

pub use direct_chat::{ChatDetails, DirectChat};
pub use guide_session::{GuideSession, GREETING, QUICK_QUESTIONS};
pub use land_search::{AnalysisRequest, LandFilter, LandSearch};
pub use state::{AppState, OnboardingEvent, OnboardingStep, Screen, Tab, UserRole};
