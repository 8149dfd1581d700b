pub mod ai;
pub mod app;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod storage;
pub mod wishlist;

pub use config::Config;
pub use error::{MarketError, Result};
