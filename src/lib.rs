//! `TravelSynth` - one travel guide from many travel links
//!
//! Sends the user's source URLs and trip preferences to Gemini with Google
//! Search grounding, then renders the returned markdown and its citations.

pub mod api;
pub mod app;
pub mod composer;
pub mod config;
pub mod error;
pub mod gemini;
pub mod markdown;
pub mod models;
pub mod session;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use app::AppState;
pub use composer::GuideComposer;
pub use config::TravelSynthConfig;
pub use error::TravelSynthError;
pub use gemini::{GeminiClient, GuideGenerator};
pub use models::{
    BudgetLevel, CompanionType, GroundingSource, TravelGuideResponse, TravelPreferences,
    TravelSeason,
};
pub use session::{Session, Status};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelSynthError>;
