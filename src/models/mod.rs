//! Data models for `TravelSynth`
//!
//! - Preferences: budget, season and companion choices plus free-text notes
//! - Guide: the generated markdown and its grounding citations

pub mod guide;
pub mod preferences;

pub use guide::{GroundingSource, TravelGuideResponse, unique_sources};
pub use preferences::{BudgetLevel, CompanionType, TravelPreferences, TravelSeason};
