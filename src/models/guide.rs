//! Generated guide and the citations backing it

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One web resource the generation service cited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

impl GroundingSource {
    #[must_use]
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.uri.is_empty()
    }
}

/// Result of one successful generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelGuideResponse {
    /// Markdown text returned by the model
    pub markdown_content: String,
    /// Unique citations in first-seen order
    pub sources: Vec<GroundingSource>,
}

/// Drop citations missing a title or uri and keep one entry per uri.
///
/// The entry stays at the position where its uri first appeared; a later
/// duplicate replaces its title.
pub fn unique_sources<I>(sources: I) -> Vec<GroundingSource>
where
    I: IntoIterator<Item = GroundingSource>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<GroundingSource> = Vec::new();

    for source in sources.into_iter().filter(GroundingSource::is_complete) {
        match positions.get(&source.uri) {
            Some(&index) => unique[index] = source,
            None => {
                positions.insert(source.uri.clone(), unique.len());
                unique.push(source);
            }
        }
    }

    unique
}
