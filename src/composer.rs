//! Request composer
//!
//! Builds the guide prompt from the source URLs and trip preferences, sends it
//! to the generation service with search grounding and shapes the answer into
//! a [`TravelGuideResponse`].

use std::fmt::Write;
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::error::{NO_URLS_MESSAGE, TravelSynthError};
use crate::gemini::GuideGenerator;
use crate::gemini::types::{Content, GenerateContentRequest, GenerationConfig, Tool};
use crate::models::{TravelGuideResponse, TravelPreferences, unique_sources};

pub const SYSTEM_INSTRUCTION: &str = "You are a world-class travel writer helping a user build the perfect trip summary from multiple sources.";

/// Low sampling temperature keeps the guide close to what search verified.
pub const TEMPERATURE: f32 = 0.4;

/// Substituted when the service answers without any text.
pub const EMPTY_GUIDE_MESSAGE: &str =
    "Sorry, I couldn't generate a guide based on those links. Please try different URLs.";

/// Section headings the model is asked to produce, in order.
pub const GUIDE_SECTIONS: [&str; 6] = [
    "Executive Summary",
    "Best Time to Go",
    "Day-by-Day Itinerary",
    "Must-See Attractions",
    "Food & Dining",
    "Logistics",
];

/// Non-blank URLs, trimmed, in input order
#[must_use]
pub fn usable_urls(urls: &[String]) -> Vec<&str> {
    urls.iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .collect()
}

/// Compose the instruction text sent to the model
#[must_use]
pub fn compose_prompt(urls: &[&str], preferences: &TravelPreferences) -> String {
    let budget = preferences.budget.map(|b| b.as_str());
    let season = preferences.season.map(|s| s.as_str());
    let companion = preferences.companion.map(|c| c.as_str());
    let notes = preferences.additional_notes.as_str();

    let mut prompt = String::new();
    prompt.push_str("You are an expert travel consultant and itinerary planner.\n\n");
    prompt.push_str(
        "Task: Create a comprehensive \"Master Travel Guide\" based on the topics, destinations, and advice found in the following URLs:\n",
    );
    for (index, url) in urls.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {url}", index + 1);
    }

    prompt.push_str("\nUser Preferences & Constraints:\n");
    let _ = writeln!(
        prompt,
        "- Budget Level: {}",
        budget.unwrap_or("Not specified (Provide a balanced mix)")
    );
    let _ = writeln!(
        prompt,
        "- Travel Season: {}",
        season.unwrap_or("Not specified (Mention best times generally)")
    );
    let _ = writeln!(
        prompt,
        "- Travel Companions: {}",
        companion.unwrap_or("Not specified (General)")
    );
    let _ = writeln!(
        prompt,
        "- Additional Focus/Notes: \"{}\"",
        if notes.is_empty() { "None" } else { notes }
    );

    prompt.push_str("\nInstructions:\n");
    prompt.push_str(
        "1. Use the Google Search tool to research the content, locations, and itineraries mentioned in these specific URLs. If the specific URL content is not directly accessible, search for the destination and topic inferred from the URL to gather the best current information.\n",
    );
    prompt.push_str(
        "2. Synthesize all information into a single, cohesive guide. Do not just list the websites; combine their wisdom.\n",
    );
    prompt.push_str(
        "3. **CRITICAL**: Tailor the recommendations based on the User Preferences above.\n",
    );
    prompt.push_str(
        "   - If Budget is Economy, focus on free attractions and cheap eats. If Luxury, suggest fine dining and exclusive experiences.\n",
    );
    prompt.push_str(
        "   - If Family/Kids, check for kid-friendly activities. If Couple, look for romantic spots.\n",
    );
    prompt.push_str("   - If Season is specified, adjust for weather and seasonal closures.\n");
    prompt.push_str(
        "4. Verify facts (opening hours, ticket prices, transport options) using Google Search to ensure the guide is up-to-date.\n",
    );
    prompt.push_str("5. Structure the guide in Markdown with the following sections:\n");

    let section_notes = [
        format!(
            "A quick vibe check of the trip, specifically addressing the {} style.",
            companion.unwrap_or("traveler")
        ),
        format!(
            "Weather and crowd advice (specifically for {}).",
            season.unwrap_or("the recommended season")
        ),
        "A detailed schedule combining the best parts of the inputs.".to_string(),
        "With practical tips (e.g., \"book in advance\").".to_string(),
        format!(
            "Recommendations tailored to the {} budget.",
            budget.unwrap_or("standard")
        ),
        "Transport, accommodation areas, and budget estimates.".to_string(),
    ];
    for (section, note) in GUIDE_SECTIONS.iter().zip(section_notes.iter()) {
        let _ = writeln!(prompt, "   - **{section}**: {note}");
    }

    prompt.push_str(
        "\nMake the tone inspiring, practical, and organized. Use bullet points, bold text for emphasis, and clear headings.\n",
    );
    prompt
}

/// Wrap a prompt with the fixed generation parameters
#[must_use]
pub fn build_request(prompt: String) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::user(prompt)],
        system_instruction: Some(Content::system(SYSTEM_INSTRUCTION)),
        tools: vec![Tool::google_search()],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
        },
    }
}

/// Issues guide requests against a [`GuideGenerator`]
#[derive(Clone)]
pub struct GuideComposer {
    generator: Arc<dyn GuideGenerator>,
}

impl GuideComposer {
    pub fn new(generator: Arc<dyn GuideGenerator>) -> Self {
        Self { generator }
    }

    /// Generate one guide. Makes exactly one call to the generator, or none
    /// when no URL is usable.
    #[instrument(name = "generate_guide", skip_all, fields(urls = urls.len()))]
    pub async fn generate_guide(
        &self,
        urls: &[String],
        preferences: &TravelPreferences,
    ) -> Result<TravelGuideResponse, TravelSynthError> {
        let valid_urls = usable_urls(urls);
        if valid_urls.is_empty() {
            return Err(TravelSynthError::validation(NO_URLS_MESSAGE));
        }

        let request = build_request(compose_prompt(&valid_urls, preferences));
        info!("Requesting travel guide for {} source URLs", valid_urls.len());

        let response = self.generator.generate(&request).await.map_err(|e| {
            error!("Gemini API error: {e:#}");
            TravelSynthError::generation()
        })?;

        let mut markdown_content = response.text();
        if markdown_content.trim().is_empty() {
            warn!("Gemini returned no text, using placeholder guide");
            markdown_content = EMPTY_GUIDE_MESSAGE.to_string();
        }

        let sources = unique_sources(response.web_sources());
        info!(sources = sources.len(), "Travel guide generated");

        Ok(TravelGuideResponse {
            markdown_content,
            sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::GenerateContentResponse;
    use crate::models::{BudgetLevel, CompanionType, GroundingSource, TravelSeason};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records requests and answers with a fixed outcome
    struct ScriptedGenerator {
        calls: AtomicUsize,
        last_request: Mutex<Option<GenerateContentRequest>>,
        response: Option<serde_json::Value>,
    }

    impl ScriptedGenerator {
        fn answering(response: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                response: Some(response),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                response: None,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GuideGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            request: &GenerateContentRequest,
        ) -> anyhow::Result<GenerateContentResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            match &self.response {
                Some(value) => Ok(serde_json::from_value(value.clone())?),
                None => Err(anyhow!("401 API key not valid")),
            }
        }
    }

    fn urls(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn text_response(text: &str) -> serde_json::Value {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    }

    #[test]
    fn test_usable_urls_filters_blanks() {
        let input = urls(&["", "  https://a.example ", "   ", "https://b.example"]);
        assert_eq!(usable_urls(&input), vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_prompt_numbers_urls_from_one() {
        let prompt = compose_prompt(
            &["https://a.example", "https://b.example"],
            &TravelPreferences::default(),
        );
        assert!(prompt.contains("1. https://a.example\n2. https://b.example\n"));
    }

    #[test]
    fn test_prompt_fallbacks_for_unset_preferences() {
        let prompt = compose_prompt(&["https://a.example"], &TravelPreferences::default());
        assert!(prompt.contains("- Budget Level: Not specified (Provide a balanced mix)"));
        assert!(prompt.contains("- Travel Season: Not specified (Mention best times generally)"));
        assert!(prompt.contains("- Travel Companions: Not specified (General)"));
        assert!(prompt.contains("- Additional Focus/Notes: \"None\""));
        assert!(prompt.contains("addressing the traveler style"));
        assert!(prompt.contains("specifically for the recommended season"));
        assert!(prompt.contains("tailored to the standard budget"));
    }

    #[test]
    fn test_prompt_includes_set_preferences() {
        let preferences = TravelPreferences {
            budget: Some(BudgetLevel::Luxury),
            season: Some(TravelSeason::OffPeak),
            companion: Some(CompanionType::Couple),
            additional_notes: "vegetarian food".to_string(),
        };
        let prompt = compose_prompt(&["https://a.example"], &preferences);
        assert!(prompt.contains("- Budget Level: Luxury"));
        assert!(prompt.contains("- Travel Season: Off-peak"));
        assert!(prompt.contains("- Travel Companions: Couple"));
        assert!(prompt.contains("- Additional Focus/Notes: \"vegetarian food\""));
        assert!(prompt.contains("addressing the Couple style"));
        assert!(prompt.contains("tailored to the Luxury budget"));
    }

    #[test]
    fn test_prompt_keeps_notes_verbatim() {
        let preferences = TravelPreferences {
            additional_notes: "  quiet beaches ".to_string(),
            ..Default::default()
        };
        let prompt = compose_prompt(&["https://a.example"], &preferences);
        assert!(prompt.contains("- Additional Focus/Notes: \"  quiet beaches \""));

        let blank = TravelPreferences {
            additional_notes: "   ".to_string(),
            ..Default::default()
        };
        let prompt = compose_prompt(&["https://a.example"], &blank);
        assert!(prompt.contains("- Additional Focus/Notes: \"   \""));
    }

    #[test]
    fn test_prompt_lists_every_section() {
        let prompt = compose_prompt(&["https://a.example"], &TravelPreferences::default());
        for section in GUIDE_SECTIONS {
            assert!(prompt.contains(&format!("**{section}**")), "missing {section}");
        }
    }

    #[test]
    fn test_request_carries_fixed_parameters() {
        let request = build_request("prompt".to_string());
        assert!((request.generation_config.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(request.tools.len(), 1);
        assert!(request.tools[0].google_search.is_some());
        let system = request.system_instruction.unwrap();
        assert_eq!(system.parts[0].text.as_deref(), Some(SYSTEM_INSTRUCTION));
    }

    #[tokio::test]
    async fn test_blank_urls_fail_without_calling_generator() {
        let generator = ScriptedGenerator::answering(text_response("unused"));
        let composer = GuideComposer::new(generator.clone());

        let result = composer
            .generate_guide(&urls(&["", "  ", ""]), &TravelPreferences::default())
            .await;

        assert!(matches!(result, Err(TravelSynthError::Validation { .. })));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_generation_shapes_response() {
        let generator = ScriptedGenerator::answering(json!({
            "candidates": [{
                "content": {"parts": [{"text": "# Lisbon\n- Tram 28"}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://a.example", "title": "A"}},
                    {"web": {"uri": "https://a.example", "title": "A again"}},
                    {"web": {"uri": "", "title": "empty"}},
                    {"web": {"uri": "https://b.example", "title": "B"}}
                ]}
            }]
        }));
        let composer = GuideComposer::new(generator.clone());

        let guide = composer
            .generate_guide(&urls(&["", "https://blog.example/lisbon"]), &TravelPreferences::default())
            .await
            .unwrap();

        assert_eq!(generator.calls(), 1);
        assert_eq!(guide.markdown_content, "# Lisbon\n- Tram 28");
        assert_eq!(
            guide.sources,
            vec![
                GroundingSource::new("A again", "https://a.example"),
                GroundingSource::new("B", "https://b.example"),
            ]
        );

        let request = generator.last_request.lock().unwrap().clone().unwrap();
        let prompt = request.contents[0].parts[0].text.clone().unwrap();
        assert!(prompt.contains("1. https://blog.example/lisbon"));
        assert!(!prompt.contains("2. https://"));
    }

    #[tokio::test]
    async fn test_empty_text_uses_placeholder() {
        let generator = ScriptedGenerator::answering(json!({"candidates": []}));
        let composer = GuideComposer::new(generator);

        let guide = composer
            .generate_guide(&urls(&["https://a.example"]), &TravelPreferences::default())
            .await
            .unwrap();

        assert_eq!(guide.markdown_content, EMPTY_GUIDE_MESSAGE);
        assert!(guide.sources.is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_is_generic() {
        let generator = ScriptedGenerator::failing();
        let composer = GuideComposer::new(generator.clone());

        let err = composer
            .generate_guide(&urls(&["https://a.example"]), &TravelPreferences::default())
            .await
            .unwrap_err();

        assert_eq!(generator.calls(), 1);
        assert_eq!(err.user_message(), crate::error::GENERATION_FAILED_MESSAGE);
        assert!(!err.to_string().contains("401"));
    }
}
