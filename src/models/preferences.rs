//! Trip preferences that steer the generated guide

use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Budget style of the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetLevel {
    Economy,
    Comfort,
    Luxury,
}

/// When the trip takes place relative to the destination's high season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelSeason {
    #[serde(rename = "Off-peak")]
    OffPeak,
    Shoulder,
    Peak,
}

/// Who is traveling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanionType {
    Solo,
    Couple,
    Family,
    Friends,
}

impl BudgetLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Economy => "Economy",
            BudgetLevel::Comfort => "Comfort",
            BudgetLevel::Luxury => "Luxury",
        }
    }
}

impl TravelSeason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelSeason::OffPeak => "Off-peak",
            TravelSeason::Shoulder => "Shoulder",
            TravelSeason::Peak => "Peak",
        }
    }
}

impl CompanionType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanionType::Solo => "Solo",
            CompanionType::Couple => "Couple",
            CompanionType::Family => "Family",
            CompanionType::Friends => "Friends",
        }
    }
}

impl Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for TravelSeason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for CompanionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "economy" => Ok(BudgetLevel::Economy),
            "comfort" => Ok(BudgetLevel::Comfort),
            "luxury" => Ok(BudgetLevel::Luxury),
            other => Err(format!(
                "unknown budget level '{other}', expected Economy, Comfort or Luxury"
            )),
        }
    }
}

impl FromStr for TravelSeason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off-peak" | "offpeak" => Ok(TravelSeason::OffPeak),
            "shoulder" => Ok(TravelSeason::Shoulder),
            "peak" => Ok(TravelSeason::Peak),
            other => Err(format!(
                "unknown travel season '{other}', expected Off-peak, Shoulder or Peak"
            )),
        }
    }
}

impl FromStr for CompanionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solo" => Ok(CompanionType::Solo),
            "couple" => Ok(CompanionType::Couple),
            "family" => Ok(CompanionType::Family),
            "friends" => Ok(CompanionType::Friends),
            other => Err(format!(
                "unknown companion type '{other}', expected Solo, Couple, Family or Friends"
            )),
        }
    }
}

/// Preferences for a single guide request. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPreferences {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub budget: Option<BudgetLevel>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub season: Option<TravelSeason>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub companion: Option<CompanionType>,
    #[serde(default)]
    pub additional_notes: String,
}

/// The form sends `""` for "no selection", which maps to `None`.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = String>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}
