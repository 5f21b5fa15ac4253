//! Brand map data model.

use std::collections::BTreeMap;

use brandmap_core::BrandDescriptor;
use serde::Serialize;

use crate::error::StageError;

/// Trending signals for a country.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendingSignals {
    pub music: Vec<String>,
}

/// Cultural signals gathered for one resolved country.
///
/// Each list holds at most eight names. Any list may be empty when its
/// insight call failed or returned nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSignals {
    pub country: String,
    pub location_id: String,
    pub music: Vec<String>,
    pub fashion: Vec<String>,
    pub entertainment: Vec<String>,
    pub places: Vec<String>,
    /// Opaque demographic record passed through from the insights service.
    pub demographics: serde_json::Value,
    pub trending: TrendingSignals,
}

/// A country's cultural profile, or the reason none could be built.
///
/// Downstream stages receive both shapes; an unavailable profile is present
/// but empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CulturalProfile {
    Resolved(ProfileSignals),
    Unavailable { country: String, error: String },
}

impl CulturalProfile {
    pub fn unavailable(country: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Unavailable {
            country: country.into(),
            error: error.into(),
        }
    }

    #[must_use]
    pub fn country(&self) -> &str {
        match self {
            Self::Resolved(signals) => &signals.country,
            Self::Unavailable { country, .. } => country,
        }
    }

    #[must_use]
    pub fn signals(&self) -> Option<&ProfileSignals> {
        match self {
            Self::Resolved(signals) => Some(signals),
            Self::Unavailable { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Resolved(_) => None,
            Self::Unavailable { error, .. } => Some(error),
        }
    }
}

/// Outcome of one unit of work.
///
/// Serializes as the bare payload on success and as `{"error": "..."}` on
/// failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskResult<T> {
    Success(T),
    Error { error: String },
}

impl<T> TaskResult<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error { .. } => None,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Error { error } => Some(error),
        }
    }

    /// Applies a fallible conversion to a successful value.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U, StageError>) -> TaskResult<U> {
        match self {
            Self::Success(value) => f(value).into(),
            Self::Error { error } => TaskResult::Error { error },
        }
    }
}

impl<T> From<Result<T, StageError>> for TaskResult<T> {
    fn from(result: Result<T, StageError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CulturalAnalysis {
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandStrategy {
    pub strategy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandPersona {
    pub persona: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompetitiveAnalysis {
    pub competitive_analysis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketComparison {
    pub comparison: String,
}

/// Per-country results keyed by country name.
pub type CountryResults<T> = BTreeMap<String, TaskResult<T>>;

/// The assembled response for one brand map request.
///
/// Every per-country map has exactly the request's target countries as keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandMap {
    pub brand_info: BrandDescriptor,
    pub cultural_analysis: CountryResults<CulturalAnalysis>,
    pub brand_strategies: CountryResults<BrandStrategy>,
    pub brand_personas: CountryResults<BrandPersona>,
    pub competitive_analysis: CountryResults<CompetitiveAnalysis>,
    pub comparison: TaskResult<MarketComparison>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn task_result_success_serializes_as_payload() {
        let result = TaskResult::Success(BrandStrategy {
            strategy: "Lead with craft.".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&result).expect("serialize"),
            json!({"strategy": "Lead with craft."})
        );
    }

    #[test]
    fn task_result_error_serializes_as_error_object() {
        let result: TaskResult<BrandPersona> = TaskResult::error("generation unavailable");
        assert_eq!(
            serde_json::to_value(&result).expect("serialize"),
            json!({"error": "generation unavailable"})
        );
    }

    #[test]
    fn task_result_from_stage_error_keeps_message() {
        let result: TaskResult<()> = Err(StageError::Panicked("oops".to_string())).into();
        assert_eq!(result.error_message(), Some("task panicked: oops"));
    }

    #[test]
    fn and_then_converts_or_propagates() {
        let ok: TaskResult<u8> = TaskResult::Success(2);
        assert_eq!(ok.and_then(|n| Ok(n * 2)), TaskResult::Success(4));

        let failing: TaskResult<u8> = TaskResult::Success(2);
        let converted: TaskResult<u8> = failing.and_then(|_| Err(StageError::failed("bad")));
        assert_eq!(converted.error_message(), Some("bad"));

        let err: TaskResult<u8> = TaskResult::error("earlier");
        assert_eq!(err.and_then(|n| Ok(n + 1)).error_message(), Some("earlier"));
    }

    #[test]
    fn unavailable_profile_serializes_without_signal_fields() {
        let profile = CulturalProfile::unavailable(
            "Atlantis",
            "Could not find location information for Atlantis.",
        );
        assert_eq!(
            serde_json::to_value(&profile).expect("serialize"),
            json!({
                "country": "Atlantis",
                "error": "Could not find location information for Atlantis."
            })
        );
        assert!(profile.signals().is_none());
    }

    #[test]
    fn resolved_profile_serializes_trending_under_music() {
        let profile = CulturalProfile::Resolved(ProfileSignals {
            country: "Japan".to_string(),
            location_id: "LOC-JP".to_string(),
            music: vec!["Ado".to_string()],
            fashion: vec![],
            entertainment: vec![],
            places: vec![],
            demographics: json!({}),
            trending: TrendingSignals {
                music: vec!["YOASOBI".to_string()],
            },
        });
        let value = serde_json::to_value(&profile).expect("serialize");
        assert_eq!(value["location_id"], "LOC-JP");
        assert_eq!(value["trending"]["music"][0], "YOASOBI");
        assert_eq!(profile.country(), "Japan");
        assert!(profile.error().is_none());
    }
}
