//! Prompt construction and generation wrappers for each artifact.
//!
//! Every per-country prompt names its country on the first line. Generated
//! text is taken as-is: an empty answer is still a successful artifact.

use brandmap_core::BrandDescriptor;
use serde::Serialize;

use crate::error::StageError;
use crate::pool::GenerationPool;
use crate::types::{
    BrandPersona, BrandStrategy, CompetitiveAnalysis, CountryResults, CulturalAnalysis,
    CulturalProfile, MarketComparison, TaskResult,
};

/// Analysis result for a country whose profile could not be built.
pub const UNAVAILABLE_PROFILE: &str = "Invalid or empty profile provided.";
/// Comparison result when there are no analyses at all.
pub const NOTHING_TO_COMPARE: &str = "No profiles to compare.";

/// Analyzes one country's profile.
///
/// # Errors
///
/// Returns [`UNAVAILABLE_PROFILE`] without a generation call when the profile
/// is unavailable.
pub async fn analyze_profile(
    pool: &GenerationPool,
    profile: &CulturalProfile,
) -> Result<CulturalAnalysis, StageError> {
    if profile.signals().is_none() {
        return Err(StageError::failed(UNAVAILABLE_PROFILE));
    }
    let prompt = analysis_prompt(profile)?;
    let analysis = pool.complete(&prompt).await?;
    Ok(CulturalAnalysis { analysis })
}

/// Generates a strategy from the country's analysis. A failed analysis is
/// noted in the prompt rather than skipping the strategy.
pub async fn generate_strategy(
    pool: &GenerationPool,
    descriptor: &BrandDescriptor,
    country: &str,
    analysis: Option<&TaskResult<CulturalAnalysis>>,
) -> Result<BrandStrategy, StageError> {
    let prompt = strategy_prompt(descriptor, country, analysis)?;
    let strategy = pool.complete(&prompt).await?;
    Ok(BrandStrategy { strategy })
}

pub async fn generate_persona(
    pool: &GenerationPool,
    country: &str,
    profile: Option<&CulturalProfile>,
) -> Result<BrandPersona, StageError> {
    let prompt = persona_prompt(country, profile)?;
    let persona = pool.complete(&prompt).await?;
    Ok(BrandPersona { persona })
}

pub async fn analyze_competition(
    pool: &GenerationPool,
    brand_name: &str,
    competitors: &[String],
    country: &str,
) -> Result<CompetitiveAnalysis, StageError> {
    let prompt = competitive_prompt(brand_name, competitors, country);
    let competitive_analysis = pool.complete(&prompt).await?;
    Ok(CompetitiveAnalysis {
        competitive_analysis,
    })
}

/// Compares every country's analysis outcome, failed ones included.
///
/// # Errors
///
/// Returns [`NOTHING_TO_COMPARE`] without a generation call when `analyses`
/// is empty.
pub async fn compare_markets(
    pool: &GenerationPool,
    analyses: &CountryResults<CulturalAnalysis>,
) -> Result<MarketComparison, StageError> {
    if analyses.is_empty() {
        return Err(StageError::failed(NOTHING_TO_COMPARE));
    }
    let prompt = comparison_prompt(&render(analyses)?);
    let comparison = pool.complete(&prompt).await?;
    Ok(MarketComparison { comparison })
}

fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, StageError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| StageError::failed(format!("failed to render prompt input: {e}")))
}

fn analysis_prompt(profile: &CulturalProfile) -> Result<String, StageError> {
    Ok(format!(
        "Analyze the following cultural profile for {country} and extract key insights.\n\
         Provide a summary of cultural values, consumer behavior, and communication style.\n\
         Also, determine the market maturity and digital adoption rate.\n\
         \n\
         Profile:\n{profile}\n",
        country = profile.country(),
        profile = render(profile)?,
    ))
}

fn strategy_prompt(
    descriptor: &BrandDescriptor,
    country: &str,
    analysis: Option<&TaskResult<CulturalAnalysis>>,
) -> Result<String, StageError> {
    let cultural = match analysis {
        Some(TaskResult::Success(a)) => a.analysis.clone(),
        Some(TaskResult::Error { error }) => {
            format!("No cultural analysis is available for {country} ({error}).")
        }
        None => format!("No cultural analysis is available for {country}."),
    };
    Ok(format!(
        "Generate a comprehensive brand strategy for the {country} market.\n\
         The strategy should include a core message, positioning statement, marketing \
         channels, and key themes.\n\
         \n\
         Brand Information:\n{brand}\n\
         \n\
         Cultural Analysis:\n{cultural}\n",
        brand = render(descriptor)?,
    ))
}

fn persona_prompt(country: &str, profile: Option<&CulturalProfile>) -> Result<String, StageError> {
    let profile = match profile {
        Some(profile) => render(profile)?,
        None => "{}".to_string(),
    };
    Ok(format!(
        "Create a brand persona for {country} based on the following cultural profile.\n\
         The persona should include a name, age, profession, hobbies, and a short bio\n\
         that reflects the cultural nuances of the region.\n\
         \n\
         Cultural Profile:\n{profile}\n"
    ))
}

fn competitive_prompt(brand_name: &str, competitors: &[String], country: &str) -> String {
    let landscape = if competitors.is_empty() {
        "No competitors were named; identify the most likely local and international rivals."
            .to_string()
    } else {
        format!("The main competitors are: {}.", competitors.join(", "))
    };
    format!(
        "Analyze the competitive landscape for '{brand_name}' in {country}.\n\
         {landscape}\n\
         Provide a summary of each competitor's strengths and weaknesses, and suggest a \
         strategy for '{brand_name}' to differentiate itself.\n"
    )
}

fn comparison_prompt(profiles: &str) -> String {
    format!(
        "Compare the following country profiles and highlight the key similarities and \
         differences.\n\
         Based on the comparison, provide a market opportunity ranking.\n\
         \n\
         Profiles:\n{profiles}\n"
    )
}

#[cfg(test)]
#[path = "artifacts_test.rs"]
mod tests;
