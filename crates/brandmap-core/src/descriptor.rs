//! Brand map request intake: the raw request body and its validated form.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, ValidationErrors};

pub const MAX_BRAND_NAME_CHARS: usize = 200;
pub const MAX_COUNTRY_CHARS: usize = 100;
pub const MAX_LIST_ITEM_CHARS: usize = 100;
pub const MIN_TARGET_COUNTRIES: usize = 1;
pub const MAX_TARGET_COUNTRIES: usize = 5;

/// Raw request body as submitted by a client.
///
/// Every field is optional at this level so that a missing field is reported
/// as a validation error alongside every other problem, instead of failing
/// deserialization outright.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrandMapRequest {
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub brand_description: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
    #[serde(default)]
    pub target_countries: Option<Vec<String>>,
    #[serde(default)]
    pub brand_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub competitors: Option<Vec<String>>,
}

/// A validated brand map request.
///
/// Only obtainable through [`BrandMapRequest::validate`], and read-only
/// afterwards. Serializes as the `brand_info` echo of the brand map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandDescriptor {
    brand_name: String,
    brand_description: String,
    origin_country: String,
    target_countries: Vec<String>,
    brand_keywords: Vec<String>,
    competitors: Vec<String>,
}

impl BrandDescriptor {
    #[must_use]
    pub fn brand_name(&self) -> &str {
        &self.brand_name
    }

    #[must_use]
    pub fn brand_description(&self) -> &str {
        &self.brand_description
    }

    #[must_use]
    pub fn origin_country(&self) -> &str {
        &self.origin_country
    }

    /// Target countries in request order. Always 1 to 5 unique names.
    #[must_use]
    pub fn target_countries(&self) -> &[String] {
        &self.target_countries
    }

    #[must_use]
    pub fn brand_keywords(&self) -> &[String] {
        &self.brand_keywords
    }

    /// Named competitors; may be empty.
    #[must_use]
    pub fn competitors(&self) -> &[String] {
        &self.competitors
    }
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn required_text(
        &mut self,
        field: &str,
        value: Option<String>,
        max_chars: Option<usize>,
    ) -> String {
        let Some(value) = value else {
            self.push(field, "This field is required.");
            return String::new();
        };
        let value = value.trim().to_string();
        if value.is_empty() {
            self.push(field, "This field may not be blank.");
        } else if let Some(max) = max_chars {
            if value.chars().count() > max {
                self.push(field, format!("Ensure this field has no more than {max} characters."));
            }
        }
        value
    }

    fn list_items(&mut self, field: &str, values: Vec<String>, max_chars: usize) -> Vec<String> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let v = v.trim().to_string();
                if v.is_empty() {
                    self.push(format!("{field}[{i}]"), "This field may not be blank.");
                } else if v.chars().count() > max_chars {
                    self.push(
                        format!("{field}[{i}]"),
                        format!("Ensure this field has no more than {max_chars} characters."),
                    );
                }
                v
            })
            .collect()
    }
}

impl BrandMapRequest {
    /// Validate the request, collecting every field-level problem.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each offending field when any rule
    /// fails: missing or blank text, `brand_name` over 200 characters, country
    /// names over 100 characters, fewer than 1 or more than 5 (or duplicate)
    /// target countries, or an empty keyword list.
    pub fn validate(self) -> Result<BrandDescriptor, ValidationErrors> {
        let mut errors = Collector::default();

        let brand_name =
            errors.required_text("brand_name", self.brand_name, Some(MAX_BRAND_NAME_CHARS));
        let brand_description =
            errors.required_text("brand_description", self.brand_description, None);
        let origin_country =
            errors.required_text("origin_country", self.origin_country, Some(MAX_COUNTRY_CHARS));

        let target_countries = match self.target_countries {
            None => {
                errors.push("target_countries", "This field is required.");
                Vec::new()
            }
            Some(countries) => {
                let count = countries.len();
                if count < MIN_TARGET_COUNTRIES {
                    errors.push("target_countries", "At least one target country is required.");
                } else if count > MAX_TARGET_COUNTRIES {
                    errors.push(
                        "target_countries",
                        format!(
                            "Ensure this field has no more than {MAX_TARGET_COUNTRIES} elements."
                        ),
                    );
                }
                let countries = errors.list_items("target_countries", countries, MAX_COUNTRY_CHARS);
                let mut seen = HashSet::new();
                for country in &countries {
                    if !country.is_empty() && !seen.insert(country.to_lowercase()) {
                        errors.push(
                            "target_countries",
                            format!("Duplicate target country: '{country}'."),
                        );
                    }
                }
                countries
            }
        };

        let brand_keywords = match self.brand_keywords {
            None => {
                errors.push("brand_keywords", "This field is required.");
                Vec::new()
            }
            Some(keywords) if keywords.is_empty() => {
                errors.push("brand_keywords", "This list may not be empty.");
                Vec::new()
            }
            Some(keywords) => errors.list_items("brand_keywords", keywords, MAX_LIST_ITEM_CHARS),
        };

        let competitors = errors.list_items(
            "competitors",
            self.competitors.unwrap_or_default(),
            MAX_LIST_ITEM_CHARS,
        );

        if !errors.0.is_empty() {
            return Err(ValidationErrors(errors.0));
        }

        Ok(BrandDescriptor {
            brand_name,
            brand_description,
            origin_country,
            target_countries,
            brand_keywords,
            competitors,
        })
    }
}

#[cfg(test)]
#[path = "descriptor_test.rs"]
mod tests;
