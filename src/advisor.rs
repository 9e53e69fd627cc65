#![cfg(feature = "web")]
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;
use crate::record::{MarketingTimeframe, ProductType, SalesRecord, Season};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("text generation api returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("no api token configured")]
    MissingToken,
}

/// Where the improvement feedback came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    Generated,
    Canned,
}

/// Text shown on the improvement guide
#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub source: FeedbackSource,
    pub text: String,
    pub suggestions: Vec<String>,
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
}

/// Client for the hosted text-generation model
#[derive(Clone)]
pub struct Advisor {
    http: reqwest::Client,
    token: Option<String>,
    endpoint: String,
}

impl Advisor {
    pub fn new(config: &Config) -> Result<Self, AdvisorError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sales-forecast/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Advisor {
            http,
            token: config.hf_api_token.clone(),
            endpoint: format!("{}/models/{}", config.hf_api_url, config.hf_model),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Ask the model for free-form feedback on a prompt
    pub async fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let token = self.token.as_deref().ok_or(AdvisorError::MissingToken)?;

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&GenerationRequest { inputs: prompt })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AdvisorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = resp.json().await?;
        Ok(extract_generated_text(&value))
    }

    /// Feedback for a record: generated when possible, canned otherwise
    pub async fn feedback(&self, record: &SalesRecord) -> Feedback {
        let suggestions = canned_suggestions(record);

        if self.has_token() {
            match self.generate(&build_prompt(record)).await {
                Ok(text) => {
                    return Feedback {
                        source: FeedbackSource::Generated,
                        text,
                        suggestions,
                    };
                }
                Err(e) => log::warn!("text generation failed, using canned suggestions: {}", e),
            }
        }

        Feedback {
            source: FeedbackSource::Canned,
            text: suggestions.join(" "),
            suggestions,
        }
    }
}

/// Prompt sent to the text-generation model
pub fn build_prompt(record: &SalesRecord) -> String {
    let data = serde_json::to_string(record).unwrap_or_default();
    format!(
        "Sales data: {}. Provide improvement suggestions in a professional tone.",
        data
    )
}

/// Pull `generated_text` out of a `[{"generated_text": ...}]` response
///
/// Any other shape is returned as its JSON text.
pub fn extract_generated_text(value: &Value) -> String {
    value
        .as_array()
        .and_then(|items| items.first())
        .and_then(|first| first.get("generated_text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

/// Rule-based suggestions derived from the record
pub fn canned_suggestions(record: &SalesRecord) -> Vec<String> {
    let input = &record.input;
    let mut suggestions = Vec::new();

    if input.marketing_budget <= 0.0 {
        suggestions.push(
            "Allocate a marketing budget; even a modest monthly spend lifts the projected sales curve."
                .to_string(),
        );
    } else if input.marketing_timeframe == MarketingTimeframe::Years && input.year == 0 {
        suggestions.push(
            "Your marketing budget is set per year but the forecast spans less than a year; confirm the timeframe."
                .to_string(),
        );
    }

    if input.season == Season::AllSeasons {
        suggestions.push(
            "Pick a launch season to take advantage of seasonal demand for your product category."
                .to_string(),
        );
    } else if record.seasonal_boost <= 0.0 {
        suggestions.push(format!(
            "{} shows no seasonal lift for this product; consider a different launch window or category.",
            capitalize(input.season.as_str())
        ));
    }

    if input.product_category.is_none() && record.seasonal_boost <= 0.0 {
        suggestions.push(
            "Choose a product category so seasonal boosts can be applied to the forecast.".to_string(),
        );
    }

    match input.product_type {
        ProductType::New if input.volume == 0 || input.price <= 0.0 => suggestions.push(
            "Enter an expected volume and price so the forecast has a starting point.".to_string(),
        ),
        ProductType::Old if input.previous_sales <= 0.0 => suggestions.push(
            "Enter previous sales so the forecast has a starting point.".to_string(),
        ),
        _ => {}
    }

    if input.investment_company.is_none() {
        suggestions.push(
            "Compare scenarios with a market investment partner to see the upside on projected sales."
                .to_string(),
        );
    }

    if record.marketing_sales > record.baseline_sales {
        suggestions.push(format!(
            "Track results monthly against the projected {:.2} to catch shortfalls early.",
            record.marketing_sales
        ));
    } else {
        suggestions.push(
            "Projected sales do not exceed current sales; review pricing and distribution before launch."
                .to_string(),
        );
    }

    suggestions
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
