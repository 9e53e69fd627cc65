use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forecast::ForecastPoint;
use crate::seasonal::{InvestmentCompany, ProductCategory};

/// Month offsets the form may submit
pub const ALLOWED_MONTHS: [u32; 4] = [0, 3, 6, 9];

/// Largest forecast horizon in years
pub const MAX_YEARS: u32 = 10;

/// Largest accepted amount or volume; keeps every projection finite
pub const MAX_AMOUNT: f64 = 1e12;

/// Whether the product already has a sales history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// Existing product; the baseline is its previous sales
    #[default]
    Old,
    /// New product; the baseline is volume times price
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    #[default]
    AllSeasons,
}

impl Season {
    pub fn from_strng(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "fall" | "autumn" => Some(Season::Fall),
            "winter" => Some(Season::Winter),
            "all_seasons" | "all" => Some(Season::AllSeasons),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
            Season::AllSeasons => "all_seasons",
        }
    }

    /// Extra days added to the launch horizon
    pub fn offset_days(&self) -> u32 {
        match self {
            Season::Spring => 15,
            Season::Summer => 10,
            Season::Fall => 20,
            Season::Winter => 25,
            Season::AllSeasons => 0,
        }
    }
}

/// Period the marketing budget is spread over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarketingTimeframe {
    #[default]
    Months,
    Years,
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid month selection. Only 0, 3, 6, or 9 months are allowed.")]
    InvalidMonth,

    #[error("{0} must be a number")]
    NotANumber(&'static str),

    #[error("{0} must be a whole number")]
    NotWhole(&'static str),

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("{0} is too large")]
    TooLarge(&'static str),

    #[error("year must be at most {}", MAX_YEARS)]
    YearOutOfRange,

    #[error("Unknown {field}: {value}")]
    UnknownChoice { field: &'static str, value: String },
}

/// Raw form submission
///
/// Every field is an optional string so that malformed numbers are reported
/// as validation errors instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesForm {
    pub product: Option<String>,
    pub product_type: Option<String>,
    pub product_category: Option<String>,
    pub price: Option<String>,
    pub volume: Option<String>,
    pub previous_sales: Option<String>,
    pub marketing_budget: Option<String>,
    pub marketing_timeframe: Option<String>,
    pub season: Option<String>,
    pub investment_company: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

/// Validated user input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesInput {
    pub product: String,
    pub product_type: ProductType,
    pub product_category: Option<ProductCategory>,
    pub price: f64,
    pub volume: u64,
    pub previous_sales: f64,
    pub marketing_budget: f64,
    pub marketing_timeframe: MarketingTimeframe,
    pub season: Season,
    pub investment_company: Option<InvestmentCompany>,
    pub year: u32,
    pub month: u32,
}

impl SalesInput {
    /// Current sales level the projection starts from
    pub fn baseline_sales(&self) -> f64 {
        match self.product_type {
            ProductType::Old => self.previous_sales,
            ProductType::New => self.volume as f64 * self.price,
        }
    }
}

/// The per-session record: submitted fields plus derived projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(flatten)]
    pub input: SalesInput,
    pub baseline_sales: f64,
    pub predicted_sales: f64,
    pub marketing_sales: f64,
    pub seasonal_boost: f64,
    pub launch_date: NaiveDate,
    pub forecast: Vec<ForecastPoint>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_amount(value: &Option<String>, field: &'static str) -> Result<f64, ValidationError> {
    let Some(raw) = non_blank(value) else {
        return Ok(0.0);
    };
    let amount: f64 = raw.parse().map_err(|_| ValidationError::NotANumber(field))?;
    if !amount.is_finite() {
        return Err(ValidationError::NotANumber(field));
    }
    if amount < 0.0 {
        return Err(ValidationError::Negative(field));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::TooLarge(field));
    }
    Ok(amount)
}

fn parse_whole(value: &Option<String>, field: &'static str) -> Result<u64, ValidationError> {
    let Some(raw) = non_blank(value) else {
        return Ok(0);
    };
    match raw.parse::<i64>() {
        Ok(n) if n < 0 => Err(ValidationError::Negative(field)),
        Ok(n) if n as f64 > MAX_AMOUNT => Err(ValidationError::TooLarge(field)),
        Ok(n) => Ok(n as u64),
        Err(_) if raw.parse::<f64>().is_ok() => Err(ValidationError::NotWhole(field)),
        Err(_) => Err(ValidationError::NotANumber(field)),
    }
}

fn parse_month(value: &Option<String>) -> Result<u32, ValidationError> {
    let Some(raw) = non_blank(value) else {
        return Ok(0);
    };
    let month: i64 = raw.parse().map_err(|_| ValidationError::InvalidMonth)?;
    ALLOWED_MONTHS
        .iter()
        .copied()
        .find(|m| i64::from(*m) == month)
        .ok_or(ValidationError::InvalidMonth)
}

fn parse_choice<T>(
    value: &Option<String>,
    field: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ValidationError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => parse(raw).map(Some).ok_or_else(|| ValidationError::UnknownChoice {
            field,
            value: raw.to_string(),
        }),
    }
}

impl SalesForm {
    /// Check every field and convert the submission into a `SalesInput`
    ///
    /// Blank numeric fields count as zero. The month check runs first so a
    /// bad month is reported even when other fields are also wrong.
    pub fn validate(&self) -> Result<SalesInput, ValidationError> {
        let month = parse_month(&self.month)?;

        let year = parse_whole(&self.year, "year")?;
        if year > u64::from(MAX_YEARS) {
            return Err(ValidationError::YearOutOfRange);
        }

        let product_type = parse_choice(&self.product_type, "product type", |v| {
            match v.to_ascii_lowercase().as_str() {
                "old" => Some(ProductType::Old),
                "new" => Some(ProductType::New),
                _ => None,
            }
        })?
        .unwrap_or_default();

        let marketing_timeframe = parse_choice(&self.marketing_timeframe, "marketing timeframe", |v| {
            match v.to_ascii_lowercase().as_str() {
                "months" => Some(MarketingTimeframe::Months),
                "years" => Some(MarketingTimeframe::Years),
                _ => None,
            }
        })?
        .unwrap_or_default();

        Ok(SalesInput {
            product: self.product.as_deref().unwrap_or_default().trim().to_string(),
            product_type,
            product_category: parse_choice(
                &self.product_category,
                "product category",
                ProductCategory::from_strng,
            )?,
            price: parse_amount(&self.price, "price")?,
            volume: parse_whole(&self.volume, "volume")?,
            previous_sales: parse_amount(&self.previous_sales, "previous sales")?,
            marketing_budget: parse_amount(&self.marketing_budget, "marketing budget")?,
            marketing_timeframe,
            season: parse_choice(&self.season, "season", Season::from_strng)?.unwrap_or_default(),
            investment_company: parse_choice(
                &self.investment_company,
                "investment company",
                InvestmentCompany::from_strng,
            )?,
            year: year as u32,
            month,
        })
    }
}
