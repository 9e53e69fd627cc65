use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::record::Season;

/// Product categories with a default seasonal sales boost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Cars,
    Toys,
    Clothing,
    Electronics,
    Food,
    Retail,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 6] = [
        ProductCategory::Cars,
        ProductCategory::Toys,
        ProductCategory::Clothing,
        ProductCategory::Electronics,
        ProductCategory::Food,
        ProductCategory::Retail,
    ];

    pub fn from_strng(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cars" => Some(ProductCategory::Cars),
            "toys" => Some(ProductCategory::Toys),
            "clothing" => Some(ProductCategory::Clothing),
            "electronics" => Some(ProductCategory::Electronics),
            "food" => Some(ProductCategory::Food),
            "retail" => Some(ProductCategory::Retail),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Cars => "cars",
            ProductCategory::Toys => "toys",
            ProductCategory::Clothing => "clothing",
            ProductCategory::Electronics => "electronics",
            ProductCategory::Food => "food",
            ProductCategory::Retail => "retail",
        }
    }

    /// Default seasonal boost as a fraction (0.12 == 12%)
    ///
    /// Seasons missing from a category's table, and `AllSeasons`, yield 0.
    pub fn seasonal_boost(&self, season: Season) -> f64 {
        use ProductCategory::*;
        use Season::*;

        match (self, season) {
            (Cars, Summer) => 0.12,
            (Cars, Winter) => 0.08,
            (Cars, Spring) => 0.03,
            (Cars, Fall) => 0.02,
            (Toys, Summer) => 0.15,
            (Toys, Winter) => 0.25,
            (Toys, Fall) => 0.10,
            (Toys, Spring) => 0.05,
            (Clothing, Spring) => 0.10,
            (Clothing, Fall) => 0.15,
            (Clothing, Winter) => 0.10,
            (Clothing, Summer) => 0.02,
            (Electronics, Winter) => 0.20,
            (Electronics, Summer) => 0.08,
            (Electronics, Fall) => 0.05,
            (Food, Summer) => 0.10,
            (Food, Winter) => 0.15,
            (Food, Fall) => 0.02,
            (Retail, Winter) => 0.10,
            (Retail, Fall) => 0.05,
            _ => 0.0,
        }
    }
}

lazy_static! {
    // Retail has no keyword list; it is only reachable by explicit selection.
    static ref CATEGORY_KEYWORDS: Vec<(ProductCategory, Regex)> = vec![
        (
            ProductCategory::Cars,
            Regex::new(r"\b(car|truck|vehicle|sedan|coupe|convertible)\b").unwrap()
        ),
        (
            ProductCategory::Toys,
            Regex::new(r"\b(toy|lego|action figure|doll|playset|puzzle)\b").unwrap()
        ),
        (
            ProductCategory::Clothing,
            Regex::new(r"\b(shirt|jeans|jacket|dress|skirt|clothing|apparel)\b").unwrap()
        ),
        (
            ProductCategory::Electronics,
            Regex::new(r"\b(phone|laptop|tv|camera|tablet|earbuds|console|electronics)\b").unwrap()
        ),
        (
            ProductCategory::Food,
            Regex::new(r"\b(food|snack|beverage|drink|grocery|restaurant)\b").unwrap()
        ),
    ];
}

/// Guess a product category from keywords in the product name
///
/// Matching is case-insensitive and on whole words, checked in table order,
/// so "toy car" resolves to `Cars`.
pub fn infer_category(product_name: &str) -> Option<ProductCategory> {
    if product_name.trim().is_empty() {
        return None;
    }
    let name = product_name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, re)| re.is_match(&name))
        .map(|(category, _)| *category)
}

/// Seasonal boost for a record: explicit category first, then one inferred
/// from the product name when the explicit category has no boost this season.
pub fn seasonal_boost_for(
    category: Option<ProductCategory>,
    product_name: &str,
    season: Season,
) -> f64 {
    let explicit = category.map(|c| c.seasonal_boost(season)).unwrap_or(0.0);
    if explicit != 0.0 {
        return explicit;
    }
    infer_category(product_name)
        .map(|c| c.seasonal_boost(season))
        .unwrap_or(0.0)
}

/// Companies whose observed market deviation drives the investment boost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentCompany {
    Amazon,
    Apple,
    Google,
    Nvidia,
    Broadcom,
}

impl InvestmentCompany {
    pub const ALL: [InvestmentCompany; 5] = [
        InvestmentCompany::Amazon,
        InvestmentCompany::Apple,
        InvestmentCompany::Google,
        InvestmentCompany::Nvidia,
        InvestmentCompany::Broadcom,
    ];

    pub fn from_strng(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "amazon" => Some(InvestmentCompany::Amazon),
            "apple" => Some(InvestmentCompany::Apple),
            "google" => Some(InvestmentCompany::Google),
            "nvidia" => Some(InvestmentCompany::Nvidia),
            "broadcom" => Some(InvestmentCompany::Broadcom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentCompany::Amazon => "amazon",
            InvestmentCompany::Apple => "apple",
            InvestmentCompany::Google => "google",
            InvestmentCompany::Nvidia => "nvidia",
            InvestmentCompany::Broadcom => "broadcom",
        }
    }

    /// (min, max) fraction of monthly sales added by the investment
    pub fn deviation(&self) -> (f64, f64) {
        match self {
            InvestmentCompany::Amazon => (0.09, 0.15),
            InvestmentCompany::Apple => (0.05, 0.07),
            InvestmentCompany::Google => (0.09, 0.10),
            InvestmentCompany::Nvidia => (0.50, 0.60),
            InvestmentCompany::Broadcom => (0.25, 0.30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_category_from_keywords() {
        assert_eq!(infer_category("Red Sedan 2000"), Some(ProductCategory::Cars));
        assert_eq!(infer_category("LEGO castle"), Some(ProductCategory::Toys));
        assert_eq!(infer_category("denim jacket"), Some(ProductCategory::Clothing));
        assert_eq!(infer_category("Gaming Laptop"), Some(ProductCategory::Electronics));
        assert_eq!(infer_category("energy drink"), Some(ProductCategory::Food));
    }

    #[test]
    fn inference_needs_whole_words() {
        assert_eq!(infer_category("carpet"), None);
        assert_eq!(infer_category(""), None);
        assert_eq!(infer_category("stapler"), None);
    }

    #[test]
    fn explicit_category_wins_over_inference() {
        let boost = seasonal_boost_for(Some(ProductCategory::Retail), "toy truck", Season::Winter);
        assert_eq!(boost, 0.10);

        let inferred = seasonal_boost_for(None, "toy truck", Season::Winter);
        assert_eq!(inferred, 0.08);
    }

    #[test]
    fn zero_explicit_boost_falls_back_to_inference() {
        let boost = seasonal_boost_for(Some(ProductCategory::Electronics), "toy", Season::Spring);
        assert_eq!(boost, 0.05);

        let none = seasonal_boost_for(Some(ProductCategory::Electronics), "widget", Season::Spring);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn missing_seasons_have_no_boost() {
        assert_eq!(ProductCategory::Electronics.seasonal_boost(Season::Spring), 0.0);
        assert_eq!(ProductCategory::Toys.seasonal_boost(Season::AllSeasons), 0.0);
        assert_eq!(seasonal_boost_for(None, "widget", Season::Summer), 0.0);
    }

    #[test]
    fn parses_company_names_case_insensitively() {
        assert_eq!(InvestmentCompany::from_strng(" NVIDIA "), Some(InvestmentCompany::Nvidia));
        assert_eq!(InvestmentCompany::from_strng("tesla"), None);
        for company in InvestmentCompany::ALL {
            let (min, max) = company.deviation();
            assert!(min <= max);
            assert_eq!(InvestmentCompany::from_strng(company.as_str()), Some(company));
        }
    }
}
