use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::record::{MarketingTimeframe, SalesInput, SalesRecord};
use crate::seasonal::seasonal_boost_for;

/// Months projected when the horizon would otherwise be empty
const FALLBACK_MONTHS: u32 = 6;

/// Flat growth factor used for the headline prediction
const BASE_GROWTH: f64 = 1.1;

/// Extra growth per unit of marketing budget
const BUDGET_GROWTH: f64 = 0.001;

/// One projected month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Month label, e.g. "Oct 2026"
    pub label: String,
    /// Sales after fluctuation and seasonal boost
    pub predicted: f64,
    /// Sales after marketing spend and market investment boosts
    pub marketing: f64,
}

/// Source of values inside a range
pub trait Sampler {
    fn between(&mut self, min: f64, max: f64) -> f64;
}

/// Jitter-free sampler: always the middle of the range
#[derive(Debug, Clone, Copy, Default)]
pub struct Midpoint;

impl Sampler for Midpoint {
    fn between(&mut self, min: f64, max: f64) -> f64 {
        (min + max) / 2.0
    }
}

impl<R: Rng> Sampler for R {
    fn between(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.gen_range(min..max)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Days between today and the projected launch
pub fn horizon_days(input: &SalesInput) -> u32 {
    input.month * 30 + input.year * 365 + input.season.offset_days()
}

/// Number of monthly points to project
pub fn months_ahead(input: &SalesInput) -> u32 {
    let months = if input.month == 0 {
        input.year * 12
    } else {
        horizon_days(input).div_ceil(30)
    };
    if months == 0 { FALLBACK_MONTHS } else { months }
}

/// Headline prediction shown on the improvement guide
pub fn predicted_sales(input: &SalesInput) -> f64 {
    round2(input.baseline_sales() * (BASE_GROWTH + input.marketing_budget * BUDGET_GROWTH))
}

/// First day of the month `offset` months after `date`, formatted "Mon YYYY"
fn month_label(date: NaiveDate, offset: u32) -> String {
    let index = date.month0() + offset;
    let year = date.year() + (index / 12) as i32;
    let month = index % 12 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_default()
}

fn marketing_boost(input: &SalesInput, sampler: &mut impl Sampler) -> f64 {
    if input.marketing_budget <= 0.0 {
        return 0.0;
    }
    let monthly_budget = match input.marketing_timeframe {
        MarketingTimeframe::Months => input.marketing_budget,
        MarketingTimeframe::Years => input.marketing_budget / f64::from((input.year * 12).max(1)),
    };
    monthly_budget * sampler.between(0.01, 0.06)
}

/// Project monthly sales for a validated input
pub fn project(input: &SalesInput, today: NaiveDate, sampler: &mut impl Sampler) -> Vec<ForecastPoint> {
    let boost = seasonal_boost_for(input.product_category, &input.product, input.season);
    let mut running = input.baseline_sales();

    (0..months_ahead(input))
        .map(|i| {
            running *= sampler.between(0.95, 1.15);
            let after_seasonal = running * (1.0 + boost);

            let market = match input.investment_company {
                Some(company) => {
                    let (min, max) = company.deviation();
                    after_seasonal * sampler.between(min, max)
                }
                None => 0.0,
            };
            let marketing = after_seasonal + marketing_boost(input, sampler) + market;

            ForecastPoint {
                label: month_label(today, i),
                predicted: round2(after_seasonal),
                marketing: round2(marketing),
            }
        })
        .collect()
}

/// Build the full session record for a submission
pub fn build_record(input: SalesInput, today: NaiveDate, sampler: &mut impl Sampler) -> SalesRecord {
    let forecast = project(&input, today, sampler);
    let baseline_sales = input.baseline_sales();

    SalesRecord {
        baseline_sales,
        predicted_sales: predicted_sales(&input),
        marketing_sales: forecast
            .last()
            .map(|p| p.marketing)
            .unwrap_or(round2(baseline_sales)),
        seasonal_boost: seasonal_boost_for(input.product_category, &input.product, input.season),
        launch_date: today + Duration::days(i64::from(horizon_days(&input))),
        forecast,
        input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ProductType, SalesForm, Season};
    use crate::seasonal::{InvestmentCompany, ProductCategory};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn input() -> SalesInput {
        SalesForm {
            product: Some("Widget".to_string()),
            previous_sales: Some("1000".to_string()),
            month: Some("3".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 15).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.011
    }

    #[test]
    fn horizon_adds_season_offset() {
        let mut i = input();
        i.season = Season::Winter;
        i.year = 1;
        assert_eq!(horizon_days(&i), 3 * 30 + 365 + 25);
        assert_eq!(months_ahead(&i), 16);
    }

    #[test]
    fn month_zero_uses_years() {
        let mut i = input();
        i.month = 0;
        i.year = 2;
        assert_eq!(months_ahead(&i), 24);

        i.year = 0;
        assert_eq!(months_ahead(&i), FALLBACK_MONTHS);
    }

    #[test]
    fn headline_prediction_includes_budget() {
        let mut i = input();
        assert!(close(predicted_sales(&i), 1100.0));
        i.marketing_budget = 100.0;
        assert!(close(predicted_sales(&i), 1200.0));
    }

    #[test]
    fn midpoint_projection_is_deterministic() {
        let points = project(&input(), today(), &mut Midpoint);
        assert_eq!(points.len(), 3);
        assert!(close(points[0].predicted, 1050.0));
        assert!(close(points[1].predicted, 1102.5));
        assert!(close(points[2].predicted, 1157.63));
        assert!(points.iter().all(|p| p.predicted == p.marketing));
    }

    #[test]
    fn labels_roll_over_the_year() {
        let points = project(&input(), today(), &mut Midpoint);
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Nov 2026", "Dec 2026", "Jan 2027"]);
    }

    #[test]
    fn seasonal_and_market_boosts_apply() {
        let mut i = input();
        i.product_category = Some(ProductCategory::Toys);
        i.season = Season::Winter;
        i.investment_company = Some(InvestmentCompany::Apple);

        let points = project(&i, today(), &mut Midpoint);
        // 1000 * 1.05 * 1.25, then + 6% market investment
        assert!(close(points[0].predicted, 1312.5));
        assert!(close(points[0].marketing, 1312.5 * 1.06));
    }

    #[test]
    fn yearly_budget_is_spread_over_months() {
        let mut i = input();
        i.marketing_budget = 1200.0;
        i.marketing_timeframe = MarketingTimeframe::Years;
        i.year = 1;
        i.month = 0;

        let points = project(&i, today(), &mut Midpoint);
        assert_eq!(points.len(), 12);
        // 1200 / 12 months * 3.5% effect
        assert!(close(points[0].marketing - points[0].predicted, 3.5));
    }

    #[test]
    fn random_jitter_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = project(&input(), today(), &mut rng);
        assert!(points[0].predicted >= 950.0 - 0.01);
        assert!(points[0].predicted <= 1150.0 + 0.01);
    }

    #[test]
    fn record_carries_launch_date_and_new_product_baseline() {
        let mut i = input();
        i.product_type = ProductType::New;
        i.volume = 10;
        i.price = 5.0;

        let record = build_record(i, today(), &mut Midpoint);
        assert_eq!(record.baseline_sales, 50.0);
        assert_eq!(record.launch_date, NaiveDate::from_ymd_opt(2027, 2, 13).unwrap());
        assert_eq!(record.marketing_sales, record.forecast.last().unwrap().marketing);
    }
}
