#![cfg(not(tarpaulin_include))]

use chrono::Local;
use forecast::downloader::to_csv;
use forecast::{Midpoint, SalesForm, build_record};
use rand::thread_rng;
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage: forecast-cli [--no-jitter] [--json] field=value ...

Fields: product, product_type, product_category, price, volume, previous_sales,
        marketing_budget, marketing_timeframe, season, investment_company,
        year, month";

fn apply(form: &mut SalesForm, key: &str, value: &str) -> Result<(), String> {
    let slot = match key {
        "product" => &mut form.product,
        "product_type" => &mut form.product_type,
        "product_category" => &mut form.product_category,
        "price" => &mut form.price,
        "volume" => &mut form.volume,
        "previous_sales" => &mut form.previous_sales,
        "marketing_budget" => &mut form.marketing_budget,
        "marketing_timeframe" => &mut form.marketing_timeframe,
        "season" => &mut form.season,
        "investment_company" => &mut form.investment_company,
        "year" => &mut form.year,
        "month" => &mut form.month,
        _ => return Err(format!("unknown field: {}", key)),
    };
    *slot = Some(value.to_string());
    Ok(())
}

fn main() -> ExitCode {
    let mut form = SalesForm::default();
    let mut jitter = true;
    let mut json = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--no-jitter" => jitter = false,
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return ExitCode::SUCCESS;
            }
            _ => {
                let Some((key, value)) = arg.split_once('=') else {
                    eprintln!("Error: expected field=value, got {:?}\n\n{}", arg, USAGE);
                    return ExitCode::from(2);
                };
                if let Err(e) = apply(&mut form, key.trim(), value) {
                    eprintln!("Error: {}\n\n{}", e, USAGE);
                    return ExitCode::from(2);
                }
            }
        }
    }

    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let today = Local::now().date_naive();
    let record = if jitter {
        build_record(input, today, &mut thread_rng())
    } else {
        build_record(input, today, &mut Midpoint)
    };

    if json {
        match serde_json::to_string_pretty(&record) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Baseline sales:  {:.2}", record.baseline_sales);
        println!("Predicted sales: {:.2}", record.predicted_sales);
        println!("Launch date:     {}", record.launch_date);
        println!();
        print!("{}", to_csv(&record.forecast));
    }

    ExitCode::SUCCESS
}
