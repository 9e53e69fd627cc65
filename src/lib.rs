/*!
# Sales Forecast

A small business web application that projects future sales for a product
from a handful of form inputs, built in Rust.

## Overview

Visitors fill in a sales form (product, baseline figures, marketing budget,
launch season, forecast horizon). The server validates the submission,
projects a month-by-month forecast, stores the result in the visitor's
session and overwrites a shared JSON file that can be downloaded. A
business improvement guide turns the stored record into suggestions, either
generated by a hosted text-generation model or derived from simple rules.

## Architecture

### Frontend Layer
- **Technologies**: HTML, CSS, Handlebars templates rendered server-side
- **Key Components**:
  - Sales form and results page with a forecast chart
  - Improvement guide with a comparison chart
  - Placeholder pages for finance, operations, customers and HR

### Backend Layer
- **Technologies**: Rust, axum, tokio
- **Core Components**:
  - Form validation - Month offsets limited to 0, 3, 6 or 9
  - Forecast engine - Seasonal, marketing and market-investment boosts
  - Session store - Latest record per visitor, keyed by cookie
  - Advisor - Text-generation client with a rule-based fallback

### Data Persistence Layer
- One shared JSON file, replaced atomically on every write
- CSV and XLSX export of the session's forecast
- PNG charts rendered with plotters

## Modules

- **record**: Form fields, validation and the stored sales record
- **seasonal**: Product categories, seasonal boosts and investment partners
- **forecast**: Horizon arithmetic and the monthly projection
- **saving**: Shared sales data file
- **downloader**: CSV and XLSX export
- **graph**: Forecast and comparison charts
- **config**: Environment settings
- **session**: Cookie-keyed session storage
- **advisor**: Improvement feedback
- **error**: HTTP error mapping
- **app**: Routing and middleware

## REST API Endpoints

- `/sales` - Sales form (GET) and forecast submission (POST)
- `/download-sales-data` - Latest shared record as JSON
- `/download-sales-data.csv`, `/download-sales-data.xlsx` - Session forecast export
- `/update-sales-data` - Replace the shared record with edited chart data
- `/improvement` - Business improvement guide
- `/api/sales-record` - Session record as JSON
- `/version`, `/health` - Service metadata and liveness
*/

pub mod config;
pub mod downloader;
pub mod forecast;
pub mod record;
pub mod saving;
pub mod seasonal;

#[cfg(feature = "web")]
pub mod advisor;
#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod error;
#[cfg(feature = "web")]
pub mod graph;
#[cfg(feature = "web")]
pub mod session;

pub use forecast::{ForecastPoint, Midpoint, Sampler, build_record};
pub use record::{SalesForm, SalesInput, SalesRecord, ValidationError};
