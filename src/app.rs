#![cfg(feature = "web")]
use axum::{
    Form, Json, Router,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Local;
use handlebars::{Handlebars, handlebars_helper};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::advisor::Advisor;
use crate::config::Config;
use crate::downloader;
use crate::error::{AppError, AppResult};
use crate::forecast::{Midpoint, build_record};
use crate::graph::{self, GraphOptions};
use crate::record::{ALLOWED_MONTHS, MAX_YEARS, SalesForm, SalesRecord, Season};
use crate::saving::RecordFile;
use crate::seasonal::{InvestmentCompany, ProductCategory};
use crate::session::SessionStore;

const TEMPLATES: [(&str, &str); 5] = [
    ("index", include_str!("./templates/index.hbs")),
    ("sales", include_str!("./templates/sales.hbs")),
    ("results", include_str!("./templates/results.hbs")),
    ("improvement", include_str!("./templates/improvement.hbs")),
    ("placeholder", include_str!("./templates/placeholder.hbs")),
];

handlebars_helper!(money: |v: f64| format!("{:.2}", v));
handlebars_helper!(percent: |v: f64| format!("{:.0}", v * 100.0));

/// Shared state handed to every handler
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub records: RecordFile,
    advisor: Advisor,
    templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let mut templates = Handlebars::new();
        templates.register_helper("money", Box::new(money));
        templates.register_helper("percent", Box::new(percent));
        templates.register_partial("layout", include_str!("./templates/layout.hbs"))?;
        for (name, source) in TEMPLATES {
            templates.register_template_string(name, source)?;
        }

        Ok(Arc::new(AppState {
            sessions: SessionStore::new(config.session_ttl),
            records: RecordFile::new(&config.data_file),
            advisor: Advisor::new(&config)?,
            templates,
            config,
        }))
    }

    fn render(&self, name: &str, mut data: Value) -> AppResult<Html<String>> {
        if let Value::Object(map) = &mut data {
            map.insert("site_name".into(), json!(self.config.site_name));
        }
        Ok(Html(self.templates.render(name, &data)?))
    }

    /// Forecast a validated submission, with or without random jitter
    fn forecast(&self, form: &SalesForm) -> AppResult<SalesRecord> {
        let input = form.validate()?;
        let today = Local::now().date_naive();
        let record = if self.config.jitter {
            build_record(input, today, &mut StdRng::from_entropy())
        } else {
            build_record(input, today, &mut Midpoint)
        };
        Ok(record)
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(serve_home))
        .route("/sales", get(serve_sales_form).post(submit_sales))
        .route("/predict-future-sales", get(serve_sales_form).post(submit_sales))
        .route("/sales/chart.png", get(forecast_chart))
        .route("/download-sales-data", get(download_sales_data))
        .route("/download-sales-data.csv", get(download_csv))
        .route("/download-sales-data.xlsx", get(download_xlsx))
        .route("/update-sales-data", post(update_sales_data))
        .route("/improvement", get(serve_improvement))
        .route("/business-improvement-guide", get(serve_improvement))
        .route("/improvement/chart.png", get(improvement_chart))
        .route("/api/sales-record", get(get_sales_record))
        .route("/finance", get(serve_finance))
        .route("/operations", get(serve_operations))
        .route("/customers", get(serve_customers))
        .route("/hr", get(serve_hr))
        .route("/version", get(version))
        .route("/health", get(health))
        .nest_service("/static", static_dir)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.bind_addr();
    let state = AppState::new(config)?;

    if !state.advisor.has_token() {
        log::info!("HF_API_TOKEN not set; improvement guide will use canned suggestions");
    }

    let app = router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_millis()
    );
    response
}

async fn serve_home(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    state.render("index", json!({ "title": "Home" }))
}

async fn serve_sales_form(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let seasons = [
        Season::AllSeasons,
        Season::Spring,
        Season::Summer,
        Season::Fall,
        Season::Winter,
    ];
    state.render(
        "sales",
        json!({
            "title": "Predict Future Sales",
            "categories": ProductCategory::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            "companies": InvestmentCompany::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            "seasons": seasons.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            "months": ALLOWED_MONTHS,
            "max_years": MAX_YEARS,
        }),
    )
}

async fn submit_sales(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SalesForm>,
) -> AppResult<(CookieJar, Html<String>)> {
    let record = state.forecast(&form)?;

    state.records.save(&record)?;
    let (jar, session_id) = state.sessions.ensure(jar);
    state.sessions.store_record(&session_id, record.clone());

    log::info!(
        "forecast for {:?}: baseline {:.2}, predicted {:.2}, {} months",
        record.input.product,
        record.baseline_sales,
        record.predicted_sales,
        record.forecast.len()
    );

    let page = state.render(
        "results",
        json!({ "title": "Forecast", "record": record }),
    )?;
    Ok((jar, page))
}

async fn download_sales_data(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let name = state.records.download_name();
    match state.records.read_bytes()? {
        Some(bytes) => Ok((
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", name),
                ),
            ],
            bytes,
        )
            .into_response()),
        None => Err(AppError::NotFound(format!("{} not found", name))),
    }
}

fn session_record(state: &AppState, jar: &CookieJar) -> AppResult<SalesRecord> {
    state
        .sessions
        .record(jar)
        .ok_or_else(|| AppError::NotFound("No forecast in this session. Submit the sales form first.".into()))
}

async fn download_csv(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    let record = session_record(&state, &jar)?;
    let csv = downloader::to_csv(&record.forecast);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"sales_data.csv\""),
        ],
        csv,
    )
        .into_response())
}

async fn download_xlsx(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    let record = session_record(&state, &jar)?;
    let bytes = downloader::to_xlsx(&record.forecast).map_err(|e| AppError::Export(e.to_string()))?;
    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"sales_data.xlsx\""),
        ],
        bytes,
    )
        .into_response())
}

async fn forecast_chart(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    let record = session_record(&state, &jar)?;
    let png = graph::forecast_chart(&record.forecast, &GraphOptions::default())
        .map_err(|e| AppError::Export(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

async fn improvement_chart(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    let record = session_record(&state, &jar)?;
    let options = GraphOptions {
        title: "Comparison ($)".to_string(),
        x_label: String::new(),
        y_label: "Amount ($)".to_string(),
        ..GraphOptions::default()
    };
    let png = graph::comparison_chart(&record, &options).map_err(|e| AppError::Export(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// Overwrite the shared file with an edited copy of the chart data
async fn update_sales_data(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> AppResult<StatusCode> {
    if !body.is_object() {
        return Err(AppError::BadRequest("Expected a JSON object".into()));
    }
    state.records.save(&body)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn serve_improvement(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    let Some(record) = state.sessions.record(&jar) else {
        return Ok(Redirect::to("/sales").into_response());
    };

    let feedback = state.advisor.feedback(&record).await;

    let page = state.render(
        "improvement",
        json!({
            "title": "Business Improvement Guide",
            "record": record,
            "feedback": feedback,
        }),
    )?;
    Ok(page.into_response())
}

async fn get_sales_record(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> AppResult<Json<SalesRecord>> {
    session_record(&state, &jar).map(Json)
}

fn placeholder(state: &AppState, title: &str, blurb: &str) -> AppResult<Html<String>> {
    state.render("placeholder", json!({ "title": title, "blurb": blurb }))
}

async fn serve_finance(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    placeholder(&state, "Finance", "Budgets, cash flow and profitability reports will live here.")
}

async fn serve_operations(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    placeholder(&state, "Operations", "Inventory, supply chain and fulfilment planning will live here.")
}

async fn serve_customers(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    placeholder(&state, "Customers", "Customer segments, retention and feedback will live here.")
}

async fn serve_hr(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    placeholder(&state, "HR", "Hiring plans and team capacity will live here.")
}

async fn version() -> String {
    format!("{} version: {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
