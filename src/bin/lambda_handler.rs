//! AWS Lambda handler for running margin projections
//!
//! Accepts scenario parameters as JSON and returns the projected series,
//! the margin-call month, and the display values (loan amount, monthly
//! interest payment).
//!
//! Supports Lambda Function URLs for direct HTTP access.

use aws_lambda_events::event::lambda_function_urls::{
    LambdaFunctionUrlRequest, LambdaFunctionUrlResponse,
};
use aws_lambda_events::http::{HeaderMap, HeaderValue};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use margin_system::{
    InterestFunding, MonthRow, Position, ProjectionConfig, ProjectionEngine, ZeroTotalPolicy,
};
use margin_system::projection::ProjectionSummary;
use serde::{Deserialize, Serialize};

/// Input parameters for one recompute
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    /// Starting equity (default: 100,000)
    #[serde(default = "default_equity")]
    pub starting_equity: f64,

    /// Target margin ratio: loan / (loan + equity) (default: 0)
    #[serde(default)]
    pub margin_ratio: f64,

    /// Compound annual growth rate (default: 5%)
    #[serde(default = "default_growth_rate")]
    pub annual_growth_rate: f64,

    /// Annual simple-interest rate on the loan (default: 12%)
    #[serde(default = "default_interest_rate")]
    pub annual_interest_rate: f64,

    /// Minimum allowed equity fraction (default: 30%)
    #[serde(default = "default_maintenance")]
    pub maintenance_requirement: f64,

    /// Number of months to project (default: 12)
    #[serde(default = "default_projection_months")]
    pub projection_months: u32,

    /// Pay interest from outside income instead of selling equity
    #[serde(default)]
    pub pay_interest_with_wages: bool,
}

fn default_equity() -> f64 {
    100_000.0
}
fn default_growth_rate() -> f64 {
    0.05
}
fn default_interest_rate() -> f64 {
    0.12
}
fn default_maintenance() -> f64 {
    0.3
}
fn default_projection_months() -> u32 {
    12
}

/// Output from the projection
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub loan_amount: f64,
    pub monthly_interest_payment: f64,
    pub margin_call_month: Option<u32>,
    pub summary: ProjectionSummary,
    pub rows: Vec<MonthRow>,
    pub execution_time_ms: u64,
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type"),
    );
    headers
}

fn response(status_code: i64, body: Option<String>) -> LambdaFunctionUrlResponse {
    LambdaFunctionUrlResponse {
        status_code,
        headers: cors_headers(),
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    }
}

fn error_response(status_code: i64, message: &str) -> LambdaFunctionUrlResponse {
    response(
        status_code,
        Some(format!(r#"{{"error":"{}"}}"#, message.replace('"', "'"))),
    )
}

/// Lambda handler function
async fn handler(
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.payload.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(response(200, None));
    }

    // Parse request body
    let body = event.payload.body.unwrap_or_else(|| "{}".to_string());
    let request: ProjectionRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    let funding = if request.pay_interest_with_wages {
        InterestFunding::FromWages
    } else {
        InterestFunding::FromEquity
    };

    let position = match Position::new(
        request.starting_equity,
        request.margin_ratio,
        request.annual_interest_rate,
        request.maintenance_requirement,
        funding,
    ) {
        Ok(p) => p,
        Err(e) => {
            return Ok(error_response(422, &e.to_string()));
        }
    };

    let config = ProjectionConfig {
        projection_months: request.projection_months,
        annual_growth_rate: request.annual_growth_rate,
        on_zero_total: ZeroTotalPolicy::ImmediateCall,
    };

    let engine = ProjectionEngine::new(config);
    let result = match engine.project(&position) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(422, &e.to_string()));
        }
    };

    let response_body = ProjectionResponse {
        loan_amount: result.loan_amount,
        monthly_interest_payment: result.monthly_interest_payment,
        margin_call_month: result.margin_call_month,
        summary: result.summary(),
        rows: result.rows,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    Ok(response(200, Some(serde_json::to_string(&response_body)?)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
