//! Dashboard routes
//!
//! Handlers only read the shared `DashboardService`; query parameters are
//! parsed here so a malformed year becomes a 400 instead of a silent
//! "all years".

use std::sync::Arc;

use aforo_app::dashboard::{ColumnsView, DashboardService, ForecastView, QualityView, TableView, TotalsView};
use aforo_domain::forecast::MAX_HORIZON;
use aforo_domain::service::parse_year;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

type AppState = Arc<DashboardService>;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    year: Option<String>,
    horizon: Option<String>,
}

impl DashboardQuery {
    /// Absent or empty means all years
    fn year(&self) -> Result<Option<i32>, ApiError> {
        match self.year.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_year(raw)
                .map(Some)
                .map_err(|e| ApiError::bad_request(format!("year: {}", e))),
        }
    }

    fn horizon(&self) -> Result<Option<usize>, ApiError> {
        match self.horizon.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => {
                let horizon: usize = raw
                    .parse()
                    .map_err(|_| ApiError::bad_request(format!("horizon: not a month count: {:?}", raw)))?;
                if horizon > MAX_HORIZON {
                    return Err(ApiError::bad_request(format!(
                        "horizon: {} exceeds the maximum of {} months",
                        horizon, MAX_HORIZON
                    )));
                }
                Ok(Some(horizon))
            }
        }
    }
}

pub fn router(service: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/years", get(years))
        .route("/api/totals", get(totals))
        .route("/api/table", get(table))
        .route("/api/forecast", get(forecast))
        .route("/api/columns", get(columns))
        .route("/api/quality", get(quality))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn health(State(service): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "records": service.dataset().records().len(),
    }))
}

async fn years(State(service): State<AppState>) -> Json<Vec<i32>> {
    Json(service.years())
}

async fn totals(
    State(service): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<TotalsView>, ApiError> {
    Ok(Json(service.totals(query.year()?)))
}

async fn table(
    State(service): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<TableView>, ApiError> {
    Ok(Json(service.table(query.year()?)))
}

async fn forecast(
    State(service): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ForecastView>, ApiError> {
    Ok(Json(service.forecast(query.year()?, query.horizon()?)))
}

async fn columns(State(service): State<AppState>) -> Json<ColumnsView> {
    Json(service.columns())
}

async fn quality(State(service): State<AppState>) -> Json<QualityView> {
    Json(service.quality())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aforo_app::dataset::Dataset;
    use aforo_domain::model::Catalogue;
    use aforo_infra::csv_source::parse_table;
    use aforo_infra::forecast::LinearTrendForecaster;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    const SAMPLE: &str = "NOMBRE,AÑO,MES,AUTOS,MOTOS\n\
                          Toll-5,2023,DICIEMBRE,90,3\n\
                          Toll-5,2024,ENERO,100,4\n\
                          Toll-5,2024,FEBRERO,110,0\n\
                          Toll-5,2024,MARZO,120,6\n\
                          Toll-5,2024,13,1,1\n";

    fn app() -> Router {
        let table = parse_table(SAMPLE).unwrap();
        let dataset = Dataset::from_table(table, Catalogue::default()).unwrap();
        let service = DashboardService::new(Arc::new(dataset), Box::new(LinearTrendForecaster::default()), 12);
        router(Arc::new(service))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["records"], 7);
    }

    #[tokio::test]
    async fn test_years() {
        let (status, body) = get_json("/api/years").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([2023, 2024]));
    }

    #[tokio::test]
    async fn test_totals_for_year() {
        let (status, body) = get_json("/api/totals?year=2024").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["year"], 2024);
        assert_eq!(body["totals"][0], json!({"category": "Automobile", "total": 330.0}));
        assert_eq!(body["totals"][1], json!({"category": "Motorcycle", "total": 10.0}));
        assert_eq!(body["extremes"]["quietest"]["category"], "Motorcycle");
        assert_eq!(body["by_entity"], json!([{"entity_id": "Toll-5", "total": 340.0}]));
    }

    #[tokio::test]
    async fn test_totals_without_year_covers_all() {
        let (_, body) = get_json("/api/totals").await;
        assert_eq!(body["year"], Value::Null);
        assert_eq!(body["grand_total"], 433.0);
    }

    #[tokio::test]
    async fn test_bad_year_is_rejected() {
        let (status, body) = get_json("/api/totals?year=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("year:"));

        let (status, _) = get_json("/api/table?year=1800").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_table_rows_for_year() {
        let (status, body) = get_json("/api/table?year=2023").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["columns"], json!(["AÑO", "MES", "AUTOS", "MOTOS"]));
        assert_eq!(body["rows"], json!([["2023", "DICIEMBRE", "90", "3"]]));
    }

    #[tokio::test]
    async fn test_forecast_available() {
        let (status, body) = get_json("/api/forecast?horizon=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["horizon"], 2);
        assert_eq!(body["forecast"]["status"], "available");
        assert_eq!(body["forecast"]["points"].as_array().unwrap().len(), 2);
        assert_eq!(body["forecast"]["points"][0]["period"], "2024-04-01");
    }

    #[tokio::test]
    async fn test_forecast_unavailable() {
        let (status, body) = get_json("/api/forecast?year=2023").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["forecast"]["status"], "unavailable");
        assert!(body["forecast"]["reason"].is_string());
    }

    #[tokio::test]
    async fn test_bad_horizon_is_rejected() {
        let (status, _) = get_json("/api/forecast?horizon=soon").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_horizon_above_cap_is_rejected() {
        let (status, body) = get_json("/api/forecast?horizon=2000000").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("maximum of 120"));

        let (status, body) = get_json("/api/forecast?horizon=120").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["forecast"]["points"].as_array().unwrap().len(), 120);
    }

    #[tokio::test]
    async fn test_columns_and_quality() {
        let (_, body) = get_json("/api/columns").await;
        assert_eq!(body["resolved"].as_array().unwrap().len(), 5);

        let (_, body) = get_json("/api/quality").await;
        assert_eq!(body["source_rows"], 5);
        assert_eq!(body["dropped_cells"], 1);
        assert_eq!(body["skipped_rows"][0]["row"], 5);
    }
}
