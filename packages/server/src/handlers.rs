//! HTTP handler functions for the street traffic API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use street_traffic::RouteStep;
use street_traffic::route::{analyze_route, strip_markup};
use street_traffic_server_models::{
    AdjustRequest, ApiError, ApiHealth, ApiRouteAnalysis, ApiSearchResponse, ApiStatsResponse,
    ApiStreetLevel, ApiStreetMatch, SearchParams, StreetLevelParams,
};

use crate::{AppState, DEFAULT_SEARCH_LIMIT};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/traffic/level`
///
/// Classifies the street named by the `street` query parameter.
pub async fn street_level(
    state: web::Data<AppState>,
    params: web::Query<StreetLevelParams>,
) -> HttpResponse {
    let Some(street) = non_empty(params.into_inner().street) else {
        return HttpResponse::BadRequest().json(ApiError::new("Street parameter is required"));
    };

    let classification = state.engine.snapshot().classify(&street);
    HttpResponse::Ok().json(ApiStreetLevel::new(street, &classification))
}

/// `GET /api/traffic/search`
///
/// Streets whose names contain `q`, prefix matches first.
pub async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> HttpResponse {
    let params = params.into_inner();
    let Some(query) = non_empty(params.q) else {
        return HttpResponse::BadRequest().json(ApiError::new("Query parameter 'q' is required"));
    };
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    let results: Vec<ApiStreetMatch> = state
        .engine
        .snapshot()
        .search_streets(&query, limit)
        .into_iter()
        .map(ApiStreetMatch::from)
        .collect();

    HttpResponse::Ok().json(ApiSearchResponse {
        count: results.len(),
        results,
    })
}

/// `GET /api/traffic/stats`
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    let engine = state.engine.snapshot();
    HttpResponse::Ok().json(ApiStatsResponse::from_stats(engine.stats()))
}

/// `POST /api/traffic/adjust`
///
/// Adjusts each route alternative's provider duration. Markup is stripped
/// from instructions before street extraction.
pub async fn adjust(state: web::Data<AppState>, body: web::Json<AdjustRequest>) -> HttpResponse {
    let request = body.into_inner();
    let engine = state.engine.snapshot();

    let analyses: Vec<ApiRouteAnalysis> = request
        .routes
        .into_iter()
        .map(|route| {
            let steps: Vec<RouteStep> = route
                .steps
                .into_iter()
                .map(|step| RouteStep {
                    instruction: strip_markup(&step.instruction),
                    duration_seconds: step.duration_seconds,
                })
                .collect();
            let analysis = analyze_route(
                &engine,
                &steps,
                route.duration_seconds,
                request.include_details,
            );
            ApiRouteAnalysis::new(analysis, request.include_details)
        })
        .collect();

    HttpResponse::Ok().json(analyses)
}

/// `POST /api/traffic/reload`
///
/// Rebuilds the index from the configured dataset and swaps it in.
/// Returns the statistics of the new index.
pub async fn reload(state: web::Data<AppState>) -> HttpResponse {
    let handle = Arc::clone(&state.engine);
    match web::block(move || handle.reload()).await {
        Ok(engine) => HttpResponse::Ok().json(ApiStatsResponse::from_stats(engine.stats())),
        Err(e) => {
            log::error!("Reload failed: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Reload failed"))
        }
    }
}

/// Trims `value` and drops it when nothing is left.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use street_traffic::{EngineHandle, TrafficConfig, TrafficEngine, TrafficRecord};

    use super::*;

    fn record(street: &str, count: f64) -> TrafficRecord {
        TrafficRecord {
            street_name: street.to_string(),
            total_count: count,
            date_count: None,
            limits: None,
        }
    }

    fn state_with(records: &[TrafficRecord], config: TrafficConfig) -> web::Data<AppState> {
        let engine = TrafficEngine::build(records, &config);
        web::Data::new(AppState {
            engine: Arc::new(EngineHandle::new(engine, config)),
        })
    }

    fn sample_state() -> web::Data<AppState> {
        state_with(
            &[
                record("MAIN ST", 20_000.0),
                record("MAIN ST", 10_000.0),
                record("ELM AV", 3000.0),
                record("MAINTENANCE WY", 1000.0),
            ],
            TrafficConfig::default(),
        )
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().configure(crate::configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["healthy"], json!(true));
        assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
    }

    #[actix_web::test]
    async fn classifies_street_from_query() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/traffic/level?street=Main%20Street")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["street"], json!("Main Street"));
        assert_eq!(body["trafficLevel"], json!("high"));
        assert_eq!(body["congestionMultiplier"], json!(1.15));
        assert_eq!(body["vehicleCount"], json!(15_000.0));
    }

    #[actix_web::test]
    async fn unknown_street_has_null_count() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/traffic/level?street=Nowhere%20Rd")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["trafficLevel"], json!("unknown"));
        assert_eq!(body["congestionMultiplier"], json!(1.0));
        assert_eq!(body["vehicleCount"], Value::Null);
    }

    #[actix_web::test]
    async fn missing_street_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .configure(crate::configure),
        )
        .await;

        for uri in ["/api/traffic/level", "/api/traffic/level?street=%20"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], json!("Street parameter is required"));
        }
    }

    #[actix_web::test]
    async fn searches_with_prefix_first() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/traffic/search?q=main&limit=5")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], json!(2));
        assert_eq!(body["results"][0]["streetName"], json!("MAIN ST"));
        assert_eq!(body["results"][0]["averageCount"], json!(15_000));
        assert_eq!(body["results"][0]["trafficLevel"], json!("high"));
        assert_eq!(body["results"][0]["sampleSize"], json!(2));
        assert_eq!(body["results"][1]["streetName"], json!("MAINTENANCE WY"));
    }

    #[actix_web::test]
    async fn search_limit_truncates() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/traffic/search?q=main&limit=1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["count"], json!(1));
    }

    #[actix_web::test]
    async fn missing_search_query_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/traffic/search")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn stats_without_data_reports_no_data() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(&[], TrafficConfig::default()))
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/traffic/stats")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, json!({ "status": "no_data" }));
    }

    #[actix_web::test]
    async fn stats_summarize_records() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/traffic/stats")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["totalRecords"], json!(4));
        assert_eq!(body["uniqueStreets"], json!(3));
        assert_eq!(body["averageCount"], json!(8500));
        assert_eq!(body["maxCount"], json!(20_000));
        assert_eq!(body["minCount"], json!(1000));
        assert!(body.get("dateRange").is_none());
    }

    #[actix_web::test]
    async fn adjusts_routes_after_stripping_markup() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/traffic/adjust")
            .set_json(json!({
                "routes": [
                    {
                        "steps": [
                            { "instruction": "Slight <b>right</b> at <b>Main St</b>", "durationSeconds": 600 },
                            { "instruction": "Keep left at <b>Elm Ave</b>", "durationSeconds": 600 }
                        ]
                    },
                    {
                        "steps": [{ "instruction": "Continue straight" }],
                        "durationSeconds": 900
                    }
                ],
                "includeDetails": true
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let first = &body[0];
        assert_eq!(first["totalDurationSeconds"], json!(1200));
        assert_eq!(first["trafficAnalysis"]["multiplier"], json!(1.05));
        assert_eq!(first["trafficAnalysis"]["confidence"], json!("medium"));
        assert_eq!(first["trafficAnalysis"]["streetsAnalyzed"], json!(2));
        assert_eq!(first["trafficAdjustedSeconds"], json!(1260));
        assert_eq!(first["trafficAdjustedDuration"], json!("21 mins"));
        assert_eq!(
            first["trafficAnalysis"]["streetDetails"][0]["street"],
            json!("MAIN ST")
        );
        assert_eq!(
            first["trafficAnalysis"]["streetDetails"][1]["level"],
            json!("low")
        );

        let second = &body[1];
        assert_eq!(second["totalDurationSeconds"], json!(900));
        assert_eq!(second["trafficAdjustedSeconds"], json!(900));
        assert_eq!(second["trafficAnalysis"]["confidence"], json!("low"));
        assert_eq!(second["trafficAnalysis"]["streetDetails"], json!([]));
    }

    #[actix_web::test]
    async fn adjust_omits_details_by_default() {
        let app = test::init_service(
            App::new()
                .app_data(sample_state())
                .configure(crate::configure),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/traffic/adjust")
            .set_json(json!({
                "routes": [{ "steps": [{ "instruction": "Slight right at Main St" }] }]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body[0]["trafficAnalysis"]["multiplier"], json!(1.15));
        assert!(body[0]["trafficAnalysis"].get("streetDetails").is_none());
    }

    #[actix_web::test]
    async fn reload_swaps_in_new_dataset() {
        let tmp = std::env::temp_dir().join("street_traffic_server_reload");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("counts.csv");
        std::fs::write(&path, "street_name,total_count\nOAK ST,5000\n").unwrap();

        let config = TrafficConfig {
            dataset_path: path,
            ..TrafficConfig::default()
        };
        let state = state_with(&[record("MAIN ST", 30_000.0)], config);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/traffic/reload")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totalRecords"], json!(1));
        assert_eq!(body["uniqueStreets"], json!(1));

        let engine = state.engine.snapshot();
        assert!(engine.classify("MAIN ST").is_unknown());
        assert_eq!(engine.classify("Oak Street").count, Some(5000.0));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
