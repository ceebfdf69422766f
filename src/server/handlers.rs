use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde_json::{json, Value};
use thiserror::Error;

use super::source::TableSource;
use crate::output::to_response;
use crate::scoring::{parse_preference, recommend, PreferenceError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Preference(#[from] PreferenceError),

    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Preference(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({"error": self.to_string()}))
    }
}

/// Body extractor config: undecodable JSON gets the same error shape as
/// validation failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest()
            .json(json!({"error": format!("Invalid value format: {}", err)}));
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

/// POST /api/recommend
///
/// Validates the preference, then runs the engine on the blocking pool over a
/// snapshot of the offerings table.
pub async fn recommend_handler(
    source: web::Data<TableSource>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    log::debug!("Received recommendation request: {}", body);

    let pref = parse_preference(&body).inspect_err(|e| log::debug!("Rejected request: {}", e))?;

    let source = source.into_inner();
    let recommendation = web::block(move || {
        source
            .snapshot()
            .map(|table| recommend(table.rows(), &pref))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("recommendation task failed: {}", e)))?
    .map_err(|e| {
        log::error!("Failed to load offerings: {:#}", e);
        ApiError::Internal(format!("{:#}", e))
    })?;

    let diag = &recommendation.diagnostics;
    log::debug!(
        "Got {} recommendations ({} of {} offerings passed filters)",
        recommendation.matches.len(),
        diag.passed_filter,
        diag.considered
    );
    if diag.scoring_failures > 0 {
        log::warn!("{} offerings could not be scored", diag.scoring_failures);
    }

    Ok(HttpResponse::Ok().json(to_response(&recommendation.matches)))
}

/// GET /api/health
pub async fn health_handler(source: web::Data<TableSource>) -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "ok", "offerings": source.cached_len()}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReloadPolicy;
    use crate::offerings::{ExamType, Offering, OfferingTable};
    use actix_web::{test, App};
    use std::env;
    use std::fs;

    fn offering(institute: &str, program: &str, exam_type: ExamType, rank: f64) -> Offering {
        Offering {
            institute: institute.to_string(),
            program: program.to_string(),
            exam_type,
            closing_rank: Some(rank),
            fee: Some(250_000.0),
            average_package: Some(1_800_000.0),
            seat_category: "OPEN".to_string(),
        }
    }

    fn sample_source() -> web::Data<TableSource> {
        let mut rows: Vec<Offering> = (1..=7)
            .map(|i| {
                offering(
                    &format!("NIT {}", i),
                    "Mechanical Engineering",
                    ExamType::JeeMains,
                    1_000.0 * i as f64,
                )
            })
            .collect();
        rows.push(offering("IIT X", "Computer Science", ExamType::JeeAdvanced, 100.0));
        web::Data::new(TableSource::fixed(OfferingTable::new(rows)))
    }

    fn body(prefer_iit: bool, advanced: u64, mains: u64) -> Value {
        json!({
            "jee_advanced_rank": advanced,
            "jee_mains_rank": mains,
            "max_fee": 300000,
            "min_salary": 1000000,
            "category": "OPEN",
            "prefer_iit": prefer_iit
        })
    }

    macro_rules! app {
        ($source:expr) => {
            test::init_service(
                App::new()
                    .app_data($source)
                    .configure(crate::server::configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_recommend_single_match() {
        let app = app!(sample_source());
        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(body(true, 50, 1))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let result: Value = test::read_body_json(resp).await;
        let list = result.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["institute"], "IIT X");
        assert_eq!(list[0]["package"], "₹1,800,000");
        assert_eq!(list[0]["fees"], "₹250,000");
        assert_eq!(list[0]["rank"], 100);
        assert_eq!(list[0]["score"], 35.0);
    }

    #[actix_web::test]
    async fn test_recommend_empty_is_ok() {
        let app = app!(sample_source());
        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(body(true, 150, 1))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let result: Value = test::read_body_json(resp).await;
        assert_eq!(result, json!([]));
    }

    #[actix_web::test]
    async fn test_recommend_caps_at_five() {
        let app = app!(sample_source());
        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(body(false, 1, 500))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let result: Value = test::read_body_json(resp).await;
        let list = result.as_array().unwrap();
        assert_eq!(list.len(), 5);
        // Better (lower) closing ranks score higher
        assert_eq!(list[0]["institute"], "NIT 1");
    }

    #[actix_web::test]
    async fn test_missing_field_is_bad_request() {
        let app = app!(sample_source());
        let mut payload = body(true, 50, 1);
        payload.as_object_mut().unwrap().remove("category");

        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let result: Value = test::read_body_json(resp).await;
        assert_eq!(result["error"], "Missing required field: category");
    }

    #[actix_web::test]
    async fn test_invalid_value_is_bad_request() {
        let app = app!(sample_source());
        let mut payload = body(true, 50, 1);
        payload["jee_mains_rank"] = json!("twelve");

        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let result: Value = test::read_body_json(resp).await;
        assert!(result["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid value format: jee_mains_rank"));
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app!(sample_source());
        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let result: Value = test::read_body_json(resp).await;
        assert!(result["error"].as_str().is_some());
    }

    #[actix_web::test]
    async fn test_reload_failure_is_server_error() {
        let path = env::temp_dir().join("college_pick_test_handler_vanishing.csv");
        fs::write(
            &path,
            "Institute,Academic Program Name,Type of Exam,Closing Rank,Fee Structure,Average Package,Seat Type\n\
             IIT X,Computer Science,JEE Advanced,100,250000,1800000,OPEN\n",
        )
        .unwrap();
        let source = TableSource::load(&path, ReloadPolicy::PerRequest).unwrap();
        fs::remove_file(&path).unwrap();

        let app = app!(web::Data::new(source));
        let req = test::TestRequest::post()
            .uri("/api/recommend")
            .set_json(body(true, 50, 1))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let result: Value = test::read_body_json(resp).await;
        assert!(result["error"].as_str().unwrap().contains("offerings"));
    }

    #[actix_web::test]
    async fn test_health() {
        let app = app!(sample_source());
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let result: Value = test::read_body_json(resp).await;
        assert_eq!(result, json!({"status": "ok", "offerings": 8}));
    }
}
