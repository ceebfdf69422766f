pub mod handlers;
pub mod source;

pub use handlers::ApiError;
pub use source::TableSource;

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpServer};

use crate::config::ServerConfig;

/// Register the API routes. Shared by the server and handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::json_config())
        .route("/api/recommend", web::post().to(handlers::recommend_handler))
        .route("/api/health", web::get().to(handlers::health_handler));
}

/// CORS policy: any origin when the list is empty, otherwise only the listed ones.
fn build_cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }

    origins.iter().fold(
        Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_header(header::CONTENT_TYPE)
            .max_age(3600),
        |cors, origin| cors.allowed_origin(origin),
    )
}

/// Run the HTTP server until shutdown.
pub async fn run_server(config: &ServerConfig, source: TableSource) -> std::io::Result<()> {
    let source = web::Data::new(source);
    let origins = config.cors_origins.clone();

    log::info!(
        "Serving {} offerings on http://{} (reload: {:?})",
        source.cached_len(),
        config.bind,
        source.policy()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&origins))
            .wrap(middleware::Logger::default())
            .app_data(source.clone())
            .configure(configure)
    })
    .bind(config.bind.as_str())?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offerings::OfferingTable;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_web::test]
    async fn test_permissive_cors_preflight() {
        let source = web::Data::new(TableSource::fixed(OfferingTable::default()));
        let app = test::init_service(
            App::new()
                .wrap(build_cors(&[]))
                .app_data(source)
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/recommend")
            .insert_header((header::ORIGIN, "http://example.com"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[actix_web::test]
    async fn test_restricted_cors_allows_listed_origin() {
        let source = web::Data::new(TableSource::fixed(OfferingTable::default()));
        let origins = vec!["http://localhost:3000".to_string()];
        let app = test::init_service(
            App::new()
                .wrap(build_cors(&origins))
                .app_data(source)
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
    }
}
