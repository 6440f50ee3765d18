use actix_web::{http::header::ContentType, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{MapDocument, MapError, Pipeline};
use crate::models::{HealthResponse, MapFormRequest};
use crate::services::NominatimClient;
use std::sync::Arc;

const INDEX_PAGE: &str = include_str!("../../templates/index.html");
const FAILURE_PAGE: &str = include_str!("../../templates/failure.html");

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub geocoder: Arc<NominatimClient>,
}

/// Configure the form, map and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(index))
        .route("/map", web::post().to(generate_map))
        .route("/health", web::get().to(health_check));
}

fn html(body: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body.into())
}

/// The one page shown for every kind of failure
pub fn failure_page() -> HttpResponse {
    html(FAILURE_PAGE)
}

/// Submission form
async fn index() -> impl Responder {
    html(INDEX_PAGE)
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Build the friends map
///
/// POST /map
///
/// Form fields: `twit`, `consumer_key`, `consumer_key_secret`,
/// `access_token`, `access_token_secret`. All are required.
async fn generate_map(
    state: web::Data<AppState>,
    form: web::Form<MapFormRequest>,
) -> impl Responder {
    let form = form.into_inner();

    match build_map(&state, &form).await {
        Ok(map) => {
            tracing::info!("Rendered map for @{} with {} markers", form.twit, map.markers.len());
            html(map.render())
        }
        Err(e) => {
            match &e {
                MapError::Validation(_) | MapError::NoLocatedFriends(_) => {
                    tracing::info!("Map for @{} not built: {}", form.twit, e)
                }
                MapError::Twitter(_) => {
                    tracing::warn!("Map for @{} failed: {}", form.twit, e)
                }
            }
            failure_page()
        }
    }
}

async fn build_map(state: &AppState, form: &MapFormRequest) -> Result<MapDocument, MapError> {
    form.validate()?;

    tracing::info!("Building map for @{}", form.twit);

    state
        .pipeline
        .generate(state.geocoder.as_ref(), &form.twit, form.credentials())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, test, App};
    use crate::config::Settings;
    use std::time::Duration;

    fn state() -> AppState {
        let settings = Settings::default();
        AppState {
            pipeline: Pipeline::from_settings(&settings),
            // Never reached: validation fails first
            geocoder: Arc::new(
                NominatimClient::new("http://127.0.0.1:9", "test", Duration::from_secs(1)).unwrap(),
            ),
        }
    }

    #[actix_web::test]
    async fn test_index_serves_form() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());

        let body = to_bytes(resp.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("action=\"/map\""));
        for field in ["twit", "consumer_key", "consumer_key_secret", "access_token", "access_token_secret"] {
            assert!(body.contains(&format!("name=\"{}\"", field)), "missing {}", field);
        }
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let resp: HealthResponse =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status, "healthy");
    }

    #[actix_web::test]
    async fn test_blank_field_returns_failure_page() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/map")
            .set_form([
                ("twit", "jack"),
                ("consumer_key", "ck"),
                ("consumer_key_secret", ""),
                ("access_token", "at"),
                ("access_token_secret", "ats"),
            ])
            .to_request();

        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, FAILURE_PAGE.as_bytes());
    }

    #[actix_web::test]
    async fn test_missing_field_returns_failure_page() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/map")
            .set_form([("twit", "jack")])
            .to_request();

        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, FAILURE_PAGE.as_bytes());
    }

    #[actix_web::test]
    async fn test_malformed_body_returns_failure_page() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(crate::routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/map")
            .insert_header(ContentType::json())
            .set_payload("{}")
            .to_request();

        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, FAILURE_PAGE.as_bytes());
    }
}
