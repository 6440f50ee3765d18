// Route exports
pub mod map;

use actix_web::{error, web, HttpRequest};

pub use map::{failure_page, AppState};

/// Treat an unreadable form body like an incomplete form
pub fn handle_form_payload_error(err: error::UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Form payload error on {}: {}", req.path(), err);
    error::InternalError::from_response(err, failure_page()).into()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(handle_form_payload_error))
        .configure(map::configure);
}
