use actix_web::{web, HttpResponse};
use serde_json::json;

pub mod account;
pub mod owner;
pub mod public;

// Malformed request bodies get the same envelope as validation failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("invalid request body: {err}");
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "success": false, "error": message })),
        )
        .into()
    })
}
