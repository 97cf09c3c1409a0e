use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::actions;
use crate::error::ActionError;
use crate::models::ProfileInput;
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/profile").route(web::put().to(set_profile)))
        .service(web::resource("/profile/{uid}").route(web::get().to(get_profile)));
}

async fn set_profile(
    state: web::Data<AppState>,
    body: web::Json<ProfileInput>,
) -> Result<HttpResponse, ActionError> {
    actions::profiles::set(&state.stores, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ActionError> {
    let record = actions::profiles::get(&state.stores, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "profile": record })))
}
