use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::actions;
use crate::error::ActionError;
use crate::models::BookingInput;
use crate::recommend::RecommendationRequest;
use crate::state::AppState;
use crate::store::BookingFilter;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/salons").route(web::get().to(list_salons)))
        .service(web::resource("/salons/{id}").route(web::get().to(get_salon)))
        .service(web::resource("/services").route(web::get().to(list_services)))
        .service(web::resource("/staff").route(web::get().to(list_staff)))
        .service(
            web::resource("/bookings")
                .route(web::get().to(list_bookings))
                .route(web::post().to(create_booking)),
        )
        .service(web::resource("/bookings/{id}/cancel").route(web::post().to(cancel_booking)))
        .service(web::resource("/recommendations").route(web::post().to(recommendations)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

#[derive(Deserialize)]
struct SalonQuery {
    owner_uid: Option<String>,
}

async fn list_salons(
    state: web::Data<AppState>,
    query: web::Query<SalonQuery>,
) -> Result<HttpResponse, ActionError> {
    let salons = actions::salons::list(&state.stores, query.owner_uid.as_deref()).await?;
    Ok(HttpResponse::Ok().json(salons))
}

async fn get_salon(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ActionError> {
    let salon = actions::salons::get(&state.stores, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(salon))
}

async fn list_services(state: web::Data<AppState>) -> Result<HttpResponse, ActionError> {
    let services = actions::services::list(&state.stores).await?;
    Ok(HttpResponse::Ok().json(services))
}

#[derive(Deserialize)]
struct StaffQuery {
    salon_id: Option<String>,
}

async fn list_staff(
    state: web::Data<AppState>,
    query: web::Query<StaffQuery>,
) -> Result<HttpResponse, ActionError> {
    let staff = actions::staff::list(&state.stores, query.salon_id.as_deref()).await?;
    Ok(HttpResponse::Ok().json(staff))
}

#[derive(Deserialize)]
struct BookingQuery {
    customer_email: Option<String>,
}

async fn list_bookings(
    state: web::Data<AppState>,
    query: web::Query<BookingQuery>,
) -> Result<HttpResponse, ActionError> {
    let filter = BookingFilter {
        customer_email: query.into_inner().customer_email,
        salon_id: None,
    };
    let bookings = actions::bookings::list(&state.stores, &filter).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

async fn create_booking(
    state: web::Data<AppState>,
    body: web::Json<BookingInput>,
) -> Result<HttpResponse, ActionError> {
    let booking = actions::bookings::add(&state.stores, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "booking": booking })))
}

async fn cancel_booking(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ActionError> {
    actions::bookings::cancel(&state.stores, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

async fn recommendations(
    state: web::Data<AppState>,
    body: web::Json<RecommendationRequest>,
) -> Result<HttpResponse, ActionError> {
    let result = state.recommender.recommend(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "recommendedServices": result.recommended_services,
        "reasoning": result.reasoning,
    })))
}
