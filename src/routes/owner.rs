//! Owner-side management surface. Mutations take the record in the body; for
//! updates the path id wins over any id in the payload.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::actions;
use crate::error::ActionError;
use crate::models::{BookingInput, SalonInput, ServiceInput, StaffInput};
use crate::state::AppState;
use crate::store::BookingFilter;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/owner")
            .service(web::resource("/salons").route(web::post().to(create_salon)))
            .service(
                web::resource("/salons/{id}")
                    .route(web::put().to(update_salon))
                    .route(web::delete().to(delete_salon)),
            )
            .service(web::resource("/services").route(web::post().to(create_service)))
            .service(
                web::resource("/services/{id}")
                    .route(web::put().to(update_service))
                    .route(web::delete().to(delete_service)),
            )
            .service(web::resource("/staff").route(web::post().to(create_staff)))
            .service(
                web::resource("/staff/{id}")
                    .route(web::put().to(update_staff))
                    .route(web::delete().to(delete_staff)),
            )
            .service(web::resource("/bookings").route(web::get().to(list_bookings)))
            .service(
                web::resource("/bookings/{id}")
                    .route(web::put().to(update_booking))
                    .route(web::delete().to(delete_booking)),
            ),
    );
}

async fn create_salon(
    state: web::Data<AppState>,
    body: web::Json<SalonInput>,
) -> Result<HttpResponse, ActionError> {
    let salon = actions::salons::add(&state.stores, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "salon": salon })))
}

async fn update_salon(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SalonInput>,
) -> Result<HttpResponse, ActionError> {
    let mut input = body.into_inner();
    input.id = Some(path.into_inner());
    let salon = actions::salons::update(&state.stores, input).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "salon": salon })))
}

async fn delete_salon(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ActionError> {
    actions::salons::delete(&state.stores, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

async fn create_service(
    state: web::Data<AppState>,
    body: web::Json<ServiceInput>,
) -> Result<HttpResponse, ActionError> {
    let service = actions::services::add(&state.stores, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "service": service })))
}

async fn update_service(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ServiceInput>,
) -> Result<HttpResponse, ActionError> {
    let mut input = body.into_inner();
    input.id = Some(path.into_inner());
    let service = actions::services::update(&state.stores, input).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "service": service })))
}

async fn delete_service(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ActionError> {
    actions::services::delete(&state.stores, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

async fn create_staff(
    state: web::Data<AppState>,
    body: web::Json<StaffInput>,
) -> Result<HttpResponse, ActionError> {
    let member = actions::staff::add(&state.stores, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "staff": member })))
}

async fn update_staff(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<StaffInput>,
) -> Result<HttpResponse, ActionError> {
    let mut input = body.into_inner();
    input.id = Some(path.into_inner());
    let member = actions::staff::update(&state.stores, input).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "staff": member })))
}

async fn delete_staff(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ActionError> {
    actions::staff::delete(&state.stores, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[derive(Deserialize)]
struct OwnerBookingQuery {
    salon_id: Option<String>,
}

async fn list_bookings(
    state: web::Data<AppState>,
    query: web::Query<OwnerBookingQuery>,
) -> Result<HttpResponse, ActionError> {
    let filter = BookingFilter {
        customer_email: None,
        salon_id: query.into_inner().salon_id,
    };
    let bookings = actions::bookings::list(&state.stores, &filter).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

async fn update_booking(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BookingInput>,
) -> Result<HttpResponse, ActionError> {
    let mut input = body.into_inner();
    input.id = Some(path.into_inner());
    let booking = actions::bookings::update(&state.stores, input).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "booking": booking })))
}

async fn delete_booking(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ActionError> {
    actions::bookings::delete(&state.stores, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
