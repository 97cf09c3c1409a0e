use std::sync::Arc;

use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use salonflow::error::ActionError;
use salonflow::recommend::{CompletionClient, Recommender};
use salonflow::routes;
use salonflow::state::AppState;
use salonflow::store::Stores;

struct ScriptedClient(&'static str);

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _: &str, _: &str) -> Result<String, ActionError> {
        Ok(self.0.to_string())
    }
}

fn memory_state() -> AppState {
    AppState {
        stores: Stores::memory(),
        recommender: Recommender::disabled(),
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(routes::json_config())
                .configure(routes::public::configure)
                .configure(routes::owner::configure)
                .configure(routes::account::configure),
        )
        .await
    };
}

fn salon_body() -> Value {
    json!({
        "name": "Velvet & Vine",
        "location": "18 Orchard Lane, Brookfield",
        "description": "Bright studio for cuts and colour.",
        "services": ["Hair", "Color"],
        "operatingHours": ["Mon-Fri 9:00-19:00"],
        "amenities": ["Free Wi-Fi"]
    })
}

fn booking_body(date: &str) -> Value {
    json!({
        "salonId": "salon-1",
        "customerName": "Dana Fox",
        "customerEmail": "dana@example.com",
        "service": "Classic Haircut",
        "date": date,
        "time": "14:30"
    })
}

#[actix_web::test]
async fn health_responds() {
    let app = test_app!(memory_state());
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn service_crud_over_http() {
    let app = test_app!(memory_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/owner/services")
            .set_json(json!({
                "name": "Classic Haircut",
                "duration": "45 min",
                "price": "$40",
                "category": "Hair"
            }))
            .to_request(),
    )
    .await;
    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    let id = body["service"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let listed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/services").to_request(),
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["name"], json!("Classic Haircut"));

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/owner/services/{id}"))
            .set_json(json!({
                "name": "Classic Haircut",
                "duration": "45 min",
                "price": "$45",
                "category": "Hair"
            }))
            .to_request(),
    )
    .await;
    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["service"]["price"], json!("$45"));

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/owner/services/{id}"))
            .to_request(),
    )
    .await;
    assert!(resp.status().is_success());

    let listed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/services").to_request(),
    )
    .await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn invalid_salon_reports_fields_with_400() {
    let app = test_app!(memory_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/owner/salons")
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("validation"));
    assert!(body["fields"]["name"].is_string());
    assert!(body["fields"]["services"].is_string());
}

#[actix_web::test]
async fn salon_detail_uses_camel_case_and_missing_id_is_404() {
    let app = test_app!(memory_state());

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/owner/salons")
            .set_json(salon_body())
            .to_request(),
    )
    .await;
    let id = created["salon"]["id"].as_str().unwrap();

    let salon: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/salons/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(salon["name"], json!("Velvet & Vine"));
    assert!(salon["operatingHours"].is_array());
    assert_eq!(salon["aiHint"], json!("salon interior"));
    assert_eq!(salon["image"], json!("https://placehold.co/600x400.png"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/salons/ghost").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("salon not found"));
}

#[actix_web::test]
async fn booking_create_list_cancel_flow() {
    let app = test_app!(memory_state());

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/bookings")
            .set_json(booking_body("2099-01-01"))
            .to_request(),
    )
    .await;
    assert_eq!(created["success"], json!(true));
    let id = created["booking"]["id"].as_str().unwrap().to_string();

    let mine: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/bookings?customer_email=dana@example.com")
            .to_request(),
    )
    .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/bookings/{id}/cancel"))
            .to_request(),
    )
    .await;
    assert!(resp.status().is_success());

    let mine: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/bookings?customer_email=dana@example.com")
            .to_request(),
    )
    .await;
    assert!(mine.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn cancelling_a_past_booking_is_rejected() {
    let app = test_app!(memory_state());

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/bookings")
            .set_json(booking_body("2020-01-01"))
            .to_request(),
    )
    .await;
    let id = created["booking"]["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/bookings/{id}/cancel"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["date"].is_string());

    let all: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/bookings").to_request())
            .await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn invalid_booking_time_is_a_field_error() {
    let app = test_app!(memory_state());

    let mut body = booking_body("2099-01-01");
    body["time"] = json!("25:00");
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/bookings")
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["time"].is_string());
}

#[actix_web::test]
async fn staff_derived_fields_ignore_the_caller() {
    let app = test_app!(memory_state());

    let created: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/owner/staff")
            .set_json(json!({
                "salonId": "salon-1",
                "name": "Alice Wonderland",
                "role": "Senior Stylist",
                "email": "alice@example.com",
                "initials": "ZZ",
                "aiHint": "robot portrait"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(created["staff"]["initials"], json!("AW"));
    assert_eq!(created["staff"]["aiHint"], json!("alice portrait"));

    let staff: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/staff?salon_id=salon-1")
            .to_request(),
    )
    .await;
    assert_eq!(staff.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn profile_set_and_get() {
    let app = test_app!(memory_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/profile")
            .set_json(json!({
                "uid": "uid-1",
                "firstName": "Dana",
                "lastName": "Fox",
                "email": "dana@example.com",
                "role": "owner"
            }))
            .to_request(),
    )
    .await;
    assert!(resp.status().is_success());

    let fetched: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/profile/uid-1").to_request(),
    )
    .await;
    assert_eq!(fetched["success"], json!(true));
    assert_eq!(fetched["profile"]["role"], json!("owner"));
    assert!(fetched["profile"]["createdAt"].is_string());

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/profile/ghost").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn recommendations_round_trip_with_a_scripted_backend() {
    let state = AppState {
        stores: Stores::memory(),
        recommender: Recommender::new(Arc::new(ScriptedClient(
            r#"{"recommendedServices":["Balayage"],"reasoning":"You liked colour work."}"#,
        ))),
    };
    let app = test_app!(state);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/recommendations")
            .set_json(json!({ "customerId": "uid-1", "history": "balayage in March" }))
            .to_request(),
    )
    .await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["recommendedServices"], json!(["Balayage"]));
    assert_eq!(body["reasoning"], json!("You liked colour work."));
}

#[actix_web::test]
async fn recommendations_require_a_customer_id() {
    let app = test_app!(memory_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/recommendations")
            .set_json(json!({ "history": "anything" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["customerId"].is_string());
}

#[actix_web::test]
async fn recommendations_without_a_backend_are_unavailable() {
    let app = test_app!(memory_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/recommendations")
            .set_json(json!({ "customerId": "uid-1" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 503);
}

#[actix_web::test]
async fn malformed_body_gets_the_error_envelope() {
    let app = test_app!(memory_state());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/owner/salons")
            .set_json(json!({ "rating": "not-a-number" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("invalid request body"));
}
