use chrono::{NaiveDate, Utc};

use crate::error::ActionError;
use crate::models::{Booking, BookingInput};
use crate::schema::{self, FieldErrors};
use crate::store::{new_id, BookingFilter, StoreError, Stores};

fn store_err(err: StoreError) -> ActionError {
    ActionError::from_store(err, "booking")
}

pub async fn list(stores: &Stores, filter: &BookingFilter) -> Result<Vec<Booking>, ActionError> {
    stores.bookings.list(filter).await.map_err(store_err)
}

pub async fn add(stores: &Stores, input: BookingInput) -> Result<Booking, ActionError> {
    let booking = schema::new_booking(input, new_id())?;
    stores
        .bookings
        .insert(booking.clone())
        .await
        .map_err(store_err)?;
    Ok(booking)
}

pub async fn update(stores: &Stores, input: BookingInput) -> Result<Booking, ActionError> {
    let booking = schema::existing_booking(input)?;
    stores
        .bookings
        .replace(booking.clone())
        .await
        .map_err(store_err)?;
    Ok(booking)
}

pub async fn delete(stores: &Stores, id: &str) -> Result<(), ActionError> {
    stores.bookings.remove(id).await.map_err(store_err)
}

/// Customer-side removal. A booking can only be cancelled while its date has
/// not passed; today still counts as cancellable.
pub async fn cancel(stores: &Stores, id: &str) -> Result<(), ActionError> {
    let booking = stores.bookings.get(id).await.map_err(store_err)?;

    let date = NaiveDate::parse_from_str(&booking.date, "%Y-%m-%d").map_err(|_| {
        ActionError::UpstreamData(FieldErrors::single(
            "date",
            "must be an ISO date (YYYY-MM-DD)",
        ))
    })?;
    if date < Utc::now().date_naive() {
        return Err(ActionError::Validation(FieldErrors::single(
            "date",
            "only future bookings can be cancelled",
        )));
    }

    stores.bookings.remove(id).await.map_err(store_err)
}
