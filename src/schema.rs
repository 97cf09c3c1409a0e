//! Field-level validation for every entity the service stores. Validators
//! check the whole record and report every failing field, not just the first.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::models::{
    initials_for, portrait_hint_for, Booking, BookingInput, ProfileInput, Role, Salon, SalonInput,
    Service, ServiceInput, StaffInput, StaffMember, UserProfile, PLACEHOLDER_IMAGE,
    PLACEHOLDER_SALON_HINT,
};

pub const MAX_NOTES_CHARS: usize = 500;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
    )
    .unwrap();
    static ref TIME_REGEX: Regex = Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").unwrap();
}

/// Field name to reason, ordered for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, reason: &str) {
        self.0.insert(field.to_string(), reason.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn single(field: &str, reason: &str) -> Self {
        let mut errors = Self::new();
        errors.insert(field, reason);
        errors
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, reason) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field} {reason}")?;
            first = false;
        }
        Ok(())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn is_valid_time(time: &str) -> bool {
    TIME_REGEX.is_match(time)
}

pub fn is_valid_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

fn require_string(errors: &mut FieldErrors, field: &str, value: Option<String>) -> String {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => {
            errors.insert(field, "is required");
            String::new()
        }
    }
}

fn optional_string(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_list(errors: &mut FieldErrors, field: &str, value: Option<Vec<String>>) -> Vec<String> {
    match value {
        Some(values) => clean_list(values),
        None => {
            errors.insert(field, "is required");
            Vec::new()
        }
    }
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn check_email(errors: &mut FieldErrors, field: &str, email: &str) {
    if !email.is_empty() && !is_valid_email(email) {
        errors.insert(field, "must be a valid email address");
    }
}

fn check_url(errors: &mut FieldErrors, field: &str, value: &str) {
    if Url::parse(value).is_err() {
        errors.insert(field, "must be a valid URL");
    }
}

pub fn profile(input: ProfileInput) -> Result<UserProfile, FieldErrors> {
    let mut errors = FieldErrors::new();

    let uid = require_string(&mut errors, "uid", input.uid);
    let first_name = require_string(&mut errors, "firstName", input.first_name);
    let last_name = require_string(&mut errors, "lastName", input.last_name);
    let email = require_string(&mut errors, "email", input.email);
    check_email(&mut errors, "email", &email);

    let role = match require_string(&mut errors, "role", input.role).parse::<Role>() {
        Ok(role) => role,
        Err(()) => {
            if !errors.contains("role") {
                errors.insert("role", "must be one of customer, owner, staff");
            }
            Role::Customer
        }
    };

    errors.into_result(UserProfile {
        uid,
        first_name,
        last_name,
        email,
        role,
    })
}

/// Re-check a profile that came back from the durable store. Failures here
/// mean the stored data is corrupt, not that the caller sent bad input.
pub fn check_profile(profile: &UserProfile) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if profile.uid.trim().is_empty() {
        errors.insert("uid", "is required");
    }
    if profile.first_name.trim().is_empty() {
        errors.insert("firstName", "is required");
    }
    if profile.last_name.trim().is_empty() {
        errors.insert("lastName", "is required");
    }
    if profile.email.trim().is_empty() {
        errors.insert("email", "is required");
    } else {
        check_email(&mut errors, "email", &profile.email);
    }
    errors.into_result(())
}

fn service_from(input: ServiceInput, id: String, errors: &mut FieldErrors) -> Service {
    Service {
        id,
        name: require_string(errors, "name", input.name),
        duration: require_string(errors, "duration", input.duration),
        price: require_string(errors, "price", input.price),
        category: require_string(errors, "category", input.category),
    }
}

pub fn new_service(input: ServiceInput, id: String) -> Result<Service, FieldErrors> {
    let mut errors = FieldErrors::new();
    let service = service_from(input, id, &mut errors);
    errors.into_result(service)
}

pub fn existing_service(input: ServiceInput) -> Result<Service, FieldErrors> {
    let mut input = input;
    let mut errors = FieldErrors::new();
    let id = require_string(&mut errors, "id", input.id.take());
    let service = service_from(input, id, &mut errors);
    errors.into_result(service)
}

fn staff_from(input: StaffInput, id: String, errors: &mut FieldErrors) -> StaffMember {
    let name = require_string(errors, "name", input.name);
    let email = require_string(errors, "email", input.email);
    check_email(errors, "email", &email);

    let avatar = optional_string(input.avatar);
    if let Some(url) = &avatar {
        check_url(errors, "avatar", url);
    }

    // Derived fields never come from the caller.
    let initials = initials_for(&name);
    let ai_hint = portrait_hint_for(&name);

    StaffMember {
        id,
        salon_id: require_string(errors, "salonId", input.salon_id),
        role: require_string(errors, "role", input.role),
        email,
        avatar,
        initials,
        ai_hint,
        provided_services: clean_list(input.provided_services.unwrap_or_default()),
        name,
    }
}

pub fn new_staff(input: StaffInput, id: String) -> Result<StaffMember, FieldErrors> {
    let mut errors = FieldErrors::new();
    let staff = staff_from(input, id, &mut errors);
    errors.into_result(staff)
}

pub fn existing_staff(input: StaffInput) -> Result<StaffMember, FieldErrors> {
    let mut input = input;
    let mut errors = FieldErrors::new();
    let id = require_string(&mut errors, "id", input.id.take());
    let staff = staff_from(input, id, &mut errors);
    errors.into_result(staff)
}

fn booking_from(input: BookingInput, id: String, errors: &mut FieldErrors) -> Booking {
    let customer_email = optional_string(input.customer_email);
    if let Some(email) = &customer_email {
        check_email(errors, "customerEmail", email);
    }

    let date = require_string(errors, "date", input.date);
    if !date.is_empty() && !is_valid_date(&date) {
        errors.insert("date", "must be an ISO calendar date (YYYY-MM-DD)");
    }

    let time = require_string(errors, "time", input.time);
    if !time.is_empty() && !is_valid_time(&time) {
        errors.insert("time", "must be a valid 24-hour time (HH:MM)");
    }

    let notes = optional_string(input.notes);
    if let Some(notes) = &notes {
        if notes.chars().count() > MAX_NOTES_CHARS {
            errors.insert("notes", "must be 500 characters or fewer");
        }
    }

    Booking {
        id,
        salon_id: require_string(errors, "salonId", input.salon_id),
        customer_name: require_string(errors, "customerName", input.customer_name),
        customer_email,
        service: require_string(errors, "service", input.service),
        date,
        time,
        staff: optional_string(input.staff),
        notes,
    }
}

pub fn new_booking(input: BookingInput, id: String) -> Result<Booking, FieldErrors> {
    let mut errors = FieldErrors::new();
    let booking = booking_from(input, id, &mut errors);
    errors.into_result(booking)
}

pub fn existing_booking(input: BookingInput) -> Result<Booking, FieldErrors> {
    let mut input = input;
    let mut errors = FieldErrors::new();
    let id = require_string(&mut errors, "id", input.id.take());
    let booking = booking_from(input, id, &mut errors);
    errors.into_result(booking)
}

fn salon_from(input: SalonInput, id: String, errors: &mut FieldErrors) -> Salon {
    let rating = input.rating.unwrap_or(0.0);
    if !(0.0..=5.0).contains(&rating) {
        errors.insert("rating", "must be between 0 and 5");
    }

    let services = clean_list(input.services.unwrap_or_default());
    if services.is_empty() {
        errors.insert("services", "must include at least one service category");
    }

    let image = match optional_string(input.image) {
        Some(url) => {
            check_url(errors, "image", &url);
            url
        }
        None => PLACEHOLDER_IMAGE.to_string(),
    };

    // The hint pairs with the placeholder image, so it gets a fallback too.
    let ai_hint =
        optional_string(input.ai_hint).unwrap_or_else(|| PLACEHOLDER_SALON_HINT.to_string());

    Salon {
        id,
        owner_uid: optional_string(input.owner_uid),
        name: require_string(errors, "name", input.name),
        location: require_string(errors, "location", input.location),
        rating,
        services,
        image,
        ai_hint,
        description: require_string(errors, "description", input.description),
        operating_hours: require_list(errors, "operatingHours", input.operating_hours),
        amenities: require_list(errors, "amenities", input.amenities),
    }
}

pub fn new_salon(input: SalonInput, id: String) -> Result<Salon, FieldErrors> {
    let mut errors = FieldErrors::new();
    let salon = salon_from(input, id, &mut errors);
    errors.into_result(salon)
}

pub fn existing_salon(input: SalonInput) -> Result<Salon, FieldErrors> {
    let mut input = input;
    let mut errors = FieldErrors::new();
    let id = require_string(&mut errors, "id", input.id.take());
    let salon = salon_from(input, id, &mut errors);
    errors.into_result(salon)
}
