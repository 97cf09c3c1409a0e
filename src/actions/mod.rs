//! Operations behind the HTTP surface. Each function validates its input,
//! talks to the injected stores, and maps store failures onto [`ActionError`].
//!
//! [`ActionError`]: crate::error::ActionError

pub mod bookings;
pub mod profiles;
pub mod salons;
pub mod services;
pub mod staff;
