//! Storage backends behind one repository interface per entity. The memory
//! backend serves tests and demo mode; the SQLite backend is the durable
//! engine. Handlers only ever see the trait objects bundled in [`Stores`].

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Booking, ProfileRecord, Salon, Service, StaffMember, UserProfile};
use crate::schema::FieldErrors;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    NotFound,
    Unavailable(String),
    Corrupt(FieldErrors),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "record not found"),
            StoreError::Unavailable(reason) => write!(f, "store unavailable: {reason}"),
            StoreError::Corrupt(fields) => write!(f, "stored data is corrupt: {fields}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// New record identifiers: UUID v7, time-ordered with a random tail, so ids
/// are collision-resistant and sort by creation time.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

#[async_trait]
pub trait SalonStore: Send + Sync {
    async fn list(&self, owner_uid: Option<&str>) -> StoreResult<Vec<Salon>>;
    async fn get(&self, id: &str) -> StoreResult<Salon>;
    async fn insert(&self, salon: Salon) -> StoreResult<()>;
    async fn replace(&self, salon: Salon) -> StoreResult<()>;
    async fn remove(&self, id: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Service>>;
    async fn insert(&self, service: Service) -> StoreResult<()>;
    async fn replace(&self, service: Service) -> StoreResult<()>;
    async fn remove(&self, id: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait StaffStore: Send + Sync {
    async fn list(&self, salon_id: Option<&str>) -> StoreResult<Vec<StaffMember>>;
    async fn insert(&self, member: StaffMember) -> StoreResult<()>;
    async fn replace(&self, member: StaffMember) -> StoreResult<()>;
    async fn remove(&self, id: &str) -> StoreResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub customer_email: Option<String>,
    pub salon_id: Option<String>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(email) = &self.customer_email {
            if booking.customer_email.as_deref() != Some(email.as_str()) {
                return false;
            }
        }
        if let Some(salon_id) = &self.salon_id {
            if booking.salon_id != *salon_id {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn list(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>>;
    async fn get(&self, id: &str) -> StoreResult<Booking>;
    async fn insert(&self, booking: Booking) -> StoreResult<()>;
    async fn replace(&self, booking: Booking) -> StoreResult<()>;
    async fn remove(&self, id: &str) -> StoreResult<()>;
}

/// Keyed by the externally issued uid. `set` is a merge-write: the first
/// write stamps `created_at`, later writes refresh the fields and
/// `updated_at` while `created_at` is left untouched.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn set(&self, profile: UserProfile) -> StoreResult<()>;
    async fn get(&self, uid: &str) -> StoreResult<ProfileRecord>;
}

#[derive(Clone)]
pub struct Stores {
    pub salons: Arc<dyn SalonStore>,
    pub services: Arc<dyn ServiceStore>,
    pub staff: Arc<dyn StaffStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub profiles: Arc<dyn ProfileStore>,
}

impl Stores {
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Stores {
            salons: store.clone(),
            services: store.clone(),
            staff: store.clone(),
            bookings: store.clone(),
            profiles: store,
        }
    }

    pub fn sqlite(pool: SqlitePool) -> Self {
        let store = Arc::new(SqliteStore::new(pool));
        Stores {
            salons: store.clone(),
            services: store.clone(),
            staff: store.clone(),
            bookings: store.clone(),
            profiles: store,
        }
    }
}
