use std::fs;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{Booking, ProfileRecord, Role, Salon, Service, StaffMember, UserProfile};
use crate::schema::FieldErrors;
use crate::store::{
    BookingFilter, BookingStore, ProfileStore, SalonStore, ServiceStore, StaffStore, StoreError,
    StoreResult,
};

/// SQLite-backed persistence. List-valued columns hold JSON arrays and are
/// decoded on read; a row that fails to decode surfaces as `Corrupt` so the
/// caller can report which field went bad.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn corrupt(field: &str, reason: &str) -> StoreError {
    let mut fields = FieldErrors::new();
    fields.insert(field, reason);
    StoreError::Corrupt(fields)
}

// Field names in corrupt errors use the wire spelling so they line up with
// validation errors on the same record.
fn decode_list(field: &str, raw: &str) -> StoreResult<Vec<String>> {
    serde_json::from_str(raw).map_err(|_| corrupt(field, "stored list is not valid JSON"))
}

fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[derive(sqlx::FromRow)]
struct SalonRow {
    id: String,
    owner_uid: Option<String>,
    name: String,
    location: String,
    rating: f64,
    services: String,
    image: String,
    ai_hint: String,
    description: String,
    operating_hours: String,
    amenities: String,
}

impl SalonRow {
    fn into_salon(self) -> StoreResult<Salon> {
        Ok(Salon {
            id: self.id,
            owner_uid: self.owner_uid,
            name: self.name,
            location: self.location,
            rating: self.rating,
            services: decode_list("services", &self.services)?,
            image: self.image,
            ai_hint: self.ai_hint,
            description: self.description,
            operating_hours: decode_list("operatingHours", &self.operating_hours)?,
            amenities: decode_list("amenities", &self.amenities)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: String,
    name: String,
    duration: String,
    price: String,
    category: String,
}

impl ServiceRow {
    fn into_service(self) -> Service {
        Service {
            id: self.id,
            name: self.name,
            duration: self.duration,
            price: self.price,
            category: self.category,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StaffRow {
    id: String,
    salon_id: String,
    name: String,
    role: String,
    email: String,
    initials: String,
    avatar: Option<String>,
    ai_hint: String,
    provided_services: String,
}

impl StaffRow {
    fn into_staff(self) -> StoreResult<StaffMember> {
        Ok(StaffMember {
            id: self.id,
            salon_id: self.salon_id,
            name: self.name,
            role: self.role,
            email: self.email,
            initials: self.initials,
            avatar: self.avatar,
            ai_hint: self.ai_hint,
            provided_services: decode_list("providedServices", &self.provided_services)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: String,
    salon_id: String,
    customer_name: String,
    customer_email: Option<String>,
    service: String,
    date: String,
    time: String,
    staff: Option<String>,
    notes: Option<String>,
}

impl BookingRow {
    fn into_booking(self) -> Booking {
        Booking {
            id: self.id,
            salon_id: self.salon_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            service: self.service,
            date: self.date,
            time: self.time,
            staff: self.staff,
            notes: self.notes,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    uid: String,
    first_name: String,
    last_name: String,
    email: String,
    role: String,
    created_at: String,
    updated_at: String,
}

impl ProfileRow {
    fn into_record(self) -> StoreResult<ProfileRecord> {
        let role = Role::from_str(&self.role)
            .map_err(|_| corrupt("role", "must be one of customer, owner, staff"))?;
        Ok(ProfileRecord {
            profile: UserProfile {
                uid: self.uid,
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                role,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl SalonStore for SqliteStore {
    async fn list(&self, owner_uid: Option<&str>) -> StoreResult<Vec<Salon>> {
        let rows = match owner_uid {
            Some(owner) => {
                sqlx::query_as::<_, SalonRow>(
                    r#"SELECT id, owner_uid, name, location, rating, services, image,
                              ai_hint, description, operating_hours, amenities
                       FROM salons WHERE owner_uid = ? ORDER BY id"#,
                )
                .bind(owner)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, SalonRow>(
                    r#"SELECT id, owner_uid, name, location, rating, services, image,
                              ai_hint, description, operating_hours, amenities
                       FROM salons ORDER BY id"#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(unavailable)?;

        rows.into_iter().map(SalonRow::into_salon).collect()
    }

    async fn get(&self, id: &str) -> StoreResult<Salon> {
        let row = sqlx::query_as::<_, SalonRow>(
            r#"SELECT id, owner_uid, name, location, rating, services, image,
                      ai_hint, description, operating_hours, amenities
               FROM salons WHERE id = ? LIMIT 1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?
        .ok_or(StoreError::NotFound)?;

        row.into_salon()
    }

    async fn insert(&self, salon: Salon) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO salons (id, owner_uid, name, location, rating, services, image,
                                   ai_hint, description, operating_hours, amenities)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&salon.id)
        .bind(&salon.owner_uid)
        .bind(&salon.name)
        .bind(&salon.location)
        .bind(salon.rating)
        .bind(encode_list(&salon.services))
        .bind(&salon.image)
        .bind(&salon.ai_hint)
        .bind(&salon.description)
        .bind(encode_list(&salon.operating_hours))
        .bind(encode_list(&salon.amenities))
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }

    async fn replace(&self, salon: Salon) -> StoreResult<()> {
        let result = sqlx::query(
            r#"UPDATE salons
               SET owner_uid = ?, name = ?, location = ?, rating = ?, services = ?,
                   image = ?, ai_hint = ?, description = ?, operating_hours = ?, amenities = ?
               WHERE id = ?"#,
        )
        .bind(&salon.owner_uid)
        .bind(&salon.name)
        .bind(&salon.location)
        .bind(salon.rating)
        .bind(encode_list(&salon.services))
        .bind(&salon.image)
        .bind(&salon.ai_hint)
        .bind(&salon.description)
        .bind(encode_list(&salon.operating_hours))
        .bind(encode_list(&salon.amenities))
        .bind(&salon.id)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM salons WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceStore for SqliteStore {
    async fn list(&self) -> StoreResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            "SELECT id, name, duration, price, category FROM services ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(rows.into_iter().map(ServiceRow::into_service).collect())
    }

    async fn insert(&self, service: Service) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO services (id, name, duration, price, category)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(&service.duration)
        .bind(&service.price)
        .bind(&service.category)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }

    async fn replace(&self, service: Service) -> StoreResult<()> {
        let result = sqlx::query(
            r#"UPDATE services SET name = ?, duration = ?, price = ?, category = ?
               WHERE id = ?"#,
        )
        .bind(&service.name)
        .bind(&service.duration)
        .bind(&service.price)
        .bind(&service.category)
        .bind(&service.id)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl StaffStore for SqliteStore {
    async fn list(&self, salon_id: Option<&str>) -> StoreResult<Vec<StaffMember>> {
        let rows = match salon_id {
            Some(salon_id) => {
                sqlx::query_as::<_, StaffRow>(
                    r#"SELECT id, salon_id, name, role, email, initials, avatar, ai_hint,
                              provided_services
                       FROM staff WHERE salon_id = ? ORDER BY id"#,
                )
                .bind(salon_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, StaffRow>(
                    r#"SELECT id, salon_id, name, role, email, initials, avatar, ai_hint,
                              provided_services
                       FROM staff ORDER BY id"#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(unavailable)?;

        rows.into_iter().map(StaffRow::into_staff).collect()
    }

    async fn insert(&self, member: StaffMember) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO staff (id, salon_id, name, role, email, initials, avatar, ai_hint,
                                  provided_services)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&member.id)
        .bind(&member.salon_id)
        .bind(&member.name)
        .bind(&member.role)
        .bind(&member.email)
        .bind(&member.initials)
        .bind(&member.avatar)
        .bind(&member.ai_hint)
        .bind(encode_list(&member.provided_services))
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }

    async fn replace(&self, member: StaffMember) -> StoreResult<()> {
        let result = sqlx::query(
            r#"UPDATE staff
               SET salon_id = ?, name = ?, role = ?, email = ?, initials = ?, avatar = ?,
                   ai_hint = ?, provided_services = ?
               WHERE id = ?"#,
        )
        .bind(&member.salon_id)
        .bind(&member.name)
        .bind(&member.role)
        .bind(&member.email)
        .bind(&member.initials)
        .bind(&member.avatar)
        .bind(&member.ai_hint)
        .bind(encode_list(&member.provided_services))
        .bind(&member.id)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM staff WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

const BOOKING_COLUMNS: &str =
    "id, salon_id, customer_name, customer_email, service, date, time, staff, notes";

#[async_trait]
impl BookingStore for SqliteStore {
    async fn list(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        let rows = match (filter.customer_email.as_deref(), filter.salon_id.as_deref()) {
            (Some(email), Some(salon_id)) => {
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings \
                     WHERE customer_email = ? AND salon_id = ? ORDER BY id"
                ))
                .bind(email)
                .bind(salon_id)
                .fetch_all(&self.pool)
                .await
            }
            (Some(email), None) => {
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings WHERE customer_email = ? ORDER BY id"
                ))
                .bind(email)
                .fetch_all(&self.pool)
                .await
            }
            (None, Some(salon_id)) => {
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings WHERE salon_id = ? ORDER BY id"
                ))
                .bind(salon_id)
                .fetch_all(&self.pool)
                .await
            }
            (None, None) => {
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(unavailable)?;

        Ok(rows.into_iter().map(BookingRow::into_booking).collect())
    }

    async fn get(&self, id: &str) -> StoreResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ? LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?
        .ok_or(StoreError::NotFound)?;

        Ok(row.into_booking())
    }

    async fn insert(&self, booking: Booking) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO bookings (id, salon_id, customer_name, customer_email, service,
                                     date, time, staff, notes)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&booking.id)
        .bind(&booking.salon_id)
        .bind(&booking.customer_name)
        .bind(&booking.customer_email)
        .bind(&booking.service)
        .bind(&booking.date)
        .bind(&booking.time)
        .bind(&booking.staff)
        .bind(&booking.notes)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }

    async fn replace(&self, booking: Booking) -> StoreResult<()> {
        let result = sqlx::query(
            r#"UPDATE bookings
               SET salon_id = ?, customer_name = ?, customer_email = ?, service = ?,
                   date = ?, time = ?, staff = ?, notes = ?
               WHERE id = ?"#,
        )
        .bind(&booking.salon_id)
        .bind(&booking.customer_name)
        .bind(&booking.customer_email)
        .bind(&booking.service)
        .bind(&booking.date)
        .bind(&booking.time)
        .bind(&booking.staff)
        .bind(&booking.notes)
        .bind(&booking.id)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn set(&self, profile: UserProfile) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"INSERT INTO profiles (uid, first_name, last_name, email, role, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(uid) DO UPDATE SET
                   first_name = excluded.first_name,
                   last_name = excluded.last_name,
                   email = excluded.email,
                   role = excluded.role,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&profile.uid)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(profile.role.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }

    async fn get(&self, uid: &str) -> StoreResult<ProfileRecord> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"SELECT uid, first_name, last_name, email, role, created_at, updated_at
               FROM profiles WHERE uid = ? LIMIT 1"#,
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?
        .ok_or(StoreError::NotFound)?;

        row.into_record()
    }
}
