use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{Booking, ProfileRecord, Salon, Service, StaffMember, UserProfile};
use crate::store::{
    BookingFilter, BookingStore, ProfileStore, SalonStore, ServiceStore, StaffStore, StoreError,
    StoreResult,
};

/// In-process backend. Collections live for the lifetime of this value, so a
/// fresh store per test starts empty and shares nothing.
#[derive(Default)]
pub struct MemoryStore {
    salons: RwLock<Vec<Salon>>,
    services: RwLock<Vec<Service>>,
    staff: RwLock<Vec<StaffMember>>,
    bookings: RwLock<Vec<Booking>>,
    profiles: RwLock<HashMap<String, ProfileRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> StoreResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> StoreResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
}

trait HasId {
    fn id(&self) -> &str;
}

impl HasId for Salon {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for Service {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for StaffMember {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for Booking {
    fn id(&self) -> &str {
        &self.id
    }
}

// Replace swaps the record in place so the collection keeps insertion order.
fn replace_in<T: HasId>(items: &mut [T], item: T) -> StoreResult<()> {
    match items.iter_mut().find(|stored| stored.id() == item.id()) {
        Some(slot) => {
            *slot = item;
            Ok(())
        }
        None => Err(StoreError::NotFound),
    }
}

fn remove_from<T: HasId>(items: &mut Vec<T>, id: &str) -> StoreResult<()> {
    let before = items.len();
    items.retain(|stored| stored.id() != id);
    if items.len() == before {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl SalonStore for MemoryStore {
    async fn list(&self, owner_uid: Option<&str>) -> StoreResult<Vec<Salon>> {
        let salons = read(&self.salons)?;
        Ok(match owner_uid {
            Some(owner) => salons
                .iter()
                .filter(|salon| salon.owner_uid.as_deref() == Some(owner))
                .cloned()
                .collect(),
            None => salons.clone(),
        })
    }

    async fn get(&self, id: &str) -> StoreResult<Salon> {
        read(&self.salons)?
            .iter()
            .find(|salon| salon.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, salon: Salon) -> StoreResult<()> {
        write(&self.salons)?.push(salon);
        Ok(())
    }

    async fn replace(&self, salon: Salon) -> StoreResult<()> {
        replace_in(&mut write(&self.salons)?, salon)
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        remove_from(&mut *write(&self.salons)?, id)
    }
}

#[async_trait]
impl ServiceStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Service>> {
        Ok(read(&self.services)?.clone())
    }

    async fn insert(&self, service: Service) -> StoreResult<()> {
        write(&self.services)?.push(service);
        Ok(())
    }

    async fn replace(&self, service: Service) -> StoreResult<()> {
        replace_in(&mut write(&self.services)?, service)
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        remove_from(&mut *write(&self.services)?, id)
    }
}

#[async_trait]
impl StaffStore for MemoryStore {
    async fn list(&self, salon_id: Option<&str>) -> StoreResult<Vec<StaffMember>> {
        let staff = read(&self.staff)?;
        Ok(match salon_id {
            Some(salon_id) => staff
                .iter()
                .filter(|member| member.salon_id == salon_id)
                .cloned()
                .collect(),
            None => staff.clone(),
        })
    }

    async fn insert(&self, member: StaffMember) -> StoreResult<()> {
        write(&self.staff)?.push(member);
        Ok(())
    }

    async fn replace(&self, member: StaffMember) -> StoreResult<()> {
        replace_in(&mut write(&self.staff)?, member)
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        remove_from(&mut *write(&self.staff)?, id)
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn list(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        Ok(read(&self.bookings)?
            .iter()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> StoreResult<Booking> {
        read(&self.bookings)?
            .iter()
            .find(|booking| booking.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, booking: Booking) -> StoreResult<()> {
        write(&self.bookings)?.push(booking);
        Ok(())
    }

    async fn replace(&self, booking: Booking) -> StoreResult<()> {
        replace_in(&mut write(&self.bookings)?, booking)
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        remove_from(&mut *write(&self.bookings)?, id)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn set(&self, profile: UserProfile) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        let mut profiles = write(&self.profiles)?;
        match profiles.get_mut(&profile.uid) {
            Some(record) => {
                record.profile = profile;
                record.updated_at = now;
            }
            None => {
                profiles.insert(
                    profile.uid.clone(),
                    ProfileRecord {
                        profile,
                        created_at: now.clone(),
                        updated_at: now,
                    },
                );
            }
        }
        Ok(())
    }

    async fn get(&self, uid: &str) -> StoreResult<ProfileRecord> {
        read(&self.profiles)?
            .get(uid)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}
