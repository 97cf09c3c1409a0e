use crate::error::ActionError;
use crate::models::{ProfileInput, ProfileRecord};
use crate::schema;
use crate::store::{StoreError, Stores};

fn store_err(err: StoreError) -> ActionError {
    ActionError::from_store(err, "profile")
}

/// Merge-write keyed on `uid`. First write creates the record, later writes
/// overwrite the profile fields and leave `createdAt` alone.
pub async fn set(stores: &Stores, input: ProfileInput) -> Result<(), ActionError> {
    let profile = schema::profile(input)?;
    stores.profiles.set(profile).await.map_err(store_err)
}

pub async fn get(stores: &Stores, uid: &str) -> Result<ProfileRecord, ActionError> {
    let record = stores.profiles.get(uid).await.map_err(store_err)?;

    // A stored profile that no longer passes validation is corruption, not
    // caller error.
    schema::check_profile(&record.profile).map_err(ActionError::UpstreamData)?;
    Ok(record)
}
