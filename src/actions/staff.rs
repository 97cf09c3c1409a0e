use crate::error::ActionError;
use crate::models::{StaffInput, StaffMember};
use crate::schema;
use crate::store::{new_id, StoreError, Stores};

fn store_err(err: StoreError) -> ActionError {
    ActionError::from_store(err, "staff member")
}

pub async fn list(
    stores: &Stores,
    salon_id: Option<&str>,
) -> Result<Vec<StaffMember>, ActionError> {
    stores.staff.list(salon_id).await.map_err(store_err)
}

pub async fn add(stores: &Stores, input: StaffInput) -> Result<StaffMember, ActionError> {
    let member = schema::new_staff(input, new_id())?;
    stores
        .staff
        .insert(member.clone())
        .await
        .map_err(store_err)?;
    Ok(member)
}

pub async fn update(stores: &Stores, input: StaffInput) -> Result<StaffMember, ActionError> {
    let member = schema::existing_staff(input)?;
    stores
        .staff
        .replace(member.clone())
        .await
        .map_err(store_err)?;
    Ok(member)
}

pub async fn delete(stores: &Stores, id: &str) -> Result<(), ActionError> {
    stores.staff.remove(id).await.map_err(store_err)
}
