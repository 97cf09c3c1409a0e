use crate::error::ActionError;
use crate::models::{Salon, SalonInput};
use crate::schema;
use crate::store::{new_id, StoreError, Stores};

fn store_err(err: StoreError) -> ActionError {
    ActionError::from_store(err, "salon")
}

pub async fn list(stores: &Stores, owner_uid: Option<&str>) -> Result<Vec<Salon>, ActionError> {
    stores.salons.list(owner_uid).await.map_err(store_err)
}

pub async fn get(stores: &Stores, id: &str) -> Result<Salon, ActionError> {
    stores.salons.get(id).await.map_err(store_err)
}

pub async fn add(stores: &Stores, input: SalonInput) -> Result<Salon, ActionError> {
    let salon = schema::new_salon(input, new_id())?;
    stores
        .salons
        .insert(salon.clone())
        .await
        .map_err(store_err)?;
    Ok(salon)
}

pub async fn update(stores: &Stores, input: SalonInput) -> Result<Salon, ActionError> {
    let salon = schema::existing_salon(input)?;
    stores
        .salons
        .replace(salon.clone())
        .await
        .map_err(store_err)?;
    Ok(salon)
}

pub async fn delete(stores: &Stores, id: &str) -> Result<(), ActionError> {
    stores.salons.remove(id).await.map_err(store_err)
}
