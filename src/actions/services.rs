use crate::error::ActionError;
use crate::models::{Service, ServiceInput};
use crate::schema;
use crate::store::{new_id, StoreError, Stores};

fn store_err(err: StoreError) -> ActionError {
    ActionError::from_store(err, "service")
}

pub async fn list(stores: &Stores) -> Result<Vec<Service>, ActionError> {
    stores.services.list().await.map_err(store_err)
}

pub async fn add(stores: &Stores, input: ServiceInput) -> Result<Service, ActionError> {
    let service = schema::new_service(input, new_id())?;
    stores
        .services
        .insert(service.clone())
        .await
        .map_err(store_err)?;
    Ok(service)
}

pub async fn update(stores: &Stores, input: ServiceInput) -> Result<Service, ActionError> {
    let service = schema::existing_service(input)?;
    stores
        .services
        .replace(service.clone())
        .await
        .map_err(store_err)?;
    Ok(service)
}

pub async fn delete(stores: &Stores, id: &str) -> Result<(), ActionError> {
    stores.services.remove(id).await.map_err(store_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ServiceInput {
        ServiceInput {
            name: Some("Classic Haircut".to_string()),
            duration: Some("45 min".to_string()),
            price: Some("$40".to_string()),
            category: Some("Hair".to_string()),
            ..ServiceInput::default()
        }
    }

    #[actix_web::test]
    async fn add_then_list_round_trips() {
        let stores = Stores::memory();
        let service = add(&stores, valid_input()).await.unwrap();
        assert!(!service.id.is_empty());
        assert_eq!(list(&stores).await.unwrap(), vec![service]);
    }

    #[actix_web::test]
    async fn add_missing_fields_fails_and_collection_is_unchanged() {
        let stores = Stores::memory();
        let err = add(&stores, ServiceInput::default()).await.unwrap_err();

        match err {
            ActionError::Validation(fields) => {
                assert_eq!(fields.len(), 4);
                for field in ["name", "duration", "price", "category"] {
                    assert!(fields.contains(field), "missing {field}");
                }
            }
            other => panic!("expected validation, got {other:?}"),
        }
        assert!(list(&stores).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn update_without_id_is_a_validation_error() {
        let stores = Stores::memory();
        let err = update(&stores, valid_input()).await.unwrap_err();
        match err {
            ActionError::Validation(fields) => assert!(fields.contains("id")),
            other => panic!("expected validation, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn update_unknown_id_is_not_found() {
        let stores = Stores::memory();
        let mut input = valid_input();
        input.id = Some("ghost".to_string());
        let err = update(&stores, input).await.unwrap_err();
        assert_eq!(err, ActionError::NotFound { what: "service" });
    }

    #[actix_web::test]
    async fn delete_shrinks_the_collection_by_one() {
        let stores = Stores::memory();
        let service = add(&stores, valid_input()).await.unwrap();
        add(&stores, valid_input()).await.unwrap();

        delete(&stores, &service.id).await.unwrap();
        let listed = list(&stores).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|s| s.id != service.id));
    }
}
