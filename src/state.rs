use crate::recommend::Recommender;
use crate::store::Stores;

#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub recommender: Recommender,
}
