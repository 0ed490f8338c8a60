use crate::modules::attendance::store::DataStore;
use crate::shared::infrastructure::document_storage::DocumentStorage;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedStore = Arc<Mutex<DataStore<Arc<dyn DocumentStorage>>>>;

/// Handlers serialize on the store lock; every mutation is a whole-document write.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: DataStore<Arc<dyn DocumentStorage>>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
