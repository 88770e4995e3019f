use crate::store::Store;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handle to the one store instance, shared by the timer and the views.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
