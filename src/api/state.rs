use std::sync::Arc;

use derive_new::new;

use crate::store::Store;

/// Shared handler state: the persistence router chosen at startup.
#[derive(Debug, Clone, new)]
pub struct App {
    pub store: Arc<Store>,
}
