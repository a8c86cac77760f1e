use std::sync::Arc;

use common::storage::ImageStore;

use crate::config::AppConfig;
use crate::repository::ItemRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub items: Arc<dyn ItemRepository>,
    pub images: Arc<dyn ImageStore>,
}
