use crate::models::Records;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub records_path: PathBuf,
    pub records: Arc<Mutex<Records>>,
}

impl AppState {
    pub fn new(records_path: PathBuf, records: Records) -> Self {
        Self {
            records_path,
            records: Arc::new(Mutex::new(records)),
        }
    }
}
