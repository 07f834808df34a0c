//! Application state shared across handlers

use std::sync::Arc;

use crate::db::{Database, MySqlSchoolRepo, SchoolStore};
use crate::media::MediaStore;
use crate::service::SchoolService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    service: SchoolService,
    database: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(store: Arc<dyn SchoolStore>, media: Arc<dyn MediaStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                service: SchoolService::new(store, media),
                database: None,
            }),
        }
    }

    /// State backed by the MySQL school repository
    pub fn mysql(database: Arc<Database>, media: Arc<dyn MediaStore>) -> Self {
        let repo = MySqlSchoolRepo::new(database.clone());
        Self {
            inner: Arc::new(AppStateInner {
                service: SchoolService::new(Arc::new(repo), media),
                database: Some(database),
            }),
        }
    }

    pub fn service(&self) -> &SchoolService {
        &self.inner.service
    }

    pub fn database_ready(&self) -> bool {
        self.inner
            .database
            .as_ref()
            .is_some_and(|db| db.is_ready())
    }
}
