use std::path::PathBuf;
use std::sync::Arc;

use crate::app::ports::{DataSource, UserStore};
use crate::app::{ProjectionsUseCase, SessionService};

/// Services shared by every handler. Nothing here holds request data.
#[derive(Clone)]
pub struct AppState {
    pub projections: Arc<ProjectionsUseCase>,
    pub sessions: Arc<SessionService>,
    pub blog_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        source: Arc<dyn DataSource>,
        users: Arc<dyn UserStore>,
        blog_dir: PathBuf,
        static_dir: PathBuf,
    ) -> Self {
        Self {
            projections: Arc::new(ProjectionsUseCase::new(source)),
            sessions: Arc::new(SessionService::new(users)),
            blog_dir,
            static_dir,
        }
    }
}
