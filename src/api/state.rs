use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::enrich::ProfileLookup;
use crate::fetch::Fetcher;
use crate::models::RecordSnapshot;

#[derive(Clone)]
pub struct AppState {
    /// Current snapshot; a refresh swaps the inner Arc.
    pub snapshot: Arc<RwLock<Arc<RecordSnapshot>>>,
    pub config: Arc<AppConfig>,
    pub fetcher: Fetcher,
    pub profile_lookup: Option<Arc<dyn ProfileLookup>>,
}

impl AppState {
    pub fn new(config: AppConfig, snapshot: RecordSnapshot, fetcher: Fetcher) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            config: Arc::new(config),
            fetcher,
            profile_lookup: None,
        }
    }

    pub fn with_profile_lookup(mut self, lookup: Arc<dyn ProfileLookup>) -> Self {
        self.profile_lookup = Some(lookup);
        self
    }

    /// The snapshot readers should compute from.
    pub async fn current(&self) -> Arc<RecordSnapshot> {
        self.snapshot.read().await.clone()
    }

    pub async fn replace(&self, snapshot: RecordSnapshot) -> Arc<RecordSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.snapshot.write().await = snapshot.clone();
        snapshot
    }

    pub fn profile_url(&self, user_id: &str) -> String {
        format!(
            "{}/profile/{}",
            self.config.profile.base_url.trim_end_matches('/'),
            user_id
        )
    }
}
