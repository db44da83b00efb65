use crate::FilterListUpdateJob;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Spawns the registered background jobs with a shared shutdown token.
pub struct JobRunner {
    filterlist_update: Option<FilterListUpdateJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            filterlist_update: None,
            shutdown: None,
        }
    }

    pub fn with_filterlist_update(mut self, job: FilterListUpdateJob) -> Self {
        self.filterlist_update = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(mut job) = self.filterlist_update {
            if let Some(token) = &self.shutdown {
                job = job.with_cancellation(token.clone());
            }
            tokio::spawn(Arc::new(job).start());
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
