//! Dashboard state and the refresh / generate flows.
//!
//! [`Dashboard`] is the only owner of [`ViewState`]. Both flows take
//! `&mut self`, so a refresh can never interleave with a generation or with
//! another refresh.

use super::error::IndicatorError;
use super::indicator::{IndicatorKind, IndicatorRecord, IndicatorSource};
use serde_json::Value;
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const CONNECTION_ERROR_MESSAGE: &str =
    "Connection error. Check that the indicators backend is running.";
pub const FORMAT_ERROR_MESSAGE: &str = "The backend returned data in an unexpected format.";

const DEFAULT_GENERATION_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Newest first.
    pub records: Vec<IndicatorRecord>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

pub struct Dashboard {
    source: Arc<dyn IndicatorSource>,
    state: ViewState,
    generation_delay: Duration,
}

impl Dashboard {
    pub fn new(source: Arc<dyn IndicatorSource>) -> Self {
        Dashboard {
            source,
            state: ViewState::default(),
            generation_delay: DEFAULT_GENERATION_DELAY,
        }
    }

    /// Sets how long to wait after a generation request before reloading.
    pub fn with_generation_delay(mut self, delay: Duration) -> Self {
        self.generation_delay = delay;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Reloads every record from the source.
    ///
    /// Any failure keeps the records already on screen and only sets `last_error`.
    pub async fn refresh(&mut self) {
        self.state.is_loading = true;
        debug!("Refreshing indicators");

        match self.source.fetch_indicators().await {
            Ok(mut records) => {
                sort_newest_first(&mut records);
                info!(count = records.len(), "Loaded indicators");
                self.state.records = records;
                self.state.last_error = None;
            }
            Err(e @ IndicatorError::FormatMismatch(_)) => {
                warn!(error = %e, "Unreadable indicator payload, keeping previous data");
                self.state.last_error = Some(FORMAT_ERROR_MESSAGE.to_string());
            }
            Err(e) => {
                warn!(error = %e, "Failed to load indicators, keeping previous data");
                self.state.last_error = Some(CONNECTION_ERROR_MESSAGE.to_string());
            }
        }

        self.state.is_loading = false;
    }

    /// Asks the source for today's UF, waits for the backend to settle, then refreshes.
    ///
    /// On failure nothing is reloaded and the error is handed back so the caller
    /// can tell the user their request did not go through.
    pub async fn generate_today(&mut self) -> Result<Value, IndicatorError> {
        self.state.is_loading = true;
        info!("Requesting today's UF value");

        match self.source.trigger_generation().await {
            Ok(echo) => {
                debug!(?echo, delay = ?self.generation_delay, "UF generation accepted");
                tokio::time::sleep(self.generation_delay).await;
                self.refresh().await;
                Ok(echo)
            }
            Err(e) => {
                warn!(error = %e, "UF generation failed");
                self.state.is_loading = false;
                Err(e)
            }
        }
    }

    /// Most recent record of `kind`, relying on the newest-first ordering.
    pub fn latest_of(&self, kind: &IndicatorKind) -> Option<&IndicatorRecord> {
        self.state.records.iter().find(|r| &r.kind == kind)
    }
}

/// Stable sort by date, newest first. Records without a readable date go last.
pub fn sort_newest_first(records: &mut [IndicatorRecord]) {
    records.sort_by_key(|r| Reverse(r.date()));
}
