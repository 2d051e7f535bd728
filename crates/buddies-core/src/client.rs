use crate::constants::STATUS_API;
use crate::error::{BuddiesError, Result};
use crate::status::{Election, RawStatus};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// StatusClient
// ---------------------------------------------------------------------------

/// Identity fields required to look up one voter's registration.
#[derive(Debug, Clone)]
pub struct StatusQuery {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub zip_code: String,
}

/// Result of one status lookup. `Processing` means the provider accepted
/// the query but hasn't scraped the record yet; `Unavailable` covers
/// everything that should be retried on a later run.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Current(RawStatus),
    Processing(String),
    Unavailable,
}

pub struct StatusClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl StatusClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(STATUS_API)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| BuddiesError::Status(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Look up one voter. A 202 means the record is still being scraped;
    /// any other non-200 is reported as unavailable rather than an error
    /// so a flaky provider never aborts a batch run.
    pub fn fetch_status(&self, query: &StatusQuery) -> Result<FetchOutcome> {
        let url = format!("{}/registrations/", self.base_url);
        debug!(first_name = %query.first_name, last_name = %query.last_name, "fetching status");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("first_name", query.first_name.as_str()),
                ("last_name", query.last_name.as_str()),
                ("birth_date", &query.birth_date.format("%Y-%m-%d").to_string()),
                ("zip_code", query.zip_code.as_str()),
            ])
            .send()
            .map_err(|e| BuddiesError::Status(e.to_string()))?;

        let code = response.status();
        if code.as_u16() == 202 {
            let raw: RawStatus = response.json().unwrap_or_default();
            let message = raw
                .message
                .unwrap_or_else(|| "registration is being processed".to_string());
            return Ok(FetchOutcome::Processing(message));
        }
        if !code.is_success() {
            warn!(status = %code, "status provider returned an error");
            return Ok(FetchOutcome::Unavailable);
        }
        let raw: RawStatus = response
            .json()
            .map_err(|e| BuddiesError::Status(e.to_string()))?;
        Ok(FetchOutcome::Current(raw))
    }

    /// Elections known to the provider, used to skip batch refreshes
    /// when nothing is on the calendar.
    pub fn elections(&self) -> Result<Vec<Election>> {
        let url = format!("{}/elections/", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| BuddiesError::Status(e.to_string()))?;
        if !response.status().is_success() {
            return Err(BuddiesError::Status(format!(
                "elections request failed with {}",
                response.status()
            )));
        }
        let page: ElectionsPage = response
            .json()
            .map_err(|e| BuddiesError::Status(e.to_string()))?;
        Ok(page.results)
    }

    pub fn has_upcoming_election(&self, today: NaiveDate) -> Result<bool> {
        let elections = self.elections()?;
        Ok(elections
            .iter()
            .filter_map(|e| e.date())
            .any(|date| date >= today))
    }
}

#[derive(Debug, Deserialize)]
struct ElectionsPage {
    #[serde(default)]
    results: Vec<Election>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
