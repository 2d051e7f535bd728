use crate::client::{FetchOutcome, StatusClient, StatusQuery};
use crate::clock::Clock;
use crate::constants::FETCH_COOLDOWN_MINUTES;
use crate::error::{BuddiesError, Result};
use crate::parser::ParseOverlay;
use crate::paths;
use crate::progress::Progress;
use crate::status::RawStatus;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_STATE: &str = "Michigan";

/// Addresses under this domain are seeded demo accounts; they never
/// hit the status provider and never receive mail.
pub const TEST_EMAIL_DOMAIN: &str = "@example.com";

// ---------------------------------------------------------------------------
// Voter
// ---------------------------------------------------------------------------

/// One tracked voter: identity, the last raw status payload, manual
/// confirmations, and the social graph edges pointing at other voters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voter {
    pub slug: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default = "default_state")]
    pub state: String,

    /// Last payload fetched from the status provider, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RawStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,

    // Manual confirmations, self-reported through the CLI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voted: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ballot_url: Option<String>,
    #[serde(default)]
    pub ballot_shared: bool,
    #[serde(default = "default_true")]
    pub absentee: bool,

    // Social graph, by voter slug.
    #[serde(default)]
    pub friends: Vec<String>,
    #[serde(default)]
    pub neighbors: Vec<String>,
    #[serde(default)]
    pub strangers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_state() -> String {
    DEFAULT_STATE.to_string()
}

fn default_true() -> bool {
    true
}

impl Voter {
    pub fn new(
        slug: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date: None,
            zip_code: None,
            state: default_state(),
            status: None,
            fetched_at: None,
            voted: None,
            returned: None,
            ballot_url: None,
            ballot_shared: false,
            absentee: true,
            friends: Vec::new(),
            neighbors: Vec::new(),
            strangers: Vec::new(),
            referrer: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// All the identity fields the status provider needs.
    pub fn complete(&self) -> bool {
        !self.first_name.is_empty()
            && !self.last_name.is_empty()
            && self.birth_date.is_some()
            && self.zip_code.is_some()
    }

    pub fn is_test_voter(&self) -> bool {
        self.email.ends_with(TEST_EMAIL_DOMAIN)
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(
        root: &Path,
        slug: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        let dir = paths::voter_dir(root, &slug);
        if dir.exists() {
            return Err(BuddiesError::VoterExists(slug));
        }

        let voter = Self::new(slug, email, first_name, last_name);
        voter.save(root)?;
        Ok(voter)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let path = paths::voter_path(root, slug);
        if !path.exists() {
            return Err(BuddiesError::VoterNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let voter: Voter = serde_yaml::from_str(&data)?;
        Ok(voter)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let mut record = self.clone();
        // A voter can never be their own friend, neighbor, or stranger.
        record.friends.retain(|s| s != &record.slug);
        record.neighbors.retain(|s| s != &record.slug);
        record.strangers.retain(|s| s != &record.slug);

        let path = paths::voter_path(root, &self.slug);
        let data = serde_yaml::to_string(&record)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let voters_dir = root.join(paths::VOTERS_DIR);
        if !voters_dir.exists() {
            return Ok(Vec::new());
        }

        let mut voters = Vec::new();
        for entry in std::fs::read_dir(&voters_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(v) => voters.push(v),
                    Err(BuddiesError::VoterNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        voters.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(voters)
    }

    /// Make two voters friends of each other, dropping any weaker edge.
    pub fn link(root: &Path, a: &str, b: &str) -> Result<()> {
        let mut first = Self::load(root, a)?;
        let mut second = Self::load(root, b)?;
        first.add_friend(&second.slug);
        second.add_friend(&first.slug);
        first.save(root)?;
        second.save(root)?;
        Ok(())
    }

    pub fn add_friend(&mut self, slug: &str) -> bool {
        if slug == self.slug || self.friends.iter().any(|s| s == slug) {
            return false;
        }
        self.neighbors.retain(|s| s != slug);
        self.strangers.retain(|s| s != slug);
        self.friends.push(slug.to_string());
        self.updated_at = Utc::now();
        true
    }

    // ---------------------------------------------------------------------------
    // Progress
    // ---------------------------------------------------------------------------

    fn overlay(&self) -> ParseOverlay {
        ParseOverlay {
            voted: self.voted,
            completed_ballot: self.ballot_url.is_some(),
            shared_ballot: self.ballot_shared,
            returned: self.returned,
        }
    }

    pub fn progress(&self, today: NaiveDate) -> Progress {
        let raw = self.status.clone().unwrap_or_default();
        let mut progress = Progress::parse(&raw, &self.overlay(), today);
        if self.state != DEFAULT_STATE {
            progress = progress.with_out_of_state(&self.state);
        }
        if !self.absentee {
            progress = progress.without_absentee();
        }
        progress
    }

    /// One-line activity summary for digests.
    pub fn activity(&self, today: NaiveDate) -> String {
        let fragment = self
            .progress(today)
            .most_advanced()
            .and_then(|m| m.activity_label())
            .unwrap_or("started following you");
        format!("{} {}", self.display_name(), fragment)
    }

    // ---------------------------------------------------------------------------
    // Status refresh
    // ---------------------------------------------------------------------------

    /// Refresh this voter's status from the provider. Returns true only
    /// when a new payload differs from the stored one. Skips silently
    /// for out-of-state voters, test voters, incomplete records, and
    /// anyone fetched inside the cool-down window.
    pub fn update_status(&mut self, client: &StatusClient, clock: &dyn Clock) -> Result<bool> {
        if self.state != DEFAULT_STATE {
            debug!(slug = %self.slug, state = %self.state, "skipping out-of-state voter");
            return Ok(false);
        }
        if self.is_test_voter() {
            debug!(slug = %self.slug, "skipping test voter");
            return Ok(false);
        }
        if !self.complete() {
            debug!(slug = %self.slug, "skipping incomplete voter");
            return Ok(false);
        }
        let now = clock.now();
        if let Some(fetched_at) = self.fetched_at {
            if now - fetched_at < Duration::minutes(FETCH_COOLDOWN_MINUTES) {
                debug!(slug = %self.slug, "skipping recently fetched voter");
                return Ok(false);
            }
        }

        let query = StatusQuery {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date: self.birth_date.unwrap_or_default(),
            zip_code: self.zip_code.clone().unwrap_or_default(),
        };
        match client.fetch_status(&query)? {
            FetchOutcome::Current(raw) => {
                let changed = self.status.as_ref() != Some(&raw);
                self.status = Some(raw);
                self.fetched_at = Some(now);
                self.updated_at = now;
                if changed {
                    info!(slug = %self.slug, "voter status changed");
                }
                Ok(changed)
            }
            FetchOutcome::Processing(message) => {
                // The provider is still scraping; whatever we fetched
                // before stays authoritative until a 200 replaces it.
                info!(slug = %self.slug, %message, "status still processing");
                self.fetched_at = Some(now);
                self.updated_at = now;
                Ok(false)
            }
            FetchOutcome::Unavailable => Ok(false),
        }
    }

    // ---------------------------------------------------------------------------
    // Recommendations
    // ---------------------------------------------------------------------------

    /// Recommend friends-of-friends as neighbors, up to `limit` new
    /// entries. Anyone already related to this voter is excluded, as is
    /// any voter with an incomplete record.
    pub fn update_neighbors(&mut self, root: &Path, limit: usize) -> Result<usize> {
        let mut added = 0;
        for friend_slug in self.friends.clone() {
            let Ok(friend) = Self::load(root, &friend_slug) else {
                continue;
            };
            for candidate_slug in friend.friends {
                if added >= limit {
                    return Ok(added);
                }
                if candidate_slug == self.slug
                    || self.friends.iter().any(|s| s == &candidate_slug)
                    || self.neighbors.iter().any(|s| s == &candidate_slug)
                    || self.strangers.iter().any(|s| s == &candidate_slug)
                {
                    continue;
                }
                let Ok(candidate) = Self::load(root, &candidate_slug) else {
                    continue;
                };
                if !candidate.complete() {
                    continue;
                }
                self.neighbors.push(candidate_slug);
                self.updated_at = Utc::now();
                added += 1;
            }
        }
        Ok(added)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
