use crate::clock::Clock;
use crate::constants::*;
use crate::error::{BuddiesError, Result};
use crate::paths;
use crate::voter::Voter;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Alerting preferences and staleness bookkeeping for one voter. One
/// profile per voter, keyed by the voter's slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub slug: String,
    #[serde(default)]
    pub always_alert: bool,
    #[serde(default)]
    pub never_alert: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_viewed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_alerted: Option<DateTime<Utc>>,

    /// Whole days since the voter last saw or was sent their digest.
    #[serde(default)]
    pub staleness: i64,
    /// Cached result of the alert policy as of `refreshed_at`.
    #[serde(default)]
    pub will_alert: bool,
    /// When the cached staleness/alert fields were last recomputed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(slug: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            slug: slug.into(),
            always_alert: false,
            never_alert: false,
            last_viewed: None,
            last_alerted: None,
            staleness: 0,
            will_alert: false,
            refreshed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let path = paths::profile_path(root, slug);
        if !path.exists() {
            return Err(BuddiesError::ProfileNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let profile: Profile = serde_yaml::from_str(&data)?;
        Ok(profile)
    }

    /// Load the voter's profile, creating a fresh one the first time.
    pub fn load_or_create(root: &Path, slug: &str, clock: &dyn Clock) -> Result<Self> {
        match Self::load(root, slug) {
            Ok(profile) => Ok(profile),
            Err(BuddiesError::ProfileNotFound(_)) => {
                let profile = Self::new(slug, clock.now());
                profile.save(root)?;
                Ok(profile)
            }
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::profile_path(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let profiles_dir = root.join(paths::PROFILES_DIR);
        if !profiles_dir.exists() {
            return Ok(Vec::new());
        }
        let mut profiles = Vec::new();
        for entry in std::fs::read_dir(&profiles_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(p) => profiles.push(p),
                    Err(BuddiesError::ProfileNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        profiles.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(profiles)
    }

    // ---------------------------------------------------------------------------
    // Staleness policy
    // ---------------------------------------------------------------------------

    /// Days since the voter last engaged with their digest, measured
    /// from the most recent of viewed/alerted, or account creation.
    pub fn compute_staleness(&self, clock: &dyn Clock) -> i64 {
        let anchor = [self.last_viewed, self.last_alerted]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(self.created_at);
        (clock.now() - anchor).num_days()
    }

    /// The tiered alert decision. Opt-out and opt-in override
    /// everything; otherwise the threshold depends on how much the
    /// voter still has to do and how close the election is.
    pub fn should_alert(&self, voter: &Voter, clock: &dyn Clock) -> bool {
        if self.never_alert {
            return false;
        }
        if self.always_alert {
            return true;
        }
        // Reminders about a status nobody has verified recently would
        // just be noise.
        let verified = voter
            .fetched_at
            .map(|at| clock.now() - at <= Duration::days(VERIFIED_WITHIN_DAYS))
            .unwrap_or(false);
        if !verified {
            return false;
        }

        let staleness = self.compute_staleness(clock);
        if !voter.complete() {
            return staleness >= INCOMPLETE_ALERT_DAYS;
        }

        let progress = voter.progress(clock.today());
        if progress.actions() == 0 {
            return staleness >= IDLE_ALERT_DAYS;
        }

        let election_days = progress.election.days(clock.today());
        let threshold = if progress.election.date.is_some()
            && (0..ABSENTEE_WARNING_DAYS).contains(&election_days)
        {
            ELECTION_SOON_ALERT_DAYS
        } else {
            PENDING_ALERT_DAYS
        };
        staleness >= threshold
    }

    /// Recompute the cached staleness and alert decision.
    pub fn refresh(&mut self, voter: &Voter, clock: &dyn Clock) {
        self.staleness = self.compute_staleness(clock);
        self.will_alert = self.should_alert(voter, clock);
        self.refreshed_at = Some(clock.now());
        self.updated_at = clock.now();
    }

    /// The voter looked at their own digest. Returns true when the open
    /// draft should be dismissed as read.
    pub fn mark_viewed(&mut self, clock: &dyn Clock) -> bool {
        self.last_viewed = Some(clock.now());
        self.staleness = 0;
        self.updated_at = clock.now();
        !self.always_alert
    }

    /// A digest email went out to this voter.
    pub fn mark_alerted(&mut self, clock: &dyn Clock) {
        self.last_alerted = Some(clock.now());
        self.staleness = 0;
        self.will_alert = false;
        self.updated_at = clock.now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
