use crate::clock::Clock;
use crate::constants::{DIGEST_NEIGHBOR_CAP, DIGEST_TOTAL_CAP};
use crate::error::{BuddiesError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// ---------------------------------------------------------------------------
// Activity entries
// ---------------------------------------------------------------------------

/// Where a digest line came from. Friend activity is always worth
/// including; neighbor activity only pads out an otherwise short digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    Friend,
    Neighbor,
}

/// One line of activity, keyed by the friend it describes. A friend
/// appears at most once per digest; fresh activity replaces their
/// previous line instead of stacking up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub friend: String,
    pub line: String,
    pub source: ActivitySource,
}

// ---------------------------------------------------------------------------
// DigestMessage
// ---------------------------------------------------------------------------

/// The accumulating digest for one profile. At most one open draft
/// exists per profile at a time: it lives at a fixed `draft.yaml` path,
/// and closing it (sent or read) moves it to a timestamped archive file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestMessage {
    pub profile: String,
    #[serde(default)]
    pub activity: Vec<ActivityEntry>,
    #[serde(default)]
    pub sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DigestMessage {
    fn new(profile: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            profile: profile.into(),
            activity: Vec::new(),
            sent: false,
            sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// The open draft for a profile, created empty if none exists.
    pub fn draft(root: &Path, profile: &str, clock: &dyn Clock) -> Result<Self> {
        let path = paths::draft_path(root, profile);
        if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            let digest: DigestMessage = serde_yaml::from_str(&data)?;
            return Ok(digest);
        }
        let digest = Self::new(profile, clock.now());
        digest.save(root)?;
        Ok(digest)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        if self.sent {
            return Err(BuddiesError::DigestSent);
        }
        let path = paths::draft_path(root, &self.profile);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Close the draft as delivered, archiving it beside the draft path.
    pub fn mark_sent(&mut self, root: &Path, clock: &dyn Clock) -> Result<()> {
        self.close(root, clock, "sent", true)
    }

    /// Close the draft as seen by the voter without an email going out.
    /// Distinguished from a real send by the missing `sent_at`.
    pub fn mark_read(&mut self, root: &Path, clock: &dyn Clock) -> Result<()> {
        self.close(root, clock, "read", false)
    }

    fn close(&mut self, root: &Path, clock: &dyn Clock, label: &str, delivered: bool) -> Result<()> {
        if self.sent {
            return Err(BuddiesError::DigestSent);
        }
        let now = clock.now();
        self.sent = true;
        self.sent_at = delivered.then_some(now);
        self.updated_at = now;

        let archive = paths::message_dir(root, &self.profile)
            .join(format!("{label}-{}.yaml", now.format("%Y%m%dT%H%M%S")));
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&archive, data.as_bytes())?;

        let draft = paths::draft_path(root, &self.profile);
        if draft.exists() {
            std::fs::remove_file(&draft)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Activity
    // ---------------------------------------------------------------------------

    /// Upsert one friend's activity line, enforcing the capacity
    /// policy. Returns false when nothing changed: the friend's line is
    /// already current, neighbor chatter stops once the digest has a
    /// few entries, and a full digest takes nothing new.
    pub fn add_activity(
        &mut self,
        friend: &str,
        line: &str,
        source: ActivitySource,
        clock: &dyn Clock,
    ) -> bool {
        if self.sent {
            return false;
        }
        if let Some(entry) = self.activity.iter_mut().find(|e| e.friend == friend) {
            if entry.line == line {
                return false;
            }
            entry.line = line.to_string();
            entry.source = source;
            self.updated_at = clock.now();
            return true;
        }
        if source == ActivitySource::Neighbor && self.activity.len() >= DIGEST_NEIGHBOR_CAP {
            debug!(profile = %self.profile, "digest full for neighbor activity");
            return false;
        }
        if self.activity.len() >= DIGEST_TOTAL_CAP {
            debug!(profile = %self.profile, "digest full");
            return false;
        }
        self.activity.push(ActivityEntry {
            friend: friend.to_string(),
            line: line.to_string(),
            source,
        });
        self.updated_at = clock.now();
        true
    }

    pub fn clear(&mut self, clock: &dyn Clock) {
        self.activity.clear();
        self.updated_at = clock.now();
    }

    pub fn is_empty(&self) -> bool {
        self.activity.is_empty()
    }

    // ---------------------------------------------------------------------------
    // Rendering
    // ---------------------------------------------------------------------------

    pub fn subject(&self) -> String {
        let count = self.activity.len();
        if count == 1 {
            "1 update from your voting friends".to_string()
        } else {
            format!("{count} updates from your voting friends")
        }
    }

    pub fn body(&self) -> String {
        let mut body = String::from("Your friends have been busy:\n\n");
        for entry in &self.activity {
            body.push_str("  - ");
            body.push_str(&entry.line);
            body.push('\n');
        }
        body.push_str("\nSee how you compare and nudge them along.\n");
        body
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
