use crate::client::StatusClient;
use crate::clock::Clock;
use crate::constants::{NEIGHBOR_PENDING_TARGET, PROFILE_REFRESH_HOURS, STATUS_REFRESH_DAYS};
use crate::digest::{ActivitySource, DigestMessage};
use crate::error::Result;
use crate::mailer::Mailer;
use crate::profile::Profile;
use crate::voter::Voter;
use chrono::{Duration, Weekday};
use std::path::Path;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Fanout
// ---------------------------------------------------------------------------

/// Push `voter`'s latest activity line into the draft digest of every
/// voter who follows them: mutual friends as friend activity, and
/// anyone who has them as a recommended neighbor as neighbor activity.
/// Returns the slugs whose digests actually changed.
pub fn notify_community(root: &Path, voter: &Voter, clock: &dyn Clock) -> Result<Vec<String>> {
    let line = voter.activity(clock.today());
    let mut updated = Vec::new();

    for friend_slug in &voter.friends {
        if push_activity(root, friend_slug, voter, &line, ActivitySource::Friend, clock)? {
            updated.push(friend_slug.clone());
        }
    }
    for other in Voter::list(root)? {
        if other.slug == voter.slug || voter.friends.contains(&other.slug) {
            continue;
        }
        if other.neighbors.iter().any(|s| s == &voter.slug)
            && push_activity(root, &other.slug, voter, &line, ActivitySource::Neighbor, clock)?
        {
            updated.push(other.slug);
        }
    }
    if !updated.is_empty() {
        info!(slug = %voter.slug, recipients = updated.len(), "fanned out activity");
    }
    Ok(updated)
}

fn push_activity(
    root: &Path,
    recipient: &str,
    about: &Voter,
    line: &str,
    source: ActivitySource,
    clock: &dyn Clock,
) -> Result<bool> {
    let mut digest = DigestMessage::draft(root, recipient, clock)?;
    if !digest.add_activity(&about.slug, line, source, clock) {
        return Ok(false);
    }
    digest.save(root)?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Batch jobs
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub refreshed: usize,
    pub changed: usize,
    pub failed: usize,
}

/// Refresh every voter whose status is older than a week, fanning out
/// to their community on change. One voter's failure never stops the
/// batch; it is logged and counted.
pub fn update_statuses(
    root: &Path,
    client: &StatusClient,
    clock: &dyn Clock,
) -> Result<RefreshReport> {
    let mut report = RefreshReport::default();
    if !client.has_upcoming_election(clock.today())? {
        info!("no upcoming election, skipping status refresh");
        return Ok(report);
    }

    for mut voter in Voter::list(root)? {
        let fresh = voter
            .fetched_at
            .map(|at| clock.now() - at < Duration::days(STATUS_REFRESH_DAYS))
            .unwrap_or(false);
        if fresh {
            debug!(slug = %voter.slug, "status is fresh");
            continue;
        }
        match voter.update_status(client, clock) {
            Ok(changed) => {
                report.refreshed += 1;
                voter.save(root)?;
                if changed {
                    report.changed += 1;
                    notify_community(root, &voter, clock)?;
                }
            }
            Err(e) => {
                report.failed += 1;
                warn!(slug = %voter.slug, error = %e, "status refresh failed");
            }
        }
    }
    Ok(report)
}

/// Top up neighbor recommendations for every voter who has fewer
/// pending recommendations than the target. Returns total added.
pub fn update_neighbors(root: &Path) -> Result<usize> {
    let mut added = 0;
    for mut voter in Voter::list(root)? {
        if voter.neighbors.len() >= NEIGHBOR_PENDING_TARGET {
            continue;
        }
        let wanted = NEIGHBOR_PENDING_TARGET - voter.neighbors.len();
        let got = voter.update_neighbors(root, wanted)?;
        if got > 0 {
            voter.save(root)?;
            added += got;
        }
    }
    Ok(added)
}

/// Recompute staleness and the alert decision for profiles that haven't
/// been touched in roughly a day. Returns how many were refreshed.
pub fn update_profiles(root: &Path, clock: &dyn Clock) -> Result<usize> {
    let mut refreshed = 0;
    for voter in Voter::list(root)? {
        let mut profile = Profile::load_or_create(root, &voter.slug, clock)?;
        let recent = profile
            .refreshed_at
            .map(|at| clock.now() - at < Duration::hours(PROFILE_REFRESH_HOURS))
            .unwrap_or(false);
        if recent {
            continue;
        }
        profile.refresh(&voter, clock);
        profile.save(root)?;
        refreshed += 1;
    }
    Ok(refreshed)
}

/// Send the digest email to every profile due for an alert. With `day`
/// set, the whole run is a no-op on any other weekday. Returns how many
/// emails went out; per-recipient failures log and continue.
pub fn send_activity_emails(
    root: &Path,
    mailer: &dyn Mailer,
    clock: &dyn Clock,
    day: Option<Weekday>,
) -> Result<usize> {
    if let Some(day) = day {
        let today = clock.today();
        if chrono::Datelike::weekday(&today) != day {
            debug!(%day, "not the configured send day");
            return Ok(0);
        }
    }

    let mut sent = 0;
    for voter in Voter::list(root)? {
        let mut profile = Profile::load_or_create(root, &voter.slug, clock)?;
        profile.refresh(&voter, clock);
        profile.save(root)?;
        if !profile.will_alert {
            continue;
        }
        if voter.is_test_voter() {
            warn!(slug = %voter.slug, "skipping email to test voter");
            continue;
        }

        let mut digest = DigestMessage::draft(root, &voter.slug, clock)?;
        // Never mail an empty digest.
        if digest.is_empty() {
            debug!(slug = %voter.slug, "digest is empty, nothing to send");
            continue;
        }
        match mailer.send(&voter.email, &digest.subject(), &digest.body()) {
            Ok(true) => {
                digest.mark_sent(root, clock)?;
                profile.mark_alerted(clock);
                profile.save(root)?;
                sent += 1;
                info!(slug = %voter.slug, "sent digest email");
            }
            Ok(false) => {
                debug!(slug = %voter.slug, "mailer declined delivery");
            }
            Err(e) => {
                warn!(slug = %voter.slug, error = %e, "email delivery failed");
            }
        }
    }
    Ok(sent)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
