//! Deadlines, thresholds, and external URLs for the voting pipeline.

// ---------------------------------------------------------------------------
// External URLs
// ---------------------------------------------------------------------------

pub const STATUS_API: &str = "https://michiganelections.io/api";
pub const MICHIGAN_REGISTRATION_URL: &str = "https://mvic.sos.state.mi.us/RegisterVoter/Index";
pub const OTHER_REGISTRATION_URL: &str = "https://votesaveamerica.com/state/{name}/";
pub const ABSENTEE_URL: &str = "https://absentee.michiganelections.io/";
pub const BALLOT_PREVIEW_URL: &str = "https://share.michiganelections.io/ballots/{ballot_id}/";
pub const PRECINCT_PREVIEW_URL: &str =
    "https://share.michiganelections.io/elections/{election_id}/precincts/{precinct_id}";

// ---------------------------------------------------------------------------
// Step deadlines (days before election day)
// ---------------------------------------------------------------------------

pub const REGISTRATION_DEADLINE_DAYS: i64 = 15;
pub const ABSENTEE_REQUESTED_DEADLINE_DAYS: i64 = 18;
pub const ABSENTEE_RECEIVED_DEADLINE_DAYS: i64 = 14;
pub const BALLOT_COMPLETED_DEADLINE_DAYS: i64 = 7;
pub const BALLOT_SENT_DEADLINE_DAYS: i64 = 5;
pub const BALLOT_RETURNED_DEADLINE_DAYS: i64 = 1;
pub const BALLOT_RECEIVED_DEADLINE_DAYS: i64 = 0;

/// Ballots are expected to exist once the election is this close.
pub const BALLOT_AVAILABLE_DEADLINE_DAYS: i64 = 30;

/// Inside this window, an outstanding absentee ballot gets a warning color.
pub const ABSENTEE_WARNING_DAYS: i64 = 7;

/// An election more than this many days in the past is treated as concluded.
pub const PAST_ELECTION_DAYS: i64 = -21;

// ---------------------------------------------------------------------------
// Alert policy
// ---------------------------------------------------------------------------

/// A voter's status must have been confirmed within this window before
/// reminders about it are worth sending.
pub const VERIFIED_WITHIN_DAYS: i64 = 30;

pub const INCOMPLETE_ALERT_DAYS: i64 = 7 * 4;
pub const IDLE_ALERT_DAYS: i64 = 7 * 8;
pub const PENDING_ALERT_DAYS: i64 = 7 * 2;
pub const ELECTION_SOON_ALERT_DAYS: i64 = 1;

// ---------------------------------------------------------------------------
// Digest capacity
// ---------------------------------------------------------------------------

/// Neighbor-sourced activity stops accumulating once a digest holds this many
/// entries; friend activity still lands until [`DIGEST_TOTAL_CAP`].
pub const DIGEST_NEIGHBOR_CAP: usize = 3;
pub const DIGEST_TOTAL_CAP: usize = 8;

// ---------------------------------------------------------------------------
// Batch cadence
// ---------------------------------------------------------------------------

/// Minimum gap between status fetches for one voter.
pub const FETCH_COOLDOWN_MINUTES: i64 = 15;

/// Statuses older than this get refreshed by the batch job.
pub const STATUS_REFRESH_DAYS: i64 = 7;

/// Profiles untouched for this long get their staleness recomputed.
pub const PROFILE_REFRESH_HOURS: i64 = 25;

/// Voters with fewer pending recommendations than this get topped up.
pub const NEIGHBOR_PENDING_TARGET: usize = 3;
