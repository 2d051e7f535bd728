use crate::error::{BuddiesError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const BUDDIES_DIR: &str = ".buddies";
pub const VOTERS_DIR: &str = ".buddies/voters";
pub const PROFILES_DIR: &str = ".buddies/profiles";
pub const MESSAGES_DIR: &str = ".buddies/messages";
pub const OUTBOX_DIR: &str = ".buddies/outbox";

pub const CONFIG_FILE: &str = ".buddies/config.yaml";

pub const VOTER_FILE: &str = "voter.yaml";
pub const PROFILE_FILE: &str = "profile.yaml";
pub const DRAFT_FILE: &str = "draft.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn buddies_dir(root: &Path) -> PathBuf {
    root.join(BUDDIES_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn voter_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(VOTERS_DIR).join(slug)
}

pub fn voter_path(root: &Path, slug: &str) -> PathBuf {
    voter_dir(root, slug).join(VOTER_FILE)
}

pub fn profile_path(root: &Path, slug: &str) -> PathBuf {
    root.join(PROFILES_DIR).join(slug).join(PROFILE_FILE)
}

pub fn message_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(MESSAGES_DIR).join(slug)
}

/// The single open digest for a profile. At most one exists at a time;
/// sending archives it under a timestamped name in the same directory.
pub fn draft_path(root: &Path, slug: &str) -> PathBuf {
    message_dir(root, slug).join(DRAFT_FILE)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(BuddiesError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
