use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw status payload
// ---------------------------------------------------------------------------

/// The Status Provider's JSON shape. Every field is optional: the feed
/// routinely omits whole sub-objects, and a partial record must parse
/// to a partial value rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VoterStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub election: Option<Election>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precinct: Option<Precinct>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ballot: Option<Ballot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoterStatus {
    #[serde(default)]
    pub registered: Option<bool>,
    #[serde(default)]
    pub absentee: Option<bool>,
    #[serde(default)]
    pub ballot: Option<bool>,
    #[serde(default)]
    pub ballot_url: Option<String>,
    #[serde(default)]
    pub absentee_application_received: Option<String>,
    #[serde(default)]
    pub absentee_ballot_sent: Option<String>,
    #[serde(default)]
    pub absentee_ballot_received: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Election {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Precinct {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub ward: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ballot {
    #[serde(default)]
    pub id: Option<u64>,
}

impl Election {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(to_date)
    }
}

/// Soft date parsing: anything that isn't a clean ISO date is treated
/// as absent, never as an error.
pub fn to_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
