use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Milestone
// ---------------------------------------------------------------------------

/// One stage in the voting pipeline, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Registered,
    AbsenteeRequested,
    AbsenteeReceived,
    BallotAvailable,
    BallotCompleted,
    BallotSent,
    BallotReturned,
    BallotReceived,
    Election,
    Voted,
}

impl Milestone {
    pub fn all() -> &'static [Milestone] {
        &[
            Milestone::Registered,
            Milestone::AbsenteeRequested,
            Milestone::AbsenteeReceived,
            Milestone::BallotAvailable,
            Milestone::BallotCompleted,
            Milestone::BallotSent,
            Milestone::BallotReturned,
            Milestone::BallotReceived,
            Milestone::Election,
            Milestone::Voted,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Milestone::Registered => "registered",
            Milestone::AbsenteeRequested => "absentee_requested",
            Milestone::AbsenteeReceived => "absentee_received",
            Milestone::BallotAvailable => "ballot_available",
            Milestone::BallotCompleted => "ballot_completed",
            Milestone::BallotSent => "ballot_sent",
            Milestone::BallotReturned => "ballot_returned",
            Milestone::BallotReceived => "ballot_received",
            Milestone::Election => "election",
            Milestone::Voted => "voted",
        }
    }

    /// Activity-line fragment for a voter who reached this milestone.
    /// `Election` is a calendar marker, not something a voter "does."
    pub fn activity_label(self) -> Option<&'static str> {
        match self {
            Milestone::Registered => Some("registered to vote"),
            Milestone::AbsenteeRequested => Some("requested an absentee ballot"),
            Milestone::AbsenteeReceived => Some("was approved to vote absentee"),
            Milestone::BallotAvailable => Some("has a sample ballot available"),
            Milestone::BallotCompleted => Some("completed their ballot"),
            Milestone::BallotSent => Some("was mailed their ballot"),
            Milestone::BallotReturned => Some("returned their ballot"),
            Milestone::BallotReceived => Some("had their ballot received"),
            Milestone::Election => None,
            Milestone::Voted => Some("cast their vote"),
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StepIcon
// ---------------------------------------------------------------------------

/// Display glyph carried by a step. The numeric weight feeds into the
/// step's ordering value and never renders anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepIcon {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "🟡")]
    Pending,
    #[serde(rename = "⚠️")]
    Warning,
    #[serde(rename = "🚫")]
    Blocked,
    #[serde(rename = "✅")]
    Check,
    #[serde(rename = "−")]
    NotApplicable,
    #[serde(rename = "🔗")]
    Link,
}

impl StepIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            StepIcon::None => "",
            StepIcon::Pending => "🟡",
            StepIcon::Warning => "⚠️",
            StepIcon::Blocked => "🚫",
            StepIcon::Check => "✅",
            StepIcon::NotApplicable => "−",
            StepIcon::Link => "🔗",
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            StepIcon::Link => 0.32,
            StepIcon::Check => 0.31,
            StepIcon::Pending => 0.22,
            StepIcon::Warning => 0.21,
            StepIcon::Blocked => 0.1,
            StepIcon::NotApplicable | StepIcon::None => 0.0,
        }
    }

    /// Icons that mean "this step is waiting on the voter."
    pub fn needs_action(self) -> bool {
        matches!(self, StepIcon::Pending | StepIcon::Warning | StepIcon::Blocked)
    }
}

impl fmt::Display for StepIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

// ---------------------------------------------------------------------------
// StepColor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCategory {
    Success,
    Warning,
    Danger,
    #[default]
    Default,
}

impl ColorCategory {
    pub fn weight(self) -> f64 {
        match self {
            ColorCategory::Success => 3.0,
            ColorCategory::Warning => 2.0,
            ColorCategory::Danger => 1.0,
            ColorCategory::Default => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorCategory::Success => "success",
            ColorCategory::Warning => "warning",
            ColorCategory::Danger => "danger",
            ColorCategory::Default => "default",
        }
    }
}

/// Bootstrap-style color class: a category, optionally muted once the
/// step no longer needs the voter's attention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct StepColor {
    pub category: ColorCategory,
    pub muted: bool,
}

impl StepColor {
    pub const fn new(category: ColorCategory) -> Self {
        Self {
            category,
            muted: false,
        }
    }

    pub const fn muted(category: ColorCategory) -> Self {
        Self {
            category,
            muted: true,
        }
    }

    pub fn is_default(self) -> bool {
        self.category == ColorCategory::Default
    }

    pub fn is_success(self) -> bool {
        self.category == ColorCategory::Success
    }
}

impl fmt::Display for StepColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category.as_str())?;
        if self.muted {
            f.write_str(" text-muted")?;
        }
        Ok(())
    }
}

impl From<StepColor> for String {
    fn from(color: StepColor) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for StepColor {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let mut parts = value.split_whitespace();
        let category = match parts.next().unwrap_or("default") {
            "success" => ColorCategory::Success,
            "warning" => ColorCategory::Warning,
            "danger" => ColorCategory::Danger,
            "default" => ColorCategory::Default,
            other => return Err(format!("unknown color category: {other}")),
        };
        let muted = parts.any(|p| p == "text-muted");
        Ok(Self { category, muted })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
