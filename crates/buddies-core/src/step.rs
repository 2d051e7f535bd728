use crate::types::{ColorCategory, StepColor, StepIcon};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// Display and ordering state for a single milestone. Pure value type;
/// anything date-relative takes `today` explicitly so callers control
/// the clock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub icon: StepIcon,
    #[serde(default)]
    pub color: StepColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl Step {
    /// Numeric encoding used only for ordering voters: color category
    /// dominates, icon breaks ties, and a small date term separates
    /// steps resolved on different days.
    pub fn value(&self, today: NaiveDate) -> f64 {
        let icon = if self.url.is_some() && self.icon == StepIcon::None {
            StepIcon::Link
        } else {
            self.icon
        };
        let date_value = if self.date.is_some() {
            StepIcon::Check.weight() + (self.days(today).abs() as f64) / 1000.0
        } else {
            0.0
        };
        self.color.category.weight() + icon.weight() + date_value
    }

    /// Worth nudging the voter about: waiting on them and not yet past
    /// its own deadline.
    pub fn actionable(&self, today: NaiveDate) -> bool {
        if let Some(deadline) = self.deadline {
            if today > deadline {
                return false;
            }
        }
        self.icon.needs_action()
    }

    pub fn complete(&self) -> bool {
        self.color.is_success() || self.icon == StepIcon::NotApplicable
    }

    /// Signed day delta between the step's date and today.
    pub fn days(&self, today: NaiveDate) -> i64 {
        match self.date {
            Some(date) => (date - today).num_days(),
            None => 0,
        }
    }

    /// True once the milestone is settled, for better or worse, and not
    /// waiting on the voter.
    pub fn resolved(&self) -> bool {
        !self.color.is_default() && !self.icon.needs_action()
    }

    /// The milestone was positively reached (not merely skipped or
    /// marked not-applicable).
    pub fn achieved(&self) -> bool {
        self.icon == StepIcon::Check
    }

    pub fn check(&mut self, when: Option<NaiveDate>) {
        self.icon = StepIcon::Check;
        self.color = StepColor::muted(ColorCategory::Success);
        if when.is_some() {
            self.date = when;
        }
    }

    pub fn disable(&mut self) {
        if self.icon != StepIcon::Check {
            self.icon = StepIcon::NotApplicable;
            self.url = None;
        }
        self.color = StepColor::muted(ColorCategory::Success);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
