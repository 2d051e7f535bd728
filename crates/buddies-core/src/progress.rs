use crate::constants;
use crate::step::Step;
use crate::types::{Milestone, StepIcon};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// The full ordered set of milestone steps for one voter at one point in
/// time. Constructed once per status parse and never mutated afterward;
/// overlays produce a new value. `today` is captured at parse time so
/// every derived metric is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub today: NaiveDate,
    pub registered: Step,
    pub absentee_requested: Step,
    pub absentee_received: Step,
    pub ballot_available: Step,
    pub ballot_completed: Step,
    pub ballot_sent: Step,
    pub ballot_returned: Step,
    pub ballot_received: Step,
    pub election: Step,
    pub voted: Step,
}

impl Progress {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            registered: Step::default(),
            absentee_requested: Step::default(),
            absentee_received: Step::default(),
            ballot_available: Step::default(),
            ballot_completed: Step::default(),
            ballot_sent: Step::default(),
            ballot_returned: Step::default(),
            ballot_received: Step::default(),
            election: Step::default(),
            voted: Step::default(),
        }
    }

    pub fn step(&self, milestone: Milestone) -> &Step {
        match milestone {
            Milestone::Registered => &self.registered,
            Milestone::AbsenteeRequested => &self.absentee_requested,
            Milestone::AbsenteeReceived => &self.absentee_received,
            Milestone::BallotAvailable => &self.ballot_available,
            Milestone::BallotCompleted => &self.ballot_completed,
            Milestone::BallotSent => &self.ballot_sent,
            Milestone::BallotReturned => &self.ballot_returned,
            Milestone::BallotReceived => &self.ballot_received,
            Milestone::Election => &self.election,
            Milestone::Voted => &self.voted,
        }
    }

    // ---------------------------------------------------------------------------
    // Ordering
    // ---------------------------------------------------------------------------

    /// Step values in priority order: later pipeline stages outrank
    /// earlier ones, so a list of voters sorts "most advanced first."
    pub fn sort_key(&self) -> SortKey {
        let today = self.today;
        SortKey([
            self.ballot_received.value(today),
            self.ballot_returned.value(today),
            self.ballot_completed.value(today),
            self.ballot_sent.value(today),
            self.voted.value(today),
            self.ballot_available.value(today),
            self.absentee_received.value(today),
            self.absentee_requested.value(today),
            self.registered.value(today),
        ])
    }

    // ---------------------------------------------------------------------------
    // Derived metrics
    // ---------------------------------------------------------------------------

    /// Fraction of the fixed checklist that is complete, as a whole
    /// percentage. Unregistered voters are 0; with no known election
    /// there is nothing left to do.
    pub fn percent(&self) -> u8 {
        if !self.registered.complete() {
            return 0;
        }
        if self.election.date.is_none() {
            return 100;
        }
        let checklist = [
            &self.registered,
            &self.absentee_requested,
            &self.absentee_received,
            &self.ballot_completed,
            &self.ballot_sent,
            &self.ballot_returned,
            &self.voted,
        ];
        let complete = checklist.iter().filter(|s| s.complete()).count();
        (complete * 100 / checklist.len()) as u8
    }

    /// Count of steps still waiting on the voter. Zero once the
    /// election is in the past.
    pub fn actions(&self) -> usize {
        if self.election.days(self.today) < 0 {
            return 0;
        }
        let steps = [
            &self.registered,
            &self.absentee_requested,
            &self.absentee_received,
            &self.ballot_available,
            &self.ballot_completed,
            &self.ballot_sent,
            &self.ballot_returned,
            &self.ballot_received,
            &self.voted,
        ];
        steps.iter().filter(|s| s.actionable(self.today)).count()
    }

    /// The most advanced milestone the voter has positively reached.
    pub fn most_advanced(&self) -> Option<Milestone> {
        [
            Milestone::Voted,
            Milestone::BallotReturned,
            Milestone::BallotSent,
            Milestone::BallotCompleted,
            Milestone::BallotAvailable,
            Milestone::AbsenteeReceived,
            Milestone::AbsenteeRequested,
            Milestone::Registered,
        ]
        .into_iter()
        .find(|&m| self.step(m).achieved())
    }

    // ---------------------------------------------------------------------------
    // Overlays
    // ---------------------------------------------------------------------------

    /// Voter is registered outside the supported state: the registration
    /// step points at a generic external registration site instead.
    pub fn with_out_of_state(mut self, state: &str) -> Self {
        self.registered.icon = StepIcon::None;
        self.registered.url = Some(
            constants::OTHER_REGISTRATION_URL.replace("{name}", &state.to_lowercase()),
        );
        self
    }

    /// Voter opted out of absentee voting entirely: the mail pipeline
    /// collapses to not-applicable instead of nagging about it.
    pub fn without_absentee(mut self) -> Self {
        self.absentee_requested.disable();
        self.absentee_received.disable();
        self.ballot_sent.disable();
        self.ballot_returned.disable();
        self.ballot_received.disable();
        self
    }
}

impl PartialOrd for Progress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.sort_key().cmp(&other.sort_key()))
    }
}

// ---------------------------------------------------------------------------
// SortKey
// ---------------------------------------------------------------------------

/// Totally ordered wrapper around the step-value tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortKey([f64; 9]);

impl Eq for SortKey {}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColorCategory, StepColor};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        day(2021, 10, 1)
    }

    #[test]
    fn more_completed_steps_rank_higher() {
        let mut a = Progress::new(today());
        a.registered.check(None);
        a.absentee_requested.check(None);

        let mut b = Progress::new(today());
        b.registered.check(None);

        assert!(a > b);
        assert!(b < a);
    }

    #[test]
    fn later_stages_outrank_earlier_ones() {
        let mut mailed = Progress::new(today());
        mailed.ballot_received.check(None);

        let mut registered = Progress::new(today());
        registered.registered.check(None);
        registered.absentee_requested.check(None);
        registered.absentee_received.check(None);

        assert!(mailed > registered);
    }

    #[test]
    fn percent_zero_when_unregistered() {
        let mut progress = Progress::new(today());
        progress.registered.icon = StepIcon::Blocked;
        progress.registered.color = StepColor::new(ColorCategory::Danger);
        progress.election.date = Some(day(2021, 11, 2));
        assert_eq!(progress.percent(), 0);
    }

    #[test]
    fn percent_full_without_known_election() {
        let mut progress = Progress::new(today());
        progress.registered.check(None);
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn percent_counts_checklist() {
        let mut progress = Progress::new(today());
        progress.election.date = Some(day(2021, 11, 2));
        progress.registered.check(None);
        progress.absentee_requested.check(None);
        // 2 of 7 checklist steps complete
        assert_eq!(progress.percent(), 28);
    }

    #[test]
    fn actions_zero_after_election() {
        let mut progress = Progress::new(today());
        progress.registered.icon = StepIcon::Pending;
        progress.election.date = Some(day(2021, 9, 1));
        assert_eq!(progress.actions(), 0);
    }

    #[test]
    fn actions_counts_pending_steps() {
        let mut progress = Progress::new(today());
        progress.election.date = Some(day(2021, 11, 2));
        progress.registered.icon = StepIcon::Pending;
        progress.ballot_completed.icon = StepIcon::Blocked;
        assert_eq!(progress.actions(), 2);
    }

    #[test]
    fn most_advanced_skips_not_applicable() {
        let mut progress = Progress::new(today());
        progress.registered.check(None);
        progress.absentee_received.disable();
        assert_eq!(progress.most_advanced(), Some(Milestone::Registered));
    }

    #[test]
    fn most_advanced_none_when_nothing_achieved() {
        let progress = Progress::new(today());
        assert_eq!(progress.most_advanced(), None);
    }

    #[test]
    fn out_of_state_overlay_replaces_registration_url() {
        let mut progress = Progress::new(today());
        progress.registered.icon = StepIcon::Blocked;
        let overlaid = progress.with_out_of_state("Ohio");
        assert_eq!(overlaid.registered.icon, StepIcon::None);
        assert_eq!(
            overlaid.registered.url.as_deref(),
            Some("https://votesaveamerica.com/state/ohio/")
        );
    }

    #[test]
    fn without_absentee_collapses_mail_pipeline() {
        let mut progress = Progress::new(today());
        progress.registered.check(None);
        let overlaid = progress.without_absentee();
        assert_eq!(overlaid.absentee_received.icon, StepIcon::NotApplicable);
        assert_eq!(overlaid.ballot_returned.icon, StepIcon::NotApplicable);
        assert!(overlaid.absentee_received.complete());
        assert_eq!(overlaid.actions(), 0);
    }

    #[test]
    fn sort_key_total_order() {
        let a = SortKey([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let b = SortKey([0.0, 3.31, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(a > b);
        assert_eq!(a.cmp(&a), Ordering::Equal);
    }
}
