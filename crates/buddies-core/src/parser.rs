//! Decision tree turning a raw status payload into a fully populated
//! [`Progress`]. Branch order matters: later sections assume earlier
//! steps are already set, and several gating conditions return a
//! partially filled value on purpose.

use crate::constants::*;
use crate::progress::Progress;
use crate::status::{to_date, RawStatus};
use crate::step::Step;
use crate::types::{ColorCategory, StepColor, StepIcon};
use chrono::{Duration, NaiveDate};

// ---------------------------------------------------------------------------
// ParseOverlay
// ---------------------------------------------------------------------------

/// Manual confirmations supplied by the voter themselves, independent
/// of the external feed. These always override the inferred pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOverlay {
    /// Date the voter confirmed they voted.
    pub voted: Option<NaiveDate>,
    /// Voter marked their ballot as filled out.
    pub completed_ballot: bool,
    /// Voter shared a link to their completed ballot.
    pub shared_ballot: bool,
    /// Date the voter reported mailing their ballot back.
    pub returned: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

impl Progress {
    pub fn parse(raw: &RawStatus, overlay: &ParseOverlay, today: NaiveDate) -> Progress {
        let mut p = Progress::new(today);

        let status = raw.status.clone().unwrap_or_default();
        let election = raw.election.clone().unwrap_or_default();

        // 1. Deadlines hang off the election date; without one, none are set.
        p.election.date = election.date();
        if let Some(election_date) = p.election.date {
            set_deadlines(&mut p, election_date);
        }

        // 2. With no status record at all, nothing else can be known.
        if raw.status.is_none() {
            p.registered.icon = StepIcon::Pending;
            p.registered.color = StepColor::new(ColorCategory::Warning);
            return p;
        }

        // 3. Not registered: everything downstream is moot.
        if !status.registered.unwrap_or(false) {
            p.registered.icon = StepIcon::Blocked;
            p.registered.color = StepColor::new(ColorCategory::Danger);
            p.registered.url = Some(MICHIGAN_REGISTRATION_URL.to_string());
            if p.election.days(today) < PAST_ELECTION_DAYS {
                p.election = Step::default();
            }
            return p;
        }
        p.registered.check(None);

        // 4. Absentee request: null means the feed doesn't track it.
        match status.absentee {
            Some(true) => p.absentee_requested.check(None),
            None => {
                p.absentee_requested.icon = StepIcon::NotApplicable;
                p.absentee_requested.color = StepColor::muted(ColorCategory::Success);
            }
            Some(false) => {
                p.absentee_requested.icon = StepIcon::Blocked;
                p.absentee_requested.url = Some(ABSENTEE_URL.to_string());
                p.absentee_requested.color = StepColor::new(ColorCategory::Warning);
            }
        }

        // 5. Absentee application received.
        let absentee_date = status
            .absentee_application_received
            .as_deref()
            .and_then(to_date);
        if let Some(date) = absentee_date {
            p.absentee_received.check(Some(date));
            if !p.absentee_requested.resolved() {
                p.absentee_requested.disable();
            }
        } else if status.absentee == Some(true) {
            p.absentee_received.icon = StepIcon::Blocked;
            p.absentee_received.url = Some(ABSENTEE_URL.to_string());
            p.ballot_sent.icon = StepIcon::NotApplicable;
            p.ballot_returned.icon = StepIcon::NotApplicable;
            p.ballot_received.icon = StepIcon::NotApplicable;
        } else {
            p.absentee_received.icon = StepIcon::NotApplicable;
            p.ballot_sent.icon = StepIcon::NotApplicable;
            p.ballot_returned.icon = StepIcon::NotApplicable;
            p.ballot_received.icon = StepIcon::NotApplicable;
        }

        // 6. A long-concluded election carries no action items at all.
        if p.election.days(today) < PAST_ELECTION_DAYS {
            clear_deadlines(&mut p);
            p.election = Step::default();
            return p;
        }

        // 7. Ballot availability.
        let has_ballot = status.ballot.unwrap_or(false);
        if has_ballot {
            p.absentee_requested.color = StepColor::muted(ColorCategory::Success);
            p.absentee_received.color = StepColor::muted(ColorCategory::Success);
            p.ballot_available.url = preview_url(raw);
            p.ballot_available.check(None);
            p.ballot_completed.icon = StepIcon::Pending;
        } else if p.election.date.is_some() {
            // Waiting on a ballot only makes sense with an election to
            // vote in.
            p.ballot_available.icon = StepIcon::Pending;
        }

        // 8. No ballot this close to the election: nothing downstream can
        // happen until one exists, so stop nagging about the mail pipeline.
        if !has_ballot && p.election.days(today) < BALLOT_AVAILABLE_DEADLINE_DAYS {
            p.ballot_completed.icon = StepIcon::NotApplicable;
            p.ballot_sent.icon = StepIcon::NotApplicable;
            p.ballot_returned.icon = StepIcon::NotApplicable;
            p.ballot_received.icon = StepIcon::NotApplicable;
            p.election.icon = StepIcon::NotApplicable;
            p.voted.icon = StepIcon::NotApplicable;
        }

        // 9. Manual confirmations override anything inferred above.
        if overlay.completed_ballot || overlay.shared_ballot {
            p.ballot_completed.check(None);
        }
        if overlay.voted.is_some() {
            p.absentee_received.disable();
            p.ballot_completed.disable();
            p.ballot_sent.disable();
            p.ballot_returned.disable();
            p.ballot_received.disable();
            p.election.disable();
            p.voted.check(None);
        }

        // 10. The vote-by-mail tail.
        if has_ballot && absentee_date.is_some() {
            parse_mail_pipeline(&mut p, &status, overlay, today);
        }

        // 11. In-person / drop-off nudge, independent of the feed.
        if overlay.voted.is_none()
            && p.voted.icon == StepIcon::None
            && p.election.date.is_some()
        {
            let mail_started = p.ballot_sent.resolved();
            if p.ballot_completed.resolved() && !mail_started {
                p.voted.icon = StepIcon::Pending;
            } else if p.ballot_available.resolved() && p.election.days(today) <= 0 {
                p.voted.icon = StepIcon::Pending;
            }
        }

        p
    }
}

fn parse_mail_pipeline(
    p: &mut Progress,
    status: &crate::status::VoterStatus,
    overlay: &ParseOverlay,
    today: NaiveDate,
) {
    let sent_date = status.absentee_ballot_sent.as_deref().and_then(to_date);
    let Some(sent) = sent_date else {
        p.ballot_sent.icon = StepIcon::Pending;
        return;
    };
    p.ballot_completed.color = StepColor::muted(ColorCategory::Success);
    p.ballot_sent.check(Some(sent));

    let received_date = status.absentee_ballot_received.as_deref().and_then(to_date);
    if let Some(received) = received_date {
        // Receipt implies return and a cast vote.
        p.ballot_completed.icon = StepIcon::NotApplicable;
        p.ballot_sent.color = StepColor::muted(ColorCategory::Success);
        p.ballot_returned.check(overlay.returned);
        p.ballot_received.check(Some(received));
        p.election.disable();
        p.voted.check(Some(received));
    } else if let Some(returned) = overlay.returned {
        // The voter says it's in the mail; the clerk hasn't logged it yet.
        p.ballot_sent.disable();
        p.ballot_returned.icon = StepIcon::Check;
        p.ballot_returned.date = Some(returned);
        p.ballot_returned.color = StepColor::new(ColorCategory::Success);
        p.ballot_received.icon = StepIcon::Pending;
        if p.election.days(today) < ABSENTEE_WARNING_DAYS {
            p.ballot_received.color = StepColor::new(ColorCategory::Warning);
        }
    } else if overlay.voted.is_some() {
        p.ballot_sent.disable();
    } else {
        p.ballot_returned.icon = StepIcon::Pending;
        if p.election.days(today) < ABSENTEE_WARNING_DAYS {
            p.ballot_returned.color = StepColor::new(ColorCategory::Warning);
        }
    }
}

fn set_deadlines(p: &mut Progress, election_date: NaiveDate) {
    p.registered.deadline = Some(election_date - Duration::days(REGISTRATION_DEADLINE_DAYS));
    p.absentee_requested.deadline =
        Some(election_date - Duration::days(ABSENTEE_REQUESTED_DEADLINE_DAYS));
    p.absentee_received.deadline =
        Some(election_date - Duration::days(ABSENTEE_RECEIVED_DEADLINE_DAYS));
    p.ballot_completed.deadline =
        Some(election_date - Duration::days(BALLOT_COMPLETED_DEADLINE_DAYS));
    p.ballot_sent.deadline = Some(election_date - Duration::days(BALLOT_SENT_DEADLINE_DAYS));
    p.ballot_returned.deadline =
        Some(election_date - Duration::days(BALLOT_RETURNED_DEADLINE_DAYS));
    p.ballot_received.deadline =
        Some(election_date - Duration::days(BALLOT_RECEIVED_DEADLINE_DAYS));
}

fn clear_deadlines(p: &mut Progress) {
    p.registered.deadline = None;
    p.absentee_requested.deadline = None;
    p.absentee_received.deadline = None;
    p.ballot_completed.deadline = None;
    p.ballot_sent.deadline = None;
    p.ballot_returned.deadline = None;
    p.ballot_received.deadline = None;
}

fn preview_url(raw: &RawStatus) -> Option<String> {
    if let Some(id) = raw.ballot.as_ref().and_then(|b| b.id) {
        return Some(BALLOT_PREVIEW_URL.replace("{ballot_id}", &id.to_string()));
    }
    let election_id = raw.election.as_ref().and_then(|e| e.id)?;
    let precinct_id = raw.precinct.as_ref().and_then(|p| p.id)?;
    Some(
        PRECINCT_PREVIEW_URL
            .replace("{election_id}", &election_id.to_string())
            .replace("{precinct_id}", &precinct_id.to_string()),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        day(2021, 10, 1)
    }

    fn raw(json: &str) -> RawStatus {
        serde_json::from_str(json).unwrap()
    }

    fn parse(json: &str) -> Progress {
        Progress::parse(&raw(json), &ParseOverlay::default(), today())
    }

    #[test]
    fn parse_is_deterministic() {
        let json = r#"{"status": {"registered": true, "absentee": true},
                       "election": {"date": "2021-11-02"}}"#;
        let a = parse(json);
        let b = parse(json);
        assert_eq!(a, b);
    }

    #[test]
    fn missing_status_marks_registration_pending() {
        let p = parse(r#"{"election": {"date": "2021-11-02"}}"#);
        assert_eq!(p.registered.icon, StepIcon::Pending);
        assert_eq!(p.registered.color, StepColor::new(ColorCategory::Warning));
        // Nothing else is known, but deadlines still hang off the election.
        assert_eq!(p.registered.deadline, Some(day(2021, 10, 18)));
        assert_eq!(p.absentee_requested.icon, StepIcon::None);
    }

    #[test]
    fn unregistered_blocks_with_registration_url() {
        let p = parse(
            r#"{"status": {"registered": false}, "election": {"date": "2021-11-02"}}"#,
        );
        assert_eq!(p.registered.icon, StepIcon::Blocked);
        assert_eq!(p.registered.url.as_deref(), Some(MICHIGAN_REGISTRATION_URL));
        assert_eq!(p.absentee_requested, Step::default());
        assert_eq!(p.percent(), 0);
    }

    #[test]
    fn unregistered_past_election_clears_election_step() {
        let p = Progress::parse(
            &raw(r#"{"status": {"registered": false}, "election": {"date": "2021-11-02"}}"#),
            &ParseOverlay::default(),
            day(2022, 2, 1),
        );
        assert_eq!(p.election, Step::default());
    }

    #[test]
    fn registered_with_unknown_absentee_is_not_applicable() {
        // Election 14 days out, no ballot yet.
        let p = Progress::parse(
            &raw(r#"{"status": {"registered": true, "absentee": null},
                     "election": {"date": "2021-10-15"}}"#),
            &ParseOverlay::default(),
            today(),
        );
        assert_eq!(p.registered.icon, StepIcon::Check);
        assert_eq!(p.absentee_requested.icon, StepIcon::NotApplicable);
        assert!(p.absentee_requested.complete());
        assert_eq!(p.ballot_available.icon, StepIcon::Pending);
        assert!(p.actions() >= 1);
    }

    #[test]
    fn absentee_declined_blocks_with_request_url() {
        let p = parse(
            r#"{"status": {"registered": true, "absentee": false},
                "election": {"date": "2021-11-02"}}"#,
        );
        assert_eq!(p.absentee_requested.icon, StepIcon::Blocked);
        assert_eq!(p.absentee_requested.url.as_deref(), Some(ABSENTEE_URL));
        assert_eq!(
            p.absentee_requested.color,
            StepColor::new(ColorCategory::Warning)
        );
    }

    #[test]
    fn absentee_requested_but_application_outstanding() {
        let p = parse(
            r#"{"status": {"registered": true, "absentee": true},
                "election": {"date": "2021-11-02"}}"#,
        );
        assert_eq!(p.absentee_requested.icon, StepIcon::Check);
        assert_eq!(p.absentee_received.icon, StepIcon::Blocked);
        assert_eq!(p.ballot_sent.icon, StepIcon::NotApplicable);
    }

    #[test]
    fn application_received_infers_request() {
        let p = parse(
            r#"{"status": {"registered": true, "absentee": null,
                           "absentee_application_received": "2021-09-15"},
                "election": {"date": "2021-11-02"}}"#,
        );
        assert_eq!(p.absentee_received.icon, StepIcon::Check);
        assert_eq!(p.absentee_received.date, Some(day(2021, 9, 15)));
        // The request step was unresolved, so receipt completes it.
        assert!(p.absentee_requested.complete());
    }

    #[test]
    fn long_past_election_wipes_deadlines_and_election() {
        let p = Progress::parse(
            &raw(r#"{"status": {"registered": true, "absentee": true},
                     "election": {"date": "2021-11-02"}}"#),
            &ParseOverlay::default(),
            day(2022, 1, 31), // 90 days later
        );
        assert_eq!(p.election, Step::default());
        assert_eq!(p.registered.deadline, None);
        assert_eq!(p.ballot_returned.deadline, None);
        assert_eq!(p.actions(), 0);
    }

    #[test]
    fn ballot_preview_url_from_ballot_id() {
        let p = parse(
            r#"{"status": {"registered": true, "absentee": true, "ballot": true},
                "election": {"id": 45, "date": "2021-11-02"},
                "precinct": {"id": 5943},
                "ballot": {"id": 687}}"#,
        );
        assert_eq!(p.ballot_available.icon, StepIcon::Check);
        assert_eq!(
            p.ballot_available.url.as_deref(),
            Some("https://share.michiganelections.io/ballots/687/")
        );
        assert_eq!(p.ballot_completed.icon, StepIcon::Pending);
    }

    #[test]
    fn ballot_preview_url_falls_back_to_precinct() {
        let p = parse(
            r#"{"status": {"registered": true, "absentee": true, "ballot": true},
                "election": {"id": 45, "date": "2021-11-02"},
                "precinct": {"id": 5943}}"#,
        );
        assert_eq!(
            p.ballot_available.url.as_deref(),
            Some("https://share.michiganelections.io/elections/45/precincts/5943")
        );
    }

    #[test]
    fn missing_ballot_near_election_downgrades_downstream() {
        // 14 days out, feed says no ballot: the mail pipeline is dead weight.
        let p = Progress::parse(
            &raw(r#"{"status": {"registered": true, "absentee": true,
                                "absentee_application_received": "2021-09-15"},
                     "election": {"date": "2021-10-15"}}"#),
            &ParseOverlay::default(),
            today(),
        );
        assert_eq!(p.ballot_available.icon, StepIcon::Pending);
        assert_eq!(p.ballot_completed.icon, StepIcon::NotApplicable);
        assert_eq!(p.ballot_sent.icon, StepIcon::NotApplicable);
        assert_eq!(p.voted.icon, StepIcon::NotApplicable);
    }

    #[test]
    fn full_vote_by_mail_cycle() {
        let p = parse(
            r#"{"status": {"registered": true, "absentee": true, "ballot": true,
                           "absentee_application_received": "2021-09-15",
                           "absentee_ballot_sent": "2021-09-30",
                           "absentee_ballot_received": "2021-10-15"},
                "election": {"id": 45, "date": "2021-11-02"},
                "precinct": {"id": 5943}}"#,
        );
        assert_eq!(p.voted.icon, StepIcon::Check);
        assert_eq!(p.voted.date, Some(day(2021, 10, 15)));
        assert_eq!(p.ballot_returned.icon, StepIcon::Check);
        assert_eq!(p.ballot_received.date, Some(day(2021, 10, 15)));
        assert_eq!(p.percent(), 100);
        assert_eq!(p.actions(), 0);
    }

    #[test]
    fn ballot_sent_but_not_returned_is_pending() {
        let p = parse(
            r#"{"status": {"registered": true, "absentee": true, "ballot": true,
                           "absentee_application_received": "2021-09-15",
                           "absentee_ballot_sent": "2021-09-30"},
                "election": {"date": "2021-11-02"}}"#,
        );
        assert_eq!(p.ballot_sent.icon, StepIcon::Check);
        assert_eq!(p.ballot_returned.icon, StepIcon::Pending);
        assert_eq!(p.ballot_returned.color, StepColor::default());
    }

    #[test]
    fn outstanding_return_warns_inside_final_week() {
        let p = Progress::parse(
            &raw(r#"{"status": {"registered": true, "absentee": true, "ballot": true,
                                "absentee_application_received": "2021-09-15",
                                "absentee_ballot_sent": "2021-09-30"},
                     "election": {"date": "2021-11-02"}}"#),
            &ParseOverlay::default(),
            day(2021, 10, 28),
        );
        assert_eq!(p.ballot_returned.icon, StepIcon::Pending);
        assert_eq!(
            p.ballot_returned.color,
            StepColor::new(ColorCategory::Warning)
        );
    }

    #[test]
    fn explicit_return_date_marks_receipt_pending() {
        let overlay = ParseOverlay {
            returned: Some(day(2021, 10, 20)),
            ..ParseOverlay::default()
        };
        let p = Progress::parse(
            &raw(r#"{"status": {"registered": true, "absentee": true, "ballot": true,
                                "absentee_application_received": "2021-09-15",
                                "absentee_ballot_sent": "2021-09-30"},
                     "election": {"date": "2021-11-02"}}"#),
            &overlay,
            day(2021, 10, 21),
        );
        assert_eq!(p.ballot_returned.icon, StepIcon::Check);
        assert_eq!(p.ballot_returned.date, Some(day(2021, 10, 20)));
        assert_eq!(p.ballot_received.icon, StepIcon::Pending);
    }

    #[test]
    fn manual_voted_overrides_pipeline() {
        let overlay = ParseOverlay {
            voted: Some(day(2021, 10, 20)),
            ..ParseOverlay::default()
        };
        let p = Progress::parse(
            &raw(r#"{"status": {"registered": true, "absentee": true, "ballot": true,
                                "absentee_application_received": "2021-09-15"},
                     "election": {"date": "2021-11-02"}}"#),
            &overlay,
            today(),
        );
        assert_eq!(p.voted.icon, StepIcon::Check);
        assert!(p.ballot_returned.complete());
        assert!(p.election.complete());
        assert_eq!(p.actions(), 0);
    }

    #[test]
    fn completed_ballot_without_mail_nudges_voted() {
        let overlay = ParseOverlay {
            completed_ballot: true,
            ..ParseOverlay::default()
        };
        let p = Progress::parse(
            &raw(r#"{"status": {"registered": true},
                     "election": {"date": "2021-11-02"}}"#),
            &overlay,
            today(),
        );
        assert_eq!(p.ballot_completed.icon, StepIcon::Check);
        assert_eq!(p.voted.icon, StepIcon::Pending);
    }

    #[test]
    fn election_day_with_ballot_nudges_voted() {
        let p = Progress::parse(
            &raw(r#"{"status": {"registered": true, "absentee": null, "ballot": true},
                     "election": {"id": 45, "date": "2021-11-02"},
                     "precinct": {"id": 5943}}"#),
            &ParseOverlay::default(),
            day(2021, 11, 2),
        );
        assert_eq!(p.voted.icon, StepIcon::Pending);
    }

    #[test]
    fn no_election_means_no_deadlines() {
        let p = parse(r#"{"status": {"registered": true}}"#);
        assert_eq!(p.registered.deadline, None);
        assert_eq!(p.election.date, None);
        assert_eq!(p.percent(), 100);
    }
}
