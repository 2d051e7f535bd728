use crate::output;
use buddies_core::clock::{Clock, SystemClock};
use buddies_core::types::Milestone;
use buddies_core::voter::Voter;
use chrono::NaiveDate;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum VoterSubcommand {
    /// Add a voter
    Add {
        slug: String,
        email: String,
        first_name: String,
        last_name: String,
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        #[arg(long)]
        zip: Option<String>,
        /// State of registration (default: Michigan)
        #[arg(long)]
        state: Option<String>,
        /// Slug of the voter who invited this one
        #[arg(long)]
        referrer: Option<String>,
    },

    /// List all voters
    List,

    /// Show one voter's progress
    Info { slug: String },

    /// Make two voters friends of each other
    Link { slug: String, other: String },

    /// Record self-reported progress
    Mark {
        slug: String,
        /// Date the voter cast their vote
        #[arg(long)]
        voted: Option<NaiveDate>,
        /// Date the voter mailed their ballot back
        #[arg(long)]
        returned: Option<NaiveDate>,
        /// Link to the voter's completed sample ballot
        #[arg(long)]
        ballot_url: Option<String>,
        /// The voter shared their ballot with friends
        #[arg(long)]
        shared: bool,
        /// The voter will not vote by mail
        #[arg(long)]
        no_absentee: bool,
    },
}

pub fn run(root: &Path, subcommand: VoterSubcommand, json: bool) -> anyhow::Result<()> {
    match subcommand {
        VoterSubcommand::Add {
            slug,
            email,
            first_name,
            last_name,
            birth_date,
            zip,
            state,
            referrer,
        } => {
            let mut voter = Voter::create(root, &slug, email, first_name, last_name)?;
            voter.birth_date = birth_date;
            voter.zip_code = zip;
            if let Some(state) = state {
                voter.state = state;
            }
            voter.referrer = referrer;
            voter.save(root)?;
            if json {
                output::print_json(&voter)?;
            } else {
                println!("Added voter: {slug}");
            }
            Ok(())
        }

        VoterSubcommand::List => {
            let voters = Voter::list(root)?;
            if json {
                return output::print_json(&voters);
            }
            let today = SystemClock.today();
            let rows = voters
                .iter()
                .map(|v| {
                    let progress = v.progress(today);
                    vec![
                        v.slug.clone(),
                        v.display_name(),
                        format!("{}%", progress.percent()),
                        progress.actions().to_string(),
                        v.friends.len().to_string(),
                    ]
                })
                .collect();
            output::print_table(&["SLUG", "NAME", "PERCENT", "ACTIONS", "FRIENDS"], rows);
            Ok(())
        }

        VoterSubcommand::Info { slug } => {
            let voter = Voter::load(root, &slug)?;
            let today = SystemClock.today();
            let progress = voter.progress(today);
            if json {
                return output::print_json(&serde_json::json!({
                    "voter": voter,
                    "progress": progress,
                    "percent": progress.percent(),
                    "actions": progress.actions(),
                }));
            }
            println!(
                "{} <{}>: {}% complete, {} action(s)",
                voter.display_name(),
                voter.email,
                progress.percent(),
                progress.actions()
            );
            let rows = Milestone::all()
                .iter()
                .map(|&m| {
                    let step = progress.step(m);
                    vec![
                        m.to_string(),
                        step.icon.glyph().to_string(),
                        step.color.to_string(),
                        step.date.map(|d| d.to_string()).unwrap_or_default(),
                        step.deadline.map(|d| d.to_string()).unwrap_or_default(),
                        step.url.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            output::print_table(
                &["MILESTONE", "ICON", "COLOR", "DATE", "DEADLINE", "URL"],
                rows,
            );
            Ok(())
        }

        VoterSubcommand::Link { slug, other } => {
            Voter::link(root, &slug, &other)?;
            println!("Linked {slug} and {other}");
            Ok(())
        }

        VoterSubcommand::Mark {
            slug,
            voted,
            returned,
            ballot_url,
            shared,
            no_absentee,
        } => {
            let mut voter = Voter::load(root, &slug)?;
            if voted.is_some() {
                voter.voted = voted;
            }
            if returned.is_some() {
                voter.returned = returned;
            }
            if ballot_url.is_some() {
                voter.ballot_url = ballot_url;
            }
            if shared {
                voter.ballot_shared = true;
            }
            if no_absentee {
                voter.absentee = false;
            }
            voter.save(root)?;
            if json {
                output::print_json(&voter)?;
            } else {
                println!("Updated voter: {slug}");
            }
            Ok(())
        }
    }
}
