use buddies_core::clock::SystemClock;
use buddies_core::config::Config;
use buddies_core::fanout;
use buddies_core::mailer::ConsoleMailer;
use chrono::Weekday;
use std::path::Path;
use std::str::FromStr;

pub fn parse_weekday(value: &str) -> Result<Weekday, String> {
    Weekday::from_str(value).map_err(|_| format!("not a weekday: '{value}'"))
}

pub fn run(root: &Path, day: Option<Weekday>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    let day = match day {
        Some(day) => Some(day),
        None => config
            .send_day
            .as_deref()
            .map(parse_weekday)
            .transpose()
            .map_err(anyhow::Error::msg)?,
    };

    let sent = fanout::send_activity_emails(root, &ConsoleMailer, &SystemClock, day)?;
    if json {
        return crate::output::print_json(&serde_json::json!({ "sent": sent }));
    }
    println!("Sent {sent} digest email(s)");
    Ok(())
}
