use buddies_core::client::StatusClient;
use buddies_core::clock::SystemClock;
use buddies_core::config::Config;
use buddies_core::fanout;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    let client = StatusClient::with_base_url(&config.status_api)?;
    let report = fanout::update_statuses(root, &client, &SystemClock)?;

    if json {
        return crate::output::print_json(&serde_json::json!({
            "refreshed": report.refreshed,
            "changed": report.changed,
            "failed": report.failed,
        }));
    }
    println!(
        "Refreshed {} voter(s): {} changed, {} failed",
        report.refreshed, report.changed, report.failed
    );
    Ok(())
}
