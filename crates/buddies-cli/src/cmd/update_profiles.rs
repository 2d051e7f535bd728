use buddies_core::clock::SystemClock;
use buddies_core::config::Config;
use buddies_core::fanout;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    Config::load(root)?;
    let refreshed = fanout::update_profiles(root, &SystemClock)?;
    if json {
        return crate::output::print_json(&serde_json::json!({ "refreshed": refreshed }));
    }
    println!("Refreshed {refreshed} profile(s)");
    Ok(())
}
