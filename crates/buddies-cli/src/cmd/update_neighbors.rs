use buddies_core::config::Config;
use buddies_core::fanout;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    Config::load(root)?;
    let added = fanout::update_neighbors(root)?;
    if json {
        return crate::output::print_json(&serde_json::json!({ "added": added }));
    }
    println!("Recommended {added} neighbor(s)");
    Ok(())
}
