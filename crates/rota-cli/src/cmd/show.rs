use anyhow::Result;
use rota_core::config::Config;
use rota_core::Store;

use crate::output::{print_json, print_table};

pub fn run(config: &Config, json: bool) -> Result<()> {
    let store = Store::open(&config.database)?;
    let schedule = store.schedule()?;

    if json {
        return print_json(&schedule);
    }
    if schedule.is_empty() {
        println!("No assignments yet. Run `rota rotate` or start the server.");
        return Ok(());
    }
    if let Some(at) = store.last_update()? {
        let local = config.clock()?.local(at);
        println!("Last rotation: {}", local.format("%Y-%m-%d %H:%M %:z"));
    }
    let rows = schedule
        .into_iter()
        .map(|e| vec![e.student, e.area])
        .collect();
    print_table(&["STUDENT", "AREA"], rows);
    Ok(())
}
