use anyhow::Result;
use chrono::Utc;
use rota_core::config::Config;
use rota_core::{Rotator, Store};
use std::sync::Arc;

use crate::output::print_table;

pub fn run(config: &Config, force: bool) -> Result<()> {
    let store = Arc::new(Store::open(&config.database)?);
    let rotator = Rotator::new(store, config.clock()?);
    let mut rng = rand::thread_rng();

    let rotation = if force {
        Some(rotator.force_rotate_at(Utc::now(), &mut rng)?)
    } else {
        rotator.maybe_rotate_at(Utc::now(), &mut rng)?
    };

    match rotation {
        Some(r) => {
            println!("Rotated for {}", r.stamp);
            let rows = r
                .pairs
                .into_iter()
                .map(|(s, a)| vec![s.name, a.name])
                .collect();
            print_table(&["STUDENT", "AREA"], rows);
        }
        None => println!("Rotation not due; current assignments kept."),
    }
    Ok(())
}
