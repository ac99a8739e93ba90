//! Location list commands: listing, configuration checks, and autosuggest
//! replay.

use anyhow::Context;
use campusnav_core::{
    load_locations, load_map_config, AppConfig, FieldKey, LocationDirectory, SuggestController,
};

pub(crate) fn load_directory(config: &AppConfig) -> anyhow::Result<LocationDirectory> {
    load_locations(&config.locations_path).with_context(|| {
        format!(
            "failed to load locations from {}",
            config.locations_path.display()
        )
    })
}

pub(crate) fn run_list(config: &AppConfig) -> anyhow::Result<()> {
    let directory = load_directory(config)?;
    if directory.is_empty() {
        println!("no locations configured");
        return Ok(());
    }
    for record in directory.iter() {
        match record.full_street_address() {
            Some(address) => println!("{:<32}{}", record.name(), address),
            None => println!("{}", record.name()),
        }
    }
    Ok(())
}

pub(crate) fn run_check(config: &AppConfig) -> anyhow::Result<()> {
    let mut failures = 0;

    match load_map_config(&config.config_path) {
        Ok(map) => println!(
            "ok    {}  center {}, multiple routes {}",
            config.config_path.display(),
            map.center,
            if map.allow_multiple_routes { "on" } else { "off" }
        ),
        Err(e) => {
            failures += 1;
            println!("error {}  {e}", config.config_path.display());
        }
    }

    match load_locations(&config.locations_path) {
        Ok(directory) => println!(
            "ok    {}  {} locations",
            config.locations_path.display(),
            directory.len()
        ),
        Err(e) => {
            failures += 1;
            println!("error {}  {e}", config.locations_path.display());
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} configuration document(s) failed to load");
    }
    Ok(())
}

pub(crate) fn run_suggest(config: &AppConfig, query: &str, keys: &[FieldKey]) -> anyhow::Result<()> {
    let directory = load_directory(config)?;
    let names = directory.all_names();

    let mut controller = SuggestController::new();
    controller.on_text_changed(query, &names);
    print_candidates(&controller);

    for &key in keys {
        controller.on_key(key);
        tracing::debug!(?key, value = controller.value(), "key applied");
    }

    if !keys.is_empty() {
        print_candidates(&controller);
    }
    println!("value: {}", controller.value());
    Ok(())
}

fn print_candidates(controller: &SuggestController) {
    let highlighted = controller.highlighted();
    for (index, candidate) in controller.candidates().iter().enumerate() {
        let marker = if highlighted == Some(index) { ">" } else { " " };
        println!("{marker} {candidate}");
    }
}
