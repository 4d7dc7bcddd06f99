//! Config domain: tuning loaded from `assets/data/tuning.ron`.

mod data;
mod loader;
mod validation;


use bevy::prelude::*;
use std::path::Path;

use crate::config::loader::load_tuning;
use crate::config::validation::validate_tuning;

/// Relative to the working directory, alongside Bevy's asset root.
const TUNING_PATH: &str = "assets/data/tuning.ron";

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_tuning_resources);
    }
}

/// Replace the compiled-in tuning resources with the file's values. Any
/// failure keeps the defaults.
fn load_tuning_resources(mut commands: Commands) {
    let path = Path::new(TUNING_PATH);
    let tuning = match load_tuning(path) {
        Ok(tuning) => tuning,
        Err(e) => {
            warn!("{}; using default tuning", e);
            return;
        }
    };

    let errors = validate_tuning(&tuning);
    if !errors.is_empty() {
        for error in &errors {
            warn!("{}", error);
        }
        warn!(
            "{} invalid value(s) in {}; using default tuning",
            errors.len(),
            path.display()
        );
        return;
    }

    commands.insert_resource(tuning.movement_tuning());
    commands.insert_resource(tuning.ability_tuning());
    commands.insert_resource(tuning.projectile_tuning());
    info!(
        "Loaded tuning from {} (starting scene {:?})",
        path.display(),
        tuning.starting_scene
    );
}
