//! Play a replay script against a weapon and print what happened.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use combat_content::{ConfigLoader, ReplayLoader, SpecialLoader, WeaponLoader};
use combat_core::{CombatConfig, CombatEngine};

use crate::{config, player};

/// Play a replay script against a weapon
#[derive(Parser)]
pub struct Run {
    /// Weapon combat definition (RON)
    #[arg(short, long, value_name = "PATH")]
    weapon: PathBuf,

    /// Weapon special definition (RON)
    #[arg(short, long, value_name = "PATH")]
    special: Option<PathBuf>,

    /// Replay script (RON)
    #[arg(long, value_name = "PATH")]
    script: PathBuf,

    /// Combat configuration (TOML); defaults apply when omitted
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fixed tick length in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 1.0 / 60.0)]
    step: f32,
}

impl Run {
    pub fn execute(self) -> Result<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            anyhow::bail!("--step must be a positive number of seconds, got {}", self.step);
        }

        let config = match &self.config {
            Some(path) => ConfigLoader::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => CombatConfig::default(),
        };
        let config = config::from_env(config);

        let weapon = WeaponLoader::load(&self.weapon)
            .with_context(|| format!("Failed to load weapon: {}", self.weapon.display()))?;

        let special = self
            .special
            .as_deref()
            .map(|path| {
                SpecialLoader::load(path)
                    .with_context(|| format!("Failed to load special: {}", path.display()))
            })
            .transpose()?;

        let script = ReplayLoader::load(&self.script)
            .with_context(|| format!("Failed to load replay: {}", self.script.display()))?;

        println!("{} {}", style("Weapon:").bold().cyan(), weapon.weapon_id);
        println!(
            "{} {}",
            style("Special:").bold().cyan(),
            special
                .as_ref()
                .map(|s| s.action.ability_id())
                .filter(|id| !id.is_empty())
                .unwrap_or("none")
        );
        println!(
            "{} {} ({} entries, {:.2}s)",
            style("Script:").bold().cyan(),
            self.script.display(),
            script.entries.len(),
            script.end_time()
        );
        println!();

        let mut engine = CombatEngine::headless(&config);
        engine.set_combat_definition(Some(Arc::new(weapon)));
        engine.set_special_definition(special.map(Arc::new));

        let summary = player::play(&mut engine, &script, self.step);

        println!("{}", style("=== Replay Summary ===").bold().green());
        println!();

        println!("{}", style("Steps:").bold().yellow());
        if summary.steps_started.is_empty() {
            println!("  (none)");
        }
        for (index, step) in summary.steps_started.iter().enumerate() {
            println!("  {}. {}", index + 1, step);
        }
        println!();

        println!("{}", style("Inputs:").bold().yellow());
        println!("  Started: {}", summary.inputs_started);
        println!("  Buffered: {}", summary.inputs_buffered);
        println!("  Rejected: {}", summary.inputs_rejected);
        println!("  Hits: {}", summary.hits);
        println!();

        println!("{}", style("Special:").bold().yellow());
        println!("  Fired: {}", summary.specials_consumed);
        println!("  Denied: {}", summary.specials_denied);
        println!();

        println!(
            "{} {} at {:.2}s",
            style("Final state:").bold().cyan(),
            summary.final_state,
            summary.ended_at
        );

        Ok(())
    }
}
