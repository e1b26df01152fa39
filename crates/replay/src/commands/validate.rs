//! Check authored definitions for problems the runtime would paper over.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use combat_content::{SpecialLoader, WeaponLoader};
use combat_core::{
    DefinitionIssue, IssueSeverity, validate_combat_definition, validate_special_definition,
};

/// Check weapon and special definitions for authoring issues
#[derive(Parser)]
pub struct Validate {
    /// Weapon combat definition (RON)
    #[arg(short, long, value_name = "PATH")]
    weapon: PathBuf,

    /// Weapon special definition (RON)
    #[arg(short, long, value_name = "PATH")]
    special: Option<PathBuf>,
}

impl Validate {
    pub fn execute(self) -> Result<()> {
        let weapon = WeaponLoader::load(&self.weapon)
            .with_context(|| format!("Failed to load weapon: {}", self.weapon.display()))?;
        let mut invalid = report(&self.weapon, &validate_combat_definition(&weapon));

        if let Some(path) = &self.special {
            let special = SpecialLoader::load(path)
                .with_context(|| format!("Failed to load special: {}", path.display()))?;
            invalid += report(path, &validate_special_definition(&special));
        }

        if invalid > 0 {
            anyhow::bail!("{} invalid issue(s) found", invalid);
        }

        println!("{}", style("All definitions usable").bold().green());
        Ok(())
    }
}

/// Prints `issues` under `subject` and returns how many are invalid.
fn report(subject: &Path, issues: &[DefinitionIssue]) -> usize {
    if issues.is_empty() {
        println!("{} {}", style("ok").bold().green(), subject.display());
        return 0;
    }

    println!("{} {}", style("check").bold().yellow(), subject.display());
    for issue in issues {
        let severity = issue.severity();
        let label = match severity {
            IssueSeverity::Invalid => style(severity.as_str()).bold().red(),
            IssueSeverity::Warning => style(severity.as_str()).yellow(),
        };
        println!("  {}: {}", label, issue);
    }

    issues
        .iter()
        .filter(|issue| issue.severity() == IssueSeverity::Invalid)
        .count()
}
