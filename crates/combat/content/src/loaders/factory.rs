//! Content factory for loading combat data from a data directory.

use std::path::{Path, PathBuf};

use combat_core::{CombatConfig, WeaponCombatDefinition, WeaponSpecialDefinition};

use crate::loaders::{
    ConfigLoader, LoadResult, ReplayLoader, ReplayScript, SpecialLoader, WeaponLoader,
};

/// Content factory that loads combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── weapons/
/// │   └── longsword.ron
/// ├── specials/
/// │   └── longsword.ron
/// └── replays/
///     └── light_chain.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the sample data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load combat configuration from `combat.toml`, falling back to the
    /// defaults when the file does not exist.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("combat.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no combat.toml, using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load `weapons/<weapon_id>.ron`.
    pub fn load_weapon(&self, weapon_id: &str) -> LoadResult<WeaponCombatDefinition> {
        let path = self.data_dir.join("weapons").join(format!("{weapon_id}.ron"));
        WeaponLoader::load(&path)
    }

    /// Load `specials/<special_id>.ron`.
    pub fn load_special(&self, special_id: &str) -> LoadResult<WeaponSpecialDefinition> {
        let path = self.data_dir.join("specials").join(format!("{special_id}.ron"));
        SpecialLoader::load(&path)
    }

    /// Load `replays/<name>.ron`.
    pub fn load_replay(&self, name: &str) -> LoadResult<ReplayScript> {
        let path = self.data_dir.join("replays").join(format!("{name}.ron"));
        ReplayLoader::load(&path)
    }
}
