//! Replay script loader.
//!
//! A replay script is a timed list of host actions used to drive a combat
//! engine offline.

use std::path::Path;

use combat_core::ComboInputType;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One host action fed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReplayAction {
    /// A combo input with its recovery hint.
    Input {
        input: ComboInputType,
        recovery: f32,
    },
    /// A hit confirmed by the host outside the timeline.
    Hit,
    Meter(f32),
    TimeInCombat(f32),
    ConsumeSpecial,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayEntry {
    /// Seconds since the start of the replay.
    pub at: f32,
    pub action: ReplayAction,
}

/// Replay script structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    /// Total simulated time. Zero means one second past the last entry.
    pub duration_seconds: f32,
    pub entries: Vec<ReplayEntry>,
}

impl ReplayScript {
    /// Time at which the replay stops.
    pub fn end_time(&self) -> f32 {
        if self.duration_seconds > 0.0 {
            return self.duration_seconds;
        }

        self.entries
            .iter()
            .map(|entry| entry.at)
            .fold(0.0, f32::max)
            + 1.0
    }
}

/// Loader for replay scripts from RON files.
pub struct ReplayLoader;

impl ReplayLoader {
    pub fn load(path: &Path) -> LoadResult<ReplayScript> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load replay {}: {}", path.display(), e))
    }

    /// Parses a script and orders its entries by time.
    ///
    /// Entries sharing a timestamp keep their written order.
    pub fn parse(content: &str) -> LoadResult<ReplayScript> {
        let mut script: ReplayScript = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse replay RON: {}", e))?;

        if let Some(entry) = script.entries.iter().find(|entry| !entry.at.is_finite()) {
            anyhow::bail!("Replay entry {:?} has a non-finite time", entry.action);
        }

        script.entries.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_replays() {
        let chain = ReplayLoader::parse(include_str!("../../data/replays/light_chain.ron"))
            .expect("light_chain parses");
        assert_eq!(chain.end_time(), 4.0);
        assert_eq!(
            chain.entries[0].action,
            ReplayAction::Input {
                input: ComboInputType::Light,
                recovery: 0.35
            }
        );

        let meter = ReplayLoader::parse(include_str!("../../data/replays/meter.ron"))
            .expect("meter parses");
        assert!(meter.entries.contains(&ReplayEntry {
            at: 1.5,
            action: ReplayAction::Meter(100.0)
        }));
    }

    #[test]
    fn entries_are_sorted_stably() {
        let script = ReplayLoader::parse(
            "(entries: [(at: 1.0, action: Hit), (at: 0.5, action: ConsumeSpecial), (at: 0.5, action: Meter(3.0))])",
        )
        .expect("parses");

        let actions: Vec<_> = script.entries.iter().map(|entry| entry.action).collect();
        assert_eq!(
            actions,
            [
                ReplayAction::ConsumeSpecial,
                ReplayAction::Meter(3.0),
                ReplayAction::Hit
            ]
        );
        assert_eq!(script.end_time(), 2.0);
    }

    #[test]
    fn round_trips_through_disk() {
        let script = ReplayScript {
            duration_seconds: 1.5,
            entries: vec![ReplayEntry {
                at: 0.25,
                action: ReplayAction::TimeInCombat(12.0),
            }],
        };

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("script.ron");
        let text = ron::ser::to_string_pretty(&script, ron::ser::PrettyConfig::default())
            .expect("serializes");
        std::fs::write(&path, text).expect("write script");

        assert_eq!(ReplayLoader::load(&path).expect("loads"), script);
    }
}
