//! Data-driven combat content and loaders.
//!
//! This crate reads authored combat data into `combat-core` types:
//! - Weapon combo graphs (RON)
//! - Weapon special rules and actions (RON)
//! - Combat timing configuration (TOML)
//! - Replay scripts used by offline tools (RON)
//!
//! Loaders validate what they read and log every issue as a warning; content
//! with issues still loads, since the runtime tolerates it.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, LoadResult, ReplayAction, ReplayEntry, ReplayLoader,
    ReplayScript, SpecialLoader, WeaponLoader,
};
