//! Solaris Sync - synchronization and tick cache client for Solaris games
//!
//! The crate logs into a game server, pulls a game's state tick by tick and
//! keeps what it pulled in a per-game cache so later runs can resume without
//! refetching:
//! - [`codec`] turns raw JSON into typed records, including tag-dispatched events
//! - [`cache`] holds snapshots, intel and events per game, backed by files
//! - [`client`] owns the cookie session and consults the cache on every read
//! - [`load`] assembles a [`load::LoadedGame`] online or from an offline dump

pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod load;
pub mod log;
pub mod models;

pub use cache::{GameCache, TickCache};
pub use client::{ClientError, SolarisClient};
pub use load::{LoadError, LoadedGame};
