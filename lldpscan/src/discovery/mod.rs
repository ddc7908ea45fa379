//! Discovery orchestration: inventory, per-switch collection, the worker
//! pool and the result document.
//!
//! Collection is written against the [`Driver`](crate::driver::Driver) trait,
//! so everything here except the connect callback runs without a network.

mod collector;
pub mod config;
mod report;
mod runner;

pub use collector::{check_switch, collect_switch};
pub use config::{ConnectOptions, Inventory, SwitchConfig};
pub use report::{ConnectivityReport, DiscoveryReport, Summary, SwitchReport};
pub use runner::{DEFAULT_CONCURRENCY, check, discover};
