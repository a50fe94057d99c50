//! Cache-aside groups.
//!
//! - [`ports`]: the [`Loader`](ports::Loader) port
//! - [`service`]: [`Group`](service::Group) and its builder
//! - [`registry`]: name → group lookup
//! - `flight`: joins concurrent loads of one key

mod flight;
pub mod ports;
pub mod registry;
pub mod service;
