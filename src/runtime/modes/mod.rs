//! Mode routing
//!
//! Unified entry points for the execution modes selected by the CLI.

pub mod lookup;
pub mod server;

pub use lookup::run_lookup;
pub use server::run_server;
