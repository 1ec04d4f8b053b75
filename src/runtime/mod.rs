//! Application execution modes
//!
//! - `server`: HTTP server with client IP / location annotation
//! - `lookup`: one-shot lookups printed to stdout

pub mod modes;
