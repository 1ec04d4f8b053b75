//! HTTP layer
//!
//! - `middleware`: client IP / location request annotation
//! - `services`: route handlers

pub mod middleware;
pub mod services;
