//! Driving adapters that accept requests from the outside world.

pub mod http;
