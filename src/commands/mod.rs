//! Command implementations

pub mod mirror;
