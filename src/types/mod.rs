//! Core type definitions for doppel

mod error;
mod event;

pub use error::MirrorError;
pub use event::{MirrorEvent, PassStats};
