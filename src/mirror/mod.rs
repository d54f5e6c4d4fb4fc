//! Mirror passes and the polling driver that repeats them

mod driver;
mod pass;

pub use driver::{mirror_once, Mirror, StopSignal};
pub use pass::MirrorPass;
