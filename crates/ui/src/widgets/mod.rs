pub mod preview;
pub mod strip;
