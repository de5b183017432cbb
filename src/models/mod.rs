//! Data models

pub mod track;
pub mod input;
pub mod record;

pub use track::*;
pub use input::*;
pub use record::*;
