//! Request handlers.

pub mod health;
pub mod panels;
pub mod sessions;
pub mod video;

pub use health::*;
pub use panels::*;
pub use sessions::*;
pub use video::*;
