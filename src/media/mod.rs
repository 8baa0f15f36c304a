//! Background clip selection and ffmpeg-driven composition.

pub mod background;
pub mod composer;
pub mod error;
pub mod probe;

pub use background::*;
pub use composer::*;
pub use error::*;
pub use probe::*;
