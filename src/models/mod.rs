pub mod citation;
pub mod verse;

pub use citation::*;
pub use verse::*;
