pub mod stage0_fetch;
pub mod stage1_commentary;
pub mod stage2_narration;
pub mod stage3_compose;

pub use stage0_fetch::*;
pub use stage1_commentary::*;
pub use stage2_narration::*;
pub use stage3_compose::*;
