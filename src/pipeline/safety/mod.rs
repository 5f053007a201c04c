pub mod types;
pub mod red_flag;

pub use types::*;
pub use red_flag::*;
