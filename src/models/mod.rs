pub mod enums;
pub mod symptom;

pub use enums::*;
pub use symptom::*;
