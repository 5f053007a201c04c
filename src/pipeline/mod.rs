pub mod advice;
pub mod generation;
pub mod safety;
pub mod session;
