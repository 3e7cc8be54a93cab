//! 공통 타입.

pub mod quote;
pub mod ticker;

pub use quote::*;
pub use ticker::*;
