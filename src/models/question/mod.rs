pub mod normalize;
pub mod types;

pub use normalize::*;
pub use types::*;
