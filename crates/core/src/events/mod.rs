mod sink;
mod types;

pub use sink::*;
pub use types::*;
