pub mod executor;
pub mod pipeline;
pub mod tasks;

pub use executor::*;
pub use pipeline::*;
pub use tasks::*;
