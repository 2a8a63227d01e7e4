pub mod stage;
pub mod trip;

pub use stage::*;
pub use trip::*;
