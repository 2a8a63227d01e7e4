pub mod font;
pub mod markdown;
pub mod pdf;

pub use font::*;
pub use markdown::*;
pub use pdf::*;
