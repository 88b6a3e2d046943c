pub mod gallery;
pub mod status;
pub mod text;

pub use gallery::*;
pub use status::*;
pub use text::*;
