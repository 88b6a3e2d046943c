pub mod file;
pub mod upload;

pub use file::*;
pub use upload::*;
