pub mod delete;
pub mod image_probe;
pub mod media_api;
pub mod store;
pub mod thumbnail;
pub mod upload;

pub use delete::*;
pub use image_probe::*;
pub use media_api::*;
pub use store::*;
pub use thumbnail::*;
pub use upload::*;
