pub mod request;
pub mod response;

pub use request::{CreateImageRequestBody, ImageResponseFormat};
pub use response::{CreateImageResponse, ImageData};
