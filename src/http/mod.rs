pub mod backend;
pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod utils;

pub use backend::{HttpBackend, ReqwestBackend};
pub use client::Client;
pub use error::HttpError;
pub use request::HttpRequest;
pub use response::HttpResponse;
pub use utils::detect_method;
