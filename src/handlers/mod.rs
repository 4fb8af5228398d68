pub mod api_json;
pub mod design_handler;
pub mod fallback_handler;
pub mod health_handler;

pub use api_json::ApiJson;
pub use fallback_handler::*;
pub use health_handler::*;
