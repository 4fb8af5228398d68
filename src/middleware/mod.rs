pub mod cors;
pub mod design_validation;
pub mod logging;
pub mod media_upload;

pub use cors::*;
pub use design_validation::*;
pub use media_upload::*;
