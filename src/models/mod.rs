pub mod database;
pub mod design;

pub use database::*;
pub use design::*;
