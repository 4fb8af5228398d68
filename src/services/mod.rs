pub mod design_service;
pub mod design_store;
pub mod email_service;
pub mod file_service;
pub mod memory_design_store;
pub mod mysql_design_store;

pub use design_service::DesignService;
pub use design_store::DesignStore;
pub use email_service::*;
pub use file_service::FileService;
pub use memory_design_store::MemoryDesignStore;
pub use mysql_design_store::MySqlDesignStore;
