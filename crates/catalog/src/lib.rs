pub mod config;
pub mod metadata;
pub mod model;
pub mod scanner;
pub mod service;
pub mod thumbnail;

pub use config::Config;
pub use model::*;
pub use service::CatalogService;
