#![forbid(unsafe_code)]

pub mod access_service;
pub mod backend;
pub mod catalog_service;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod purchase_service;

pub use access_service::AccessGateService;
pub use backend::{Backend, BackendCall, HttpBackend, InMemoryBackend};
pub use catalog_service::CatalogService;
pub use config::{ApiFlavor, ClientConfig, PurchaseMode};
pub use controller::ViewerController;
pub use error::{BackendError, ConfigError, GateError};
pub use host::Host;
pub use purchase_service::PurchaseService;
