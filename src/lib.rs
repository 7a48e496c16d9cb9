pub mod commands;
pub mod error;
pub mod graph;
pub mod manager;
pub mod manifest;
pub mod runtime;
pub mod script;

pub use error::DepsError;
pub use graph::{Package, PackageGraph};
pub use manager::PackageManager;
