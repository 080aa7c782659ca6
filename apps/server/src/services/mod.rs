//! Business logic services.

pub mod ai;
pub mod extraction;
pub mod storage;
pub mod timeline;
pub mod upload;

pub use ai::AiGateway;
pub use storage::LocalStorage;
