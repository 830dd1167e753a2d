//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request span)
//!     → storage_handler.rs (decode, dispatch, map status)
//!     → storage::StorageService
//! ```

pub mod request;
pub mod server;
pub mod storage_handler;

pub use request::X_REQUEST_ID;
pub use server::HttpServer;
pub use storage_handler::{StorageHandler, STORAGE_PATH};
