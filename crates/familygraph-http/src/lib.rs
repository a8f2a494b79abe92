//! FamilyGraph HTTP - JSON API over the kinship engine
//!
//! Every response uses the `{code, message, data}` envelope; `code` is 0 on
//! success and negative on failure.

pub mod error;
pub mod handlers;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use response::Envelope;
pub use server::{create_router, serve, AppState};
