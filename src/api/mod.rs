//! REST boundary of the showcase backend

mod client;
mod error;
mod traits;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use traits::ApiClientTrait;

#[cfg(test)]
pub use traits::MockApiClientTrait;
