pub mod client;
pub mod endpoints;
pub mod error;

pub use client::ConsultationApiClient;
pub use error::FetchError;
