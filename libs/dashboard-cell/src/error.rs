use thiserror::Error;

use shared_resource::FetchError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The response body did not carry the expected collection.
    #[error("Unexpected payload shape: {0}")]
    Shape(String),
}

impl DashboardError {
    pub fn is_shape(&self) -> bool {
        matches!(self, DashboardError::Shape(_) | DashboardError::Fetch(FetchError::Decode(_)))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, DashboardError::Fetch(FetchError::Network(_)))
    }
}
