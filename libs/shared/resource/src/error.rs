use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never reached the server or no response came back.
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16, message: Option<String> },

    /// A success response whose body was not JSON.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// Server-supplied `message` of a non-success response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            FetchError::HttpStatus { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
