pub mod error;
pub mod notice;

pub use error::AppError;
pub use notice::{Notice, NoticeLevel};
