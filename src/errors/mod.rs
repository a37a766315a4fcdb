pub mod app_error;
pub mod link_error;

pub use app_error::AppError;
pub use link_error::LinkError;
