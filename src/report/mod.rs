pub mod error;
pub mod guidance;
pub mod proxy;

pub use error::{FailureBody, ReportError};
pub use proxy::{ReportProxy, ReportSuccess};
