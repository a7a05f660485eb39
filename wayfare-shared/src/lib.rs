pub mod envelope;
pub mod pii;

pub use envelope::ApiResponse;
pub use pii::Masked;
