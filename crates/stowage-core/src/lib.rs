use error::StowageError;

pub mod bundle;
pub mod digest;
pub mod error;
pub mod reference;
pub mod store;

pub type StowageResult<T> = std::result::Result<T, StowageError>;
