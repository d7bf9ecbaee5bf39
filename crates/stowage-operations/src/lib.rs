pub mod context;
pub mod types;

pub mod import;
pub mod inspect;
pub mod list;
pub mod remove;
pub mod tag;

pub use context::StowageContext;
pub use types::*;
