pub mod error;
pub mod format;
pub mod logger;
pub mod query;
pub mod query_processor;
pub mod record;

pub use error::*;
pub use format::*;
pub use query::*;
pub use query_processor::*;
pub use record::*;
