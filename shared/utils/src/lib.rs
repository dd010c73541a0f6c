pub mod config;
pub mod logging;
pub mod error;

pub use self::config::*;
pub use self::logging::*;
pub use self::error::*;
