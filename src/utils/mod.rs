pub mod command;
pub mod config;
pub mod platform;

pub use command::*;
pub use config::*;
pub use platform::*;
