// 核心基础设施层：日志与错误类型

pub mod error;
pub mod logger;

pub use error::{AppError, AppResult};
pub use logger::init_logger;
