// lib.rs - 暴露检测与编排服务给命令行前端使用

pub mod core;
pub mod models;
pub mod services;
pub mod utils;

pub use models::*;
pub use services::status::{
    derive_view, CollectingNotifier, Compatibility, JobContext, Notice, NoticeLevel, Notifier,
    Orchestrator, Phase, Rejection, StatusModel, TracingNotifier, Trigger, ViewState,
};
pub use services::tool::{
    compare_versions, EnvironmentDetector, ScriptLocator, ScriptRunner, ScriptVerb,
    SupportedVersionSet,
};
pub use utils::command::{CommandExecutor, CommandResult};

// 导出核心模块
pub use core::{init_logger, AppError, AppResult};
