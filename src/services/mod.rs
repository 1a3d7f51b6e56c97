// 服务层模块
//
// - tool: 版本比较、兼容策略、环境检测、汉化脚本
// - status: 状态模型与编排器

pub mod status;
pub mod tool;

pub use status::{Orchestrator, Trigger, ViewState};
pub use tool::{EnvironmentDetector, SupportedVersionSet};
