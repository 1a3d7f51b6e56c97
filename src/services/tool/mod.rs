// 工具服务模块
//
// 包含版本比较、兼容策略、环境检测和汉化脚本调用

pub mod compat;
pub mod detection;
pub mod detector_trait;
pub mod detectors;
pub mod script;
pub mod version;

pub use compat::SupportedVersionSet;
pub use detection::EnvironmentDetector;
pub use detector_trait::ToolDetector;
pub use detectors::{CodeXDetector, NodeRuntimeDetector};
pub use script::{ScriptLocator, ScriptRunner, ScriptVerb, SearchRoot};
pub use version::{compare_versions, extract_version, parse_version};
