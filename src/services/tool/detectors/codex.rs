// CodeX Detector
//
// 目标工具的检测：输出中找不到 MAJOR.MINOR.PATCH 时视为未安装

use super::super::detector_trait::ToolDetector;
use super::super::version::extract_version;
use crate::models::TOOL_NAME;
use async_trait::async_trait;

pub struct CodeXDetector {
    check_command: String,
}

impl CodeXDetector {
    pub fn new(check_command: impl Into<String>) -> Self {
        Self {
            check_command: check_command.into(),
        }
    }
}

impl Default for CodeXDetector {
    fn default() -> Self {
        Self::new("codex --version")
    }
}

#[async_trait]
impl ToolDetector for CodeXDetector {
    fn tool_id(&self) -> &str {
        "codex"
    }

    fn tool_name(&self) -> &str {
        TOOL_NAME
    }

    fn check_command(&self) -> &str {
        &self.check_command
    }

    fn extract_version(&self, stdout: &str) -> Option<String> {
        extract_version(stdout)
    }
}
