// Node.js Detector
//
// 汉化脚本的运行时。版本号直接取命令输出（如 "v20.11.0"）。

use super::super::detector_trait::ToolDetector;
use crate::models::RUNTIME_NAME;
use async_trait::async_trait;

pub struct NodeRuntimeDetector {
    check_command: String,
}

impl NodeRuntimeDetector {
    pub fn new(check_command: impl Into<String>) -> Self {
        Self {
            check_command: check_command.into(),
        }
    }
}

impl Default for NodeRuntimeDetector {
    fn default() -> Self {
        Self::new("node --version")
    }
}

#[async_trait]
impl ToolDetector for NodeRuntimeDetector {
    fn tool_id(&self) -> &str {
        "node"
    }

    fn tool_name(&self) -> &str {
        RUNTIME_NAME
    }

    fn check_command(&self) -> &str {
        &self.check_command
    }

    fn extract_version(&self, stdout: &str) -> Option<String> {
        let version = stdout.trim();
        (!version.is_empty()).then(|| version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::CommandExecutor;
    use std::time::Duration;

    #[test]
    fn test_basic_info() {
        let detector = NodeRuntimeDetector::default();
        assert_eq!(detector.tool_id(), "node");
        assert_eq!(detector.tool_name(), "Node.js");
        assert_eq!(detector.check_command(), "node --version");
    }

    #[tokio::test]
    async fn test_success_means_installed() {
        let detector = NodeRuntimeDetector::new("echo v20.11.0");
        let status = detector
            .detect(&CommandExecutor::new(), Duration::from_secs(5))
            .await;
        assert!(status.is_installed());
        assert_eq!(status.version(), Some("v20.11.0"));
    }

    #[test]
    fn test_blank_output_has_no_version() {
        let detector = NodeRuntimeDetector::default();
        assert_eq!(detector.extract_version("  \n"), None);
        assert_eq!(detector.extract_version("v20.11.0\n"), Some("v20.11.0".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_output_means_missing() {
        let detector = NodeRuntimeDetector::new("true");
        let status = detector
            .detect(&CommandExecutor::new(), Duration::from_secs(5))
            .await;
        assert!(!status.is_installed());
        assert!(status.version().is_none());
    }

    #[tokio::test]
    async fn test_failure_means_missing() {
        let detector = NodeRuntimeDetector::new("exit 127");
        let status = detector
            .detect(&CommandExecutor::new(), Duration::from_secs(5))
            .await;
        assert!(!status.is_installed());
        assert!(status.version().is_none());
    }
}
