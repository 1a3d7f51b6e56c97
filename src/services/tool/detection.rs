use super::detector_trait::ToolDetector;
use super::detectors::{CodeXDetector, NodeRuntimeDetector};
use super::version::compare_versions;
use crate::models::{InstallationStatus, ToolsConfig, UpdateInfo};
use crate::utils::CommandExecutor;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

/// 环境检测服务
///
/// 三个查询互相独立，只返回结果值，不持有也不修改状态模型。
pub struct EnvironmentDetector {
    runtime: Arc<dyn ToolDetector>,
    tool: Arc<dyn ToolDetector>,
    registry_query_command: String,
    command_executor: CommandExecutor,
    timeout: Duration,
}

impl EnvironmentDetector {
    pub fn new(config: &ToolsConfig) -> Self {
        EnvironmentDetector {
            runtime: Arc::new(NodeRuntimeDetector::new(&config.runtime_check_command)),
            tool: Arc::new(CodeXDetector::new(&config.tool_check_command)),
            registry_query_command: config.registry_query_command.clone(),
            command_executor: CommandExecutor::new(),
            timeout: config.command_timeout(),
        }
    }

    pub fn runtime_detector(&self) -> &dyn ToolDetector {
        self.runtime.as_ref()
    }

    pub fn tool_detector(&self) -> &dyn ToolDetector {
        self.tool.as_ref()
    }

    pub async fn detect_runtime(&self) -> InstallationStatus {
        self.runtime
            .detect(&self.command_executor, self.timeout)
            .await
    }

    pub async fn detect_tool(&self) -> InstallationStatus {
        self.tool.detect(&self.command_executor, self.timeout).await
    }

    /// 查询远程仓库的最新版本
    ///
    /// 失败或无输出时返回占位的"未知"版本且不提示更新
    pub async fn detect_latest_version(&self, current: Option<&str>) -> UpdateInfo {
        let result = self
            .command_executor
            .run(&self.registry_query_command, self.timeout)
            .await;

        if !result.success {
            tracing::warn!(stderr = %result.stderr, "获取最新版本失败");
            return UpdateInfo::unknown();
        }

        let latest = result.stdout.trim().trim_matches('"').trim().to_string();
        if latest.is_empty() {
            tracing::warn!("仓库返回了空的版本号");
            return UpdateInfo::unknown();
        }

        let current = current.unwrap_or("0.0.0");
        let update_available = compare_versions(&latest, current) == Ordering::Greater;

        tracing::info!(
            latest_version = %latest,
            current_version = %current,
            update_available,
            "最新版本检测完成"
        );

        UpdateInfo {
            latest_version: latest,
            update_available,
        }
    }
}

impl Default for EnvironmentDetector {
    fn default() -> Self {
        Self::new(&ToolsConfig::default())
    }
}
