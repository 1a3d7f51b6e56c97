// Tool Detector Trait - 安装检测接口
//
// 运行时（Node.js）和目标工具（Codex CLI）各自实现此 trait，
// 只负责执行版本查询命令并解析输出，不修改任何共享状态。

use crate::models::InstallationStatus;
use crate::utils::CommandExecutor;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait ToolDetector: Send + Sync {
    /// 工具唯一标识（如 "codex"）
    fn tool_id(&self) -> &str;

    /// 工具显示名称（如 "Codex CLI"）
    fn tool_name(&self) -> &str;

    /// 版本检查命令（如 "codex --version"）
    fn check_command(&self) -> &str;

    /// 从命令输出中提取版本号，返回 None 表示视为未安装
    fn extract_version(&self, stdout: &str) -> Option<String>;

    /// 检测安装状态
    ///
    /// 默认实现：执行 check_command，成功且能提取版本号时视为已安装
    async fn detect(&self, executor: &CommandExecutor, timeout: Duration) -> InstallationStatus {
        let result = executor.run(self.check_command(), timeout).await;

        let status = if result.success {
            match self.extract_version(&result.stdout) {
                Some(version) => InstallationStatus::installed(version),
                None => {
                    tracing::warn!(
                        tool_id = self.tool_id(),
                        stdout = %result.stdout,
                        "命令执行成功但未能识别版本号"
                    );
                    InstallationStatus::missing()
                }
            }
        } else {
            InstallationStatus::missing()
        };

        tracing::info!(
            tool_id = self.tool_id(),
            installed = status.is_installed(),
            version = ?status.version(),
            "检测完成"
        );

        status
    }
}
