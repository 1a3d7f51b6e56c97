use serde::{Deserialize, Serialize};

/// 运行时显示名称
pub const RUNTIME_NAME: &str = "Node.js";

/// 目标工具显示名称
pub const TOOL_NAME: &str = "Codex CLI";

/// 无法获取最新版本时的占位值
pub const UNKNOWN_VERSION: &str = "未知";

/// 安装状态
///
/// `version` 仅在 `installed == true` 时存在，只能通过构造函数整体替换。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallationStatus {
    installed: bool,
    version: Option<String>,
    checked: bool,
}

impl InstallationStatus {
    /// 启动时的初始状态（尚未检测）
    pub fn unchecked() -> Self {
        Self::default()
    }

    pub fn installed(version: impl Into<String>) -> Self {
        Self {
            installed: true,
            version: Some(version.into()),
            checked: true,
        }
    }

    pub fn missing() -> Self {
        Self {
            installed: false,
            version: None,
            checked: true,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }
}

/// 更新检测结果，仅在显式检测后存在
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInfo {
    pub latest_version: String,
    pub update_available: bool,
}

impl UpdateInfo {
    pub fn unknown() -> Self {
        Self {
            latest_version: UNKNOWN_VERSION.to_string(),
            update_available: false,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.latest_version == UNKNOWN_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_present_iff_installed() {
        let installed = InstallationStatus::installed("0.40.0");
        assert!(installed.is_installed());
        assert_eq!(installed.version(), Some("0.40.0"));

        let missing = InstallationStatus::missing();
        assert!(!missing.is_installed());
        assert!(missing.version().is_none());
        assert!(missing.is_checked());

        let initial = InstallationStatus::unchecked();
        assert!(!initial.is_installed());
        assert!(!initial.is_checked());
    }

    #[test]
    fn test_unknown_update_info() {
        let info = UpdateInfo::unknown();
        assert!(info.is_unknown());
        assert!(!info.update_available);
    }
}
