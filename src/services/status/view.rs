// 界面状态推导
//
// 纯函数：只读取状态模型和兼容策略，生成展示用的文本和按钮可用性。

use super::state::StatusModel;
use crate::models::{RUNTIME_NAME, TOOL_NAME};
use crate::services::tool::SupportedVersionSet;
use serde::Serialize;

/// 当前版本与所选版本的关系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Compatibility {
    /// 尚未检测到版本
    Unknown,
    /// 高于最高支持版本
    TooHigh,
    Matched,
    Compatible,
    Incompatible,
}

impl Compatibility {
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Compatibility::Unknown => None,
            Compatibility::TooHigh => Some("⚠️ 版本过高，不支持汉化"),
            Compatibility::Matched => Some("✅ 版本匹配"),
            Compatibility::Compatible => Some("✅ 版本兼容"),
            Compatibility::Incompatible => Some("❌ 版本不兼容"),
        }
    }
}

/// 展示层所需的全部状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub status_line: String,
    pub runtime_label: String,
    pub tool_label: String,
    pub update_label: Option<String>,
    pub version_info: String,
    pub compatibility: Compatibility,
    pub warning: Option<String>,
    pub busy: bool,
    pub detect_enabled: bool,
    pub check_update_enabled: bool,
    pub apply_enabled: bool,
    pub revert_enabled: bool,
}

pub fn derive_view(model: &StatusModel, policy: &SupportedVersionSet) -> ViewState {
    let idle = model.is_idle();
    let tool_installed = model.tool().is_installed();
    let runtime_installed = model.runtime().is_installed();
    let current = model.tool().version();
    let selected = model.selected_version();

    let runtime_label = match model.runtime().version() {
        Some(version) if runtime_installed => format!("✅ {RUNTIME_NAME}: {version}"),
        _ => format!("❌ {RUNTIME_NAME}: 未安装"),
    };

    let tool_label = match current {
        Some(version) if tool_installed => format!("✅ {TOOL_NAME}: v{version}"),
        _ => format!("❌ {TOOL_NAME}: 未安装"),
    };

    let update_label = model
        .update()
        .filter(|_| tool_installed)
        .map(|info| {
            if info.update_available {
                format!("🔄 最新版本: v{} (可更新)", info.latest_version)
            } else {
                format!("✅ 已是最新版本: v{}", info.latest_version)
            }
        });

    let version_info = match current {
        Some(version) => {
            let mut text = format!("当前: {version}\n选择: {selected}");
            if let Some(info) = model.update().filter(|info| !info.is_unknown()) {
                text.push_str(&format!("\n最新: {}", info.latest_version));
            }
            text
        }
        None => "当前: 未检测".to_string(),
    };

    let compatibility = match current {
        None => Compatibility::Unknown,
        Some(version) if !policy.is_supported(version) => Compatibility::TooHigh,
        Some(version) if version == selected => Compatibility::Matched,
        Some(version) if policy.is_compatible(version, selected) => Compatibility::Compatible,
        Some(_) => Compatibility::Incompatible,
    };

    let warning = match (current, compatibility) {
        (Some(version), Compatibility::TooHigh) => Some(format!(
            "⚠️ v{version} 版本过高，不支持汉化\n最高支持版本：v{}",
            policy.max_supported()
        )),
        (Some(version), Compatibility::Incompatible) => Some(format!(
            "⚠️ 版本不兼容\n当前v{version}不兼容选择的v{selected}\n请选择v{version}或更低版本"
        )),
        _ => None,
    };

    let status_line = if let Some(text) = model.phase().busy_text() {
        text.to_string()
    } else if !tool_installed {
        format!("请先安装 {TOOL_NAME}")
    } else if !runtime_installed {
        format!("请先安装 {RUNTIME_NAME}")
    } else {
        model.last_note().unwrap_or("就绪").to_string()
    };

    let action_enabled = idle && model.action_permitted(policy);

    ViewState {
        status_line,
        runtime_label,
        tool_label,
        update_label,
        version_info,
        compatibility,
        warning,
        busy: !idle,
        detect_enabled: idle,
        check_update_enabled: idle && tool_installed,
        apply_enabled: action_enabled,
        revert_enabled: action_enabled,
    }
}
