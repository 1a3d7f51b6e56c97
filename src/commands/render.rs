// 终端输出

use codex_localizer::{Notice, NoticeLevel, ViewState};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct NoticeOutput<'a> {
    level: &'static str,
    title: &'a str,
    message: &'a str,
}

impl<'a> From<&'a Notice> for NoticeOutput<'a> {
    fn from(notice: &'a Notice) -> Self {
        Self {
            level: match notice.level {
                NoticeLevel::Success => "success",
                NoticeLevel::Failure => "failure",
            },
            title: &notice.title,
            message: &notice.message,
        }
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    view: &'a ViewState,
    notices: Vec<NoticeOutput<'a>>,
}

/// 以 JSON 形式输出界面状态与通知
pub fn render_json(view: &ViewState, notices: &[Notice]) -> serde_json::Result<String> {
    let report = Report {
        view,
        notices: notices.iter().map(NoticeOutput::from).collect(),
    };
    serde_json::to_string_pretty(&report)
}

/// 以文本形式输出界面状态与通知
pub fn render_text(view: &ViewState, notices: &[Notice]) -> String {
    let mut lines = vec![
        view.runtime_label.clone(),
        view.tool_label.clone(),
    ];
    if let Some(update) = &view.update_label {
        lines.push(update.clone());
    }
    lines.push(String::new());
    lines.push(view.version_info.clone());
    if let Some(label) = view.compatibility.label() {
        lines.push(label.to_string());
    }
    if let Some(warning) = &view.warning {
        lines.push(String::new());
        lines.push(warning.clone());
    }
    lines.push(String::new());
    lines.push(format!("状态: {}", view.status_line));

    for notice in notices {
        let mark = match notice.level {
            NoticeLevel::Success => "✅",
            NoticeLevel::Failure => "❌",
        };
        lines.push(format!("{mark} {}: {}", notice.title, notice.message));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_localizer::{derive_view, StatusModel, SupportedVersionSet};

    fn initial_view() -> ViewState {
        let policy = SupportedVersionSet::builtin();
        derive_view(&StatusModel::new(&policy), &policy)
    }

    #[test]
    fn test_text_includes_labels_and_notices() {
        let view = initial_view();
        let notices = vec![Notice::failure("汉化失败", "未知错误")];
        let text = render_text(&view, &notices);

        assert!(text.contains("❌ Node.js: 未安装"));
        assert!(text.contains("当前: 未检测"));
        assert!(text.ends_with("❌ 汉化失败: 未知错误"));
    }

    #[test]
    fn test_json_report_shape() {
        let view = initial_view();
        let notices = vec![Notice::success("汉化成功", "Codex CLI 已成功汉化")];
        let json = render_json(&view, &notices).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["view"]["compatibility"], "unknown");
        assert_eq!(value["view"]["detect_enabled"], true);
        assert_eq!(value["notices"][0]["level"], "success");
        assert_eq!(value["notices"][0]["title"], "汉化成功");
    }
}
