//! 状态模型与状态转换
//!
//! `transition` 是纯函数：`(StatusModel, Event) -> StatusModel'`，
//! 同时给出需要在后台执行的任务和需要发出的通知。
//! 只有控制上下文调用它，后台任务只返回 `JobOutcome`，不直接改模型。

use super::notifier::Notice;
use crate::models::{InstallationStatus, UpdateInfo, TOOL_NAME};
use crate::services::tool::{ScriptVerb, SupportedVersionSet};
use thiserror::Error;

/// 当前正在进行的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Detecting,
    CheckingUpdate,
    Applying,
    Reverting,
}

impl Phase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }

    /// 进行中的提示文字
    pub fn busy_text(&self) -> Option<&'static str> {
        match self {
            Phase::Idle => None,
            Phase::Detecting => Some("正在检测环境..."),
            Phase::CheckingUpdate => Some("正在检测新版本..."),
            Phase::Applying => Some("正在汉化..."),
            Phase::Reverting => Some("正在恢复..."),
        }
    }
}

/// 检测与兼容状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusModel {
    runtime: InstallationStatus,
    tool: InstallationStatus,
    update: Option<UpdateInfo>,
    selected_version: String,
    phase: Phase,
    last_note: Option<String>,
}

impl StatusModel {
    /// 启动时的模型：均未安装，所选版本为最高支持版本
    pub fn new(policy: &SupportedVersionSet) -> Self {
        Self {
            runtime: InstallationStatus::unchecked(),
            tool: InstallationStatus::unchecked(),
            update: None,
            selected_version: policy.max_supported().to_string(),
            phase: Phase::Idle,
            last_note: None,
        }
    }

    pub fn runtime(&self) -> &InstallationStatus {
        &self.runtime
    }

    pub fn tool(&self) -> &InstallationStatus {
        &self.tool
    }

    pub fn update(&self) -> Option<&UpdateInfo> {
        self.update.as_ref()
    }

    pub fn selected_version(&self) -> &str {
        &self.selected_version
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase.is_idle()
    }

    /// 最近一次汉化/恢复的结果提示
    pub fn last_note(&self) -> Option<&str> {
        self.last_note.as_deref()
    }

    /// 当前状态下是否允许 apply/revert
    pub fn action_permitted(&self, policy: &SupportedVersionSet) -> bool {
        match self.tool.version() {
            Some(current) if self.tool.is_installed() && self.runtime.is_installed() => {
                policy.permits_action(current, &self.selected_version)
            }
            _ => false,
        }
    }
}

/// 用户触发的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Detect,
    CheckUpdate,
    Apply,
    Revert,
}

/// 需要在后台执行的任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Detect,
    CheckUpdate { current: Option<String> },
    RunScript(ScriptVerb),
}

/// 脚本执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOutcome {
    Succeeded,
    /// 携带脚本的 stderr（可能为空）
    Failed(String),
    /// 未找到脚本，未启动任何进程
    NotFound(String),
}

/// 后台任务返回给控制上下文的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Detected {
        runtime: InstallationStatus,
        tool: InstallationStatus,
    },
    UpdateChecked(UpdateInfo),
    ScriptFinished {
        verb: ScriptVerb,
        outcome: ScriptOutcome,
    },
    /// 后台任务异常退出
    Crashed(String),
}

/// 状态模型接受的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Trigger(Trigger),
    SelectVersion(String),
    Finished(JobOutcome),
}

/// 被拒绝的触发
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("正在执行其他操作: {0:?}")]
    Busy(Phase),
    #[error("请先安装 Codex CLI")]
    ToolNotInstalled,
    #[error("请先安装 Node.js")]
    RuntimeNotInstalled,
    #[error("当前版本 v{current} 不支持汉化到所选版本 v{selected}")]
    NotPermitted { current: String, selected: String },
    #[error("不支持的版本: {0}")]
    UnsupportedSelection(String),
}

/// 一次状态转换的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub model: StatusModel,
    pub job: Option<Job>,
    pub notice: Option<Notice>,
}

impl Transition {
    fn quiet(model: StatusModel) -> Self {
        Self {
            model,
            job: None,
            notice: None,
        }
    }
}

pub fn transition(
    model: &StatusModel,
    event: Event,
    policy: &SupportedVersionSet,
) -> Result<Transition, Rejection> {
    match event {
        Event::Trigger(trigger) => start(model, trigger, policy),
        Event::SelectVersion(version) => {
            if !policy.contains(&version) {
                return Err(Rejection::UnsupportedSelection(version));
            }
            let mut next = model.clone();
            next.selected_version = version;
            Ok(Transition::quiet(next))
        }
        Event::Finished(outcome) => Ok(finish(model, outcome)),
    }
}

fn start(
    model: &StatusModel,
    trigger: Trigger,
    policy: &SupportedVersionSet,
) -> Result<Transition, Rejection> {
    if !model.is_idle() {
        return Err(Rejection::Busy(model.phase));
    }

    let mut next = model.clone();
    let job = match trigger {
        Trigger::Detect => {
            next.phase = Phase::Detecting;
            next.last_note = None;
            Job::Detect
        }
        Trigger::CheckUpdate => {
            if !model.tool.is_installed() {
                return Err(Rejection::ToolNotInstalled);
            }
            next.phase = Phase::CheckingUpdate;
            Job::CheckUpdate {
                current: model.tool.version().map(str::to_string),
            }
        }
        Trigger::Apply | Trigger::Revert => {
            ensure_action_allowed(model, policy)?;
            let verb = if trigger == Trigger::Apply {
                next.phase = Phase::Applying;
                ScriptVerb::Apply
            } else {
                next.phase = Phase::Reverting;
                ScriptVerb::Revert
            };
            Job::RunScript(verb)
        }
    };

    Ok(Transition {
        model: next,
        job: Some(job),
        notice: None,
    })
}

fn ensure_action_allowed(
    model: &StatusModel,
    policy: &SupportedVersionSet,
) -> Result<(), Rejection> {
    if !model.tool.is_installed() {
        return Err(Rejection::ToolNotInstalled);
    }
    if !model.runtime.is_installed() {
        return Err(Rejection::RuntimeNotInstalled);
    }
    if !model.action_permitted(policy) {
        return Err(Rejection::NotPermitted {
            current: model.tool.version().unwrap_or_default().to_string(),
            selected: model.selected_version.clone(),
        });
    }
    Ok(())
}

fn finish(model: &StatusModel, outcome: JobOutcome) -> Transition {
    if model.is_idle() {
        tracing::warn!(outcome = ?outcome, "空闲状态下收到任务结果");
    }

    let mut next = model.clone();
    next.phase = Phase::Idle;

    let notice = match outcome {
        JobOutcome::Detected { runtime, tool } => {
            if !tool.is_installed() {
                next.update = None;
            }
            next.runtime = runtime;
            next.tool = tool;
            None
        }
        JobOutcome::UpdateChecked(info) => {
            next.update = Some(info);
            None
        }
        JobOutcome::ScriptFinished { verb, outcome } => {
            let notice = script_notice(verb, &outcome);
            next.last_note = Some(script_note(verb, &outcome).to_string());
            Some(notice)
        }
        JobOutcome::Crashed(error) => Some(Notice::failure(
            "操作失败",
            format!("后台任务异常：\n{error}"),
        )),
    };

    Transition {
        model: next,
        job: None,
        notice,
    }
}

fn script_note(verb: ScriptVerb, outcome: &ScriptOutcome) -> &'static str {
    match (verb, outcome) {
        (ScriptVerb::Apply, ScriptOutcome::Succeeded) => "汉化完成",
        (ScriptVerb::Apply, _) => "汉化失败",
        (ScriptVerb::Revert, ScriptOutcome::Succeeded) => "恢复完成",
        (ScriptVerb::Revert, _) => "恢复失败",
    }
}

fn script_notice(verb: ScriptVerb, outcome: &ScriptOutcome) -> Notice {
    let (success_title, failure_title, action) = match verb {
        ScriptVerb::Apply => ("汉化成功", "汉化失败", "汉化"),
        ScriptVerb::Revert => ("恢复成功", "恢复失败", "恢复"),
    };

    match outcome {
        ScriptOutcome::Succeeded => {
            let message = match verb {
                ScriptVerb::Apply => format!(
                    "🎉 {TOOL_NAME} 汉化完成！\n\n现在可以使用中文界面了。\n如需恢复英文，请执行恢复原版。"
                ),
                ScriptVerb::Revert => {
                    format!("✅ {TOOL_NAME} 已恢复为英文原版！\n\n现在界面已恢复为英文显示。")
                }
            };
            Notice::success(success_title, message)
        }
        ScriptOutcome::Failed(stderr) => {
            let detail = if stderr.trim().is_empty() {
                "未知错误"
            } else {
                stderr.as_str()
            };
            Notice::failure(
                failure_title,
                format!("{action}过程中出现错误：\n{detail}"),
            )
        }
        ScriptOutcome::NotFound(message) => {
            Notice::failure(failure_title, format!("{action}失败：\n{message}"))
        }
    }
}
