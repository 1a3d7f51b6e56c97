//! 编排器：控制上下文
//!
//! 唯一持有并写入 `StatusModel` 的地方。每个被接受的触发最多启动一个后台任务，
//! 任务结果通过 `JoinHandle` 交回控制上下文后再写入模型并推导界面状态。
//! 忙碌时的新触发直接拒绝，不排队也不取消进行中的任务。

use super::notifier::Notifier;
use super::state::{
    transition, Event, Job, JobOutcome, Rejection, ScriptOutcome, StatusModel, Trigger,
};
use super::view::{derive_view, ViewState};
use crate::core::AppError;
use crate::models::AppConfig;
use crate::services::tool::{EnvironmentDetector, ScriptRunner, SupportedVersionSet};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 后台任务所需的服务
pub struct JobContext {
    pub detector: EnvironmentDetector,
    pub script_runner: ScriptRunner,
}

impl JobContext {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            detector: EnvironmentDetector::new(&config.tools),
            script_runner: ScriptRunner::from_config(&config.script),
        }
    }
}

/// 在后台执行任务，只返回结果值
async fn run_job(job: Job, ctx: Arc<JobContext>) -> JobOutcome {
    match job {
        Job::Detect => {
            let runtime = ctx.detector.detect_runtime().await;
            let tool = ctx.detector.detect_tool().await;
            JobOutcome::Detected { runtime, tool }
        }
        Job::CheckUpdate { current } => {
            let info = ctx.detector.detect_latest_version(current.as_deref()).await;
            JobOutcome::UpdateChecked(info)
        }
        Job::RunScript(verb) => {
            let outcome = match ctx.script_runner.run(verb).await {
                Ok(result) if result.success => ScriptOutcome::Succeeded,
                Ok(result) => ScriptOutcome::Failed(result.stderr),
                Err(e @ AppError::ScriptNotFound { .. }) => ScriptOutcome::NotFound(e.to_string()),
                Err(e) => ScriptOutcome::Failed(e.to_string()),
            };
            JobOutcome::ScriptFinished { verb, outcome }
        }
    }
}

pub struct Orchestrator {
    model: StatusModel,
    policy: Arc<SupportedVersionSet>,
    ctx: Arc<JobContext>,
    notifier: Arc<dyn Notifier>,
    in_flight: Option<JoinHandle<JobOutcome>>,
}

impl Orchestrator {
    pub fn new(
        policy: SupportedVersionSet,
        ctx: JobContext,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            model: StatusModel::new(&policy),
            policy: Arc::new(policy),
            ctx: Arc::new(ctx),
            notifier,
            in_flight: None,
        }
    }

    /// 使用内置支持版本和配置中的命令构建
    pub fn from_config(config: &AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(
            SupportedVersionSet::builtin(),
            JobContext::from_config(config),
            notifier,
        )
    }

    pub fn model(&self) -> &StatusModel {
        &self.model
    }

    pub fn policy(&self) -> &SupportedVersionSet {
        &self.policy
    }

    pub fn view(&self) -> ViewState {
        derive_view(&self.model, &self.policy)
    }

    /// 处理用户触发；需要在 tokio 运行时中调用
    pub fn dispatch(&mut self, trigger: Trigger) -> Result<(), Rejection> {
        let next = transition(&self.model, Event::Trigger(trigger), &self.policy).map_err(|e| {
            tracing::debug!(trigger = ?trigger, reason = %e, "触发被拒绝");
            e
        })?;

        self.model = next.model;
        if let Some(job) = next.job {
            tracing::info!(trigger = ?trigger, job = ?job, "启动后台任务");
            let ctx = Arc::clone(&self.ctx);
            self.in_flight = Some(tokio::spawn(run_job(job, ctx)));
        }
        Ok(())
    }

    pub fn select_version(&mut self, version: impl Into<String>) -> Result<(), Rejection> {
        let next = transition(
            &self.model,
            Event::SelectVersion(version.into()),
            &self.policy,
        )?;
        self.model = next.model;
        Ok(())
    }

    /// 等待进行中的任务完成并写入结果；空闲时返回 None
    pub async fn next_completion(&mut self) -> Option<ViewState> {
        let handle = self.in_flight.take()?;

        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "后台任务异常退出");
                JobOutcome::Crashed(e.to_string())
            }
        };

        self.complete(outcome);
        Some(self.view())
    }

    /// 一直等待直到回到空闲状态
    pub async fn settle(&mut self) -> ViewState {
        while self.next_completion().await.is_some() {}
        self.view()
    }

    fn complete(&mut self, outcome: JobOutcome) {
        match transition(&self.model, Event::Finished(outcome), &self.policy) {
            Ok(next) => {
                self.model = next.model;
                if let Some(notice) = next.notice {
                    self.notifier.notify(&notice);
                }
            }
            Err(e) => tracing::error!(reason = %e, "任务结果无法应用"),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::models::{ScriptConfig, ToolsConfig};
    use crate::services::status::notifier::CollectingNotifier;
    use crate::services::status::state::Phase;
    use crate::services::status::view::Compatibility;
    use crate::services::tool::{ScriptLocator, SearchRoot};
    use std::path::Path;

    fn tools(runtime: &str, tool: &str) -> ToolsConfig {
        ToolsConfig {
            runtime_check_command: runtime.to_string(),
            tool_check_command: tool.to_string(),
            registry_query_command: "echo '\"0.41.0\"'".to_string(),
            command_timeout_secs: 5,
        }
    }

    fn script_config() -> ScriptConfig {
        ScriptConfig {
            file_name: "fake.sh".to_string(),
            runtime_program: "sh".to_string(),
            apply_arg: "apply".to_string(),
            revert_arg: "revert".to_string(),
            timeout_secs: 5,
            bundle_dir: None,
        }
    }

    fn orchestrator(
        tools: ToolsConfig,
        bundle: &Path,
        notifier: Arc<CollectingNotifier>,
    ) -> Orchestrator {
        let script = script_config();
        let locator =
            ScriptLocator::with_roots(&script.file_name, vec![SearchRoot::Bundle(bundle.into())]);
        let ctx = JobContext {
            detector: EnvironmentDetector::new(&tools),
            script_runner: ScriptRunner::new(locator, &script),
        };
        Orchestrator::new(SupportedVersionSet::builtin(), ctx, notifier)
    }

    fn write_script(bundle: &Path, body: &str) {
        let dir = bundle.join("scripts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("fake.sh"), body).unwrap();
    }

    #[tokio::test]
    async fn test_runtime_absent_disables_actions() {
        let bundle = tempfile::tempdir().unwrap();
        let notifier = Arc::new(CollectingNotifier::new());
        let mut orch = orchestrator(
            tools("exit 1", "echo codex-cli 0.40.0"),
            bundle.path(),
            notifier.clone(),
        );

        orch.dispatch(Trigger::Detect).unwrap();
        let view = orch.settle().await;

        assert_eq!(view.status_line, "请先安装 Node.js");
        assert!(!view.apply_enabled);
        assert!(!view.revert_enabled);
        assert_eq!(
            orch.dispatch(Trigger::Apply),
            Err(Rejection::RuntimeNotInstalled)
        );
        assert!(notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn test_apply_success_round_trip() {
        let bundle = tempfile::tempdir().unwrap();
        write_script(bundle.path(), "[ \"$1\" = apply ] || exit 9\necho done\n");
        let notifier = Arc::new(CollectingNotifier::new());
        let mut orch = orchestrator(
            tools("echo v20.11.0", "echo codex-cli 0.40.0"),
            bundle.path(),
            notifier.clone(),
        );

        orch.dispatch(Trigger::Detect).unwrap();
        let view = orch.settle().await;
        assert!(view.apply_enabled);
        assert_eq!(view.compatibility, Compatibility::Matched);

        orch.dispatch(Trigger::Apply).unwrap();
        let busy = orch.view();
        assert!(!busy.apply_enabled);
        assert_eq!(busy.status_line, "正在汉化...");

        let view = orch.settle().await;
        assert!(view.apply_enabled);
        assert_eq!(view.status_line, "汉化完成");

        let notices = notifier.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "汉化成功");
        assert!(!notices[0].is_failure());
    }

    #[tokio::test]
    async fn test_script_failure_surfaces_stderr() {
        let bundle = tempfile::tempdir().unwrap();
        write_script(bundle.path(), "echo 'codex not found' 1>&2\nexit 1\n");
        let notifier = Arc::new(CollectingNotifier::new());
        let mut orch = orchestrator(
            tools("echo v20.11.0", "echo codex-cli 0.40.0"),
            bundle.path(),
            notifier.clone(),
        );

        orch.dispatch(Trigger::Detect).unwrap();
        orch.settle().await;
        orch.dispatch(Trigger::Revert).unwrap();
        let view = orch.settle().await;

        assert_eq!(view.status_line, "恢复失败");
        assert!(view.revert_enabled);
        let notices = notifier.drain();
        assert_eq!(notices[0].title, "恢复失败");
        assert!(notices[0].message.contains("codex not found"));
    }

    #[tokio::test]
    async fn test_missing_script_is_reported() {
        let bundle = tempfile::tempdir().unwrap();
        let notifier = Arc::new(CollectingNotifier::new());
        let mut orch = orchestrator(
            tools("echo v20.11.0", "echo codex-cli 0.40.0"),
            bundle.path(),
            notifier.clone(),
        );

        orch.dispatch(Trigger::Detect).unwrap();
        orch.settle().await;
        orch.dispatch(Trigger::Apply).unwrap();
        orch.settle().await;

        let notices = notifier.drain();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_failure());
        assert!(notices[0].message.contains("找不到汉化脚本文件 fake.sh"));
    }

    #[tokio::test]
    async fn test_too_high_version_blocks_apply() {
        let bundle = tempfile::tempdir().unwrap();
        let notifier = Arc::new(CollectingNotifier::new());
        let mut orch = orchestrator(
            tools("echo v20.11.0", "echo codex-cli 0.41.0"),
            bundle.path(),
            notifier,
        );

        orch.dispatch(Trigger::Detect).unwrap();
        let view = orch.settle().await;

        assert_eq!(view.compatibility, Compatibility::TooHigh);
        assert!(!view.apply_enabled);
        let warning = view.warning.unwrap();
        assert!(warning.contains("v0.41.0"));
        assert!(warning.contains("v0.40.0"));
        assert!(matches!(
            orch.dispatch(Trigger::Apply),
            Err(Rejection::NotPermitted { .. })
        ));
    }

    #[tokio::test]
    async fn test_redetect_while_in_flight_is_noop() {
        let bundle = tempfile::tempdir().unwrap();
        let notifier = Arc::new(CollectingNotifier::new());
        let mut orch = orchestrator(
            tools("echo v20.11.0", "sleep 1; echo codex-cli 0.40.0"),
            bundle.path(),
            notifier,
        );

        orch.dispatch(Trigger::Detect).unwrap();
        assert_eq!(
            orch.dispatch(Trigger::Detect),
            Err(Rejection::Busy(Phase::Detecting))
        );
        assert_eq!(orch.model().phase(), Phase::Detecting);

        let view = orch.settle().await;
        assert!(orch.model().is_idle());
        assert_eq!(orch.model().tool().version(), Some("0.40.0"));
        assert_eq!(view.tool_label, "✅ Codex CLI: v0.40.0");
        assert!(orch.next_completion().await.is_none());
    }

    #[tokio::test]
    async fn test_check_update() {
        let bundle = tempfile::tempdir().unwrap();
        let notifier = Arc::new(CollectingNotifier::new());
        let mut orch = orchestrator(
            tools("echo v20.11.0", "echo codex-cli 0.40.0"),
            bundle.path(),
            notifier,
        );

        assert_eq!(
            orch.dispatch(Trigger::CheckUpdate),
            Err(Rejection::ToolNotInstalled)
        );

        orch.dispatch(Trigger::Detect).unwrap();
        orch.settle().await;
        orch.dispatch(Trigger::CheckUpdate).unwrap();
        let view = orch.settle().await;

        let update = orch.model().update().unwrap();
        assert_eq!(update.latest_version, "0.41.0");
        assert!(update.update_available);
        assert_eq!(
            view.update_label.as_deref(),
            Some("🔄 最新版本: v0.41.0 (可更新)")
        );
    }

    #[tokio::test]
    async fn test_selection_outside_set_rejected() {
        let bundle = tempfile::tempdir().unwrap();
        let notifier = Arc::new(CollectingNotifier::new());
        let mut orch = orchestrator(
            tools("echo v20.11.0", "echo codex-cli 0.40.0"),
            bundle.path(),
            notifier,
        );

        assert!(orch.select_version("0.40.0").is_ok());
        assert_eq!(
            orch.select_version("0.30.0"),
            Err(Rejection::UnsupportedSelection("0.30.0".to_string()))
        );
        assert_eq!(orch.model().selected_version(), "0.40.0");
    }
}
