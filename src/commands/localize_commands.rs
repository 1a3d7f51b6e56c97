// 汉化相关命令
//
// 每个命令都先做一次环境检测，再按需触发后续操作并等待完成。

use super::render::{render_json, render_text};
use super::{Cli, Commands};
use anyhow::Context;
use codex_localizer::utils::config::{global_config_path, load_config, write_config_to};
use codex_localizer::{
    init_logger, AppConfig, CollectingNotifier, LogLevel, Notice, Orchestrator, Rejection,
    Trigger, ViewState,
};
use std::process::ExitCode;
use std::sync::Arc;

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = load_config(cli.config.as_deref()).context("加载配置失败")?;

    if let Some(level) = cli.log_level.as_deref() {
        config.log_config.level =
            LogLevel::parse(level).with_context(|| format!("无效的日志级别: {level}"))?;
    }

    if let Err(e) = init_logger(&config.log_config) {
        eprintln!("初始化日志失败: {e:#}");
    }

    match &cli.command {
        Commands::InitConfig => init_config(&cli),
        Commands::Status => localize(&cli, &config, None, None).await,
        Commands::CheckUpdate => localize(&cli, &config, Some(Trigger::CheckUpdate), None).await,
        Commands::Apply { target } => {
            localize(&cli, &config, Some(Trigger::Apply), target.as_deref()).await
        }
        Commands::Revert { target } => {
            localize(&cli, &config, Some(Trigger::Revert), target.as_deref()).await
        }
    }
}

fn init_config(cli: &Cli) -> anyhow::Result<ExitCode> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => global_config_path().context("无法确定配置文件路径")?,
    };

    if path.exists() {
        println!("配置文件已存在: {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    write_config_to(&path, &AppConfig::default()).context("写入配置文件失败")?;
    println!("已生成默认配置: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

async fn localize(
    cli: &Cli,
    config: &AppConfig,
    trigger: Option<Trigger>,
    target: Option<&str>,
) -> anyhow::Result<ExitCode> {
    let notifier = Arc::new(CollectingNotifier::new());
    let mut orchestrator = Orchestrator::from_config(config, notifier.clone());

    orchestrator.dispatch(Trigger::Detect)?;
    let mut view = orchestrator.settle().await;

    if let Some(version) = target {
        if let Err(rejection) = orchestrator.select_version(version) {
            return rejected(cli, &orchestrator.view(), &notifier.drain(), &rejection);
        }
        view = orchestrator.view();
    }

    if let Some(trigger) = trigger {
        if let Err(rejection) = orchestrator.dispatch(trigger) {
            tracing::warn!(trigger = ?trigger, reason = %rejection, "操作被拒绝");
            return rejected(cli, &view, &notifier.drain(), &rejection);
        }
        view = orchestrator.settle().await;
    }

    let notices = notifier.drain();
    print_report(cli, &view, &notices)?;

    if notices.iter().any(Notice::is_failure) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn rejected(
    cli: &Cli,
    view: &ViewState,
    notices: &[Notice],
    rejection: &Rejection,
) -> anyhow::Result<ExitCode> {
    print_report(cli, view, notices)?;
    eprintln!("操作被拒绝: {rejection}");
    Ok(ExitCode::FAILURE)
}

fn print_report(cli: &Cli, view: &ViewState, notices: &[Notice]) -> anyhow::Result<()> {
    if cli.json {
        println!("{}", render_json(view, notices).context("序列化输出失败")?);
    } else {
        println!("{}", render_text(view, notices));
    }
    Ok(())
}
