// 命令行参数与命令处理

mod localize_commands;
mod render;

pub use localize_commands::run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Codex CLI 汉化工具
#[derive(Debug, Parser)]
#[command(name = "codex-localizer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// 配置文件路径（默认 ~/.codex-localizer/config.json）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 日志级别（error/warn/info/debug/trace），覆盖配置文件
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// 以 JSON 输出界面状态
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 检测 Node.js 与 Codex CLI 并显示兼容状态
    Status,

    /// 检测 Codex CLI 是否有新版本
    CheckUpdate,

    /// 执行汉化
    Apply {
        /// 目标版本（必须在支持列表中，默认最高支持版本）
        #[arg(long)]
        target: Option<String>,
    },

    /// 恢复英文原版
    Revert {
        /// 目标版本（必须在支持列表中，默认最高支持版本）
        #[arg(long)]
        target: Option<String>,
    },

    /// 写入默认配置文件（已存在时不覆盖）
    InitConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_apply_with_target() {
        let cli = Cli::try_parse_from(["codex-localizer", "apply", "--target", "0.40.0"]).unwrap();
        match cli.command {
            Commands::Apply { target } => assert_eq!(target.as_deref(), Some("0.40.0")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "codex-localizer",
            "status",
            "--json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["codex-localizer"]).is_err());
    }
}
