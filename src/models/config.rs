// 全局配置结构，放在 models 以便在库和二进制之间共享
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// 解析字符串为日志级别
    pub fn parse(level: &str) -> Option<LogLevel> {
        match level.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 日志输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

/// 日志配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub output: LogOutput,
    /// 日志目录（为空时使用 ~/.codex-localizer/logs）
    #[serde(default)]
    pub file_path: Option<String>,
}

/// 检测相关命令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// 运行时版本查询命令
    #[serde(default = "default_runtime_check_command")]
    pub runtime_check_command: String,
    /// 目标工具版本查询命令
    #[serde(default = "default_tool_check_command")]
    pub tool_check_command: String,
    /// 远程仓库最新版本查询命令
    #[serde(default = "default_registry_query_command")]
    pub registry_query_command: String,
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

fn default_runtime_check_command() -> String {
    "node --version".to_string()
}

fn default_tool_check_command() -> String {
    "codex --version".to_string()
}

fn default_registry_query_command() -> String {
    "npm view @openai/codex version".to_string()
}

fn default_command_timeout_secs() -> u64 {
    30
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            runtime_check_command: default_runtime_check_command(),
            tool_check_command: default_tool_check_command(),
            registry_query_command: default_registry_query_command(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

impl ToolsConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

/// 汉化脚本配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptConfig {
    #[serde(default = "default_script_file_name")]
    pub file_name: String,
    /// 执行脚本的解释器
    #[serde(default = "default_runtime_program")]
    pub runtime_program: String,
    /// apply 对应的脚本参数
    #[serde(default = "default_apply_arg")]
    pub apply_arg: String,
    /// revert 对应的脚本参数
    #[serde(default = "default_revert_arg")]
    pub revert_arg: String,
    #[serde(default = "default_script_timeout_secs")]
    pub timeout_secs: u64,
    /// 打包环境的资源目录（脚本位于其 scripts/ 子目录）
    #[serde(default)]
    pub bundle_dir: Option<PathBuf>,
}

fn default_script_file_name() -> String {
    "inject-chinese-final-dedup.js".to_string()
}

fn default_runtime_program() -> String {
    "node".to_string()
}

fn default_apply_arg() -> String {
    "inject".to_string()
}

fn default_revert_arg() -> String {
    "restore".to_string()
}

fn default_script_timeout_secs() -> u64 {
    60
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            file_name: default_script_file_name(),
            runtime_program: default_runtime_program(),
            apply_arg: default_apply_arg(),
            revert_arg: default_revert_arg(),
            timeout_secs: default_script_timeout_secs(),
            bundle_dir: None,
        }
    }
}

impl ScriptConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 全局配置（~/.codex-localizer/config.json）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log_config: LogConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub script: ScriptConfig,
}
