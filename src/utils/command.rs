use super::platform::PlatformInfo;
use encoding_rs::Encoding;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// 超时时写入 stderr 的提示
pub const TIMEOUT_MESSAGE: &str = "命令超时";

/// 命令执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

/// 按代码页解码命令输出
///
/// 合法的 UTF-8 直接使用；否则按给定代码页解码（如 cmd.exe 以 CP936 输出的错误信息），
/// 代码页未知时按 UTF-8 解码，无法解码的字节替换为 U+FFFD。
pub fn decode_output(bytes: &[u8], code_page: Option<u32>) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    match code_page.and_then(encoding_for_code_page) {
        Some(encoding) => encoding.decode(bytes).0.into_owned(),
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn encoding_for_code_page(code_page: u32) -> Option<&'static Encoding> {
    let encoding = match code_page {
        936 => encoding_rs::GBK,
        54936 => encoding_rs::GB18030,
        950 => encoding_rs::BIG5,
        932 => encoding_rs::SHIFT_JIS,
        949 => encoding_rs::EUC_KR,
        866 => encoding_rs::IBM866,
        1250 => encoding_rs::WINDOWS_1250,
        1251 => encoding_rs::WINDOWS_1251,
        1252 => encoding_rs::WINDOWS_1252,
        65001 => encoding_rs::UTF_8,
        _ => return None,
    };
    Some(encoding)
}

/// 当前控制台输出代码页；没有控制台时退回 OEM 代码页
#[cfg(windows)]
fn active_code_page() -> Option<u32> {
    // SAFETY: 两个函数都没有参数，只读取进程的代码页设置
    let console = unsafe { windows_sys::Win32::System::Console::GetConsoleOutputCP() };
    let code_page = if console != 0 {
        console
    } else {
        unsafe { windows_sys::Win32::Globalization::GetOEMCP() }
    };
    (code_page != 0).then_some(code_page)
}

#[cfg(not(windows))]
fn active_code_page() -> Option<u32> {
    None
}

impl CommandResult {
    /// 输出按当前代码页解码并去除首尾空白
    pub fn from_output(output: Output) -> Self {
        let code_page = active_code_page();
        CommandResult {
            success: output.status.success(),
            stdout: decode_output(&output.stdout, code_page).trim().to_string(),
            stderr: decode_output(&output.stderr, code_page).trim().to_string(),
            exit_code: output.status.code(),
        }
    }

    pub fn from_error(error: std::io::Error) -> Self {
        Self::failure(error.to_string())
    }

    pub fn timed_out() -> Self {
        Self::failure(TIMEOUT_MESSAGE)
    }

    fn failure(stderr: impl Into<String>) -> Self {
        CommandResult {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        !self.success && self.stderr == TIMEOUT_MESSAGE
    }
}

/// 命令执行器
///
/// 通过平台 shell 执行命令字符串，所有失败（非零退出、超时、无法启动）
/// 都转换为 `success == false` 的 `CommandResult`，不会返回错误。
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    platform: PlatformInfo,
}

impl CommandExecutor {
    pub fn new() -> Self {
        CommandExecutor {
            platform: PlatformInfo::current(),
        }
    }

    /// 执行命令（使用增强的 PATH），超时后终止子进程
    pub async fn run(&self, command_str: &str, timeout: Duration) -> CommandResult {
        self.spawn_and_wait(command_str, None, timeout).await
    }

    /// 在指定目录下执行命令
    pub async fn run_in_dir(
        &self,
        command_str: &str,
        dir: &Path,
        timeout: Duration,
    ) -> CommandResult {
        self.spawn_and_wait(command_str, Some(dir), timeout).await
    }

    async fn spawn_and_wait(
        &self,
        command_str: &str,
        dir: Option<&Path>,
        timeout: Duration,
    ) -> CommandResult {
        let (shell, flag) = self.platform.shell();
        let mut command = Command::new(shell);
        command.arg(flag);

        // cmd.exe 不识别 \" 转义，命令字符串需原样传入
        #[cfg(windows)]
        command.raw_arg(command_str);
        #[cfg(not(windows))]
        command.arg(command_str);

        command
            .env("PATH", self.platform.build_enhanced_path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(target_os = "windows")]
        command.creation_flags(0x08000000); // CREATE_NO_WINDOW

        if let Some(dir) = dir {
            command.current_dir(dir);
        }

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(command = %command_str, error = %e, "命令启动失败");
                return CommandResult::from_error(e);
            }
        };

        // 超时后 wait 被 drop，kill_on_drop 负责终止子进程
        let result = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => CommandResult::from_output(output),
            Ok(Err(e)) => CommandResult::from_error(e),
            Err(_) => {
                tracing::warn!(
                    command = %command_str,
                    timeout_secs = timeout.as_secs_f64(),
                    "命令执行超时"
                );
                CommandResult::timed_out()
            }
        };

        tracing::debug!(
            command = %command_str,
            success = result.success,
            exit_code = ?result.exit_code,
            stdout = %result.stdout,
            stderr = %result.stderr,
            "命令执行完成"
        );

        result
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}
