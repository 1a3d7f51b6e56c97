use std::ffi::OsString;
use std::path::PathBuf;

/// 平台信息
#[derive(Debug, Clone)]
pub struct PlatformInfo {
    pub is_windows: bool,
    pub home_dir: Option<PathBuf>,
}

impl PlatformInfo {
    pub fn current() -> Self {
        PlatformInfo {
            is_windows: cfg!(target_os = "windows"),
            home_dir: dirs::home_dir(),
        }
    }

    /// 执行命令字符串所用的 shell 及其参数
    pub fn shell(&self) -> (&'static str, &'static str) {
        if self.is_windows {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        }
    }

    /// Node/npm 常见安装位置
    ///
    /// 从桌面环境启动时 PATH 往往不完整，这些目录排在原 PATH 之前。
    pub fn extra_search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();

        if self.is_windows {
            if let Some(appdata) = std::env::var_os("APPDATA") {
                dirs.push(PathBuf::from(appdata).join("npm"));
            }
            if let Some(program_files) = std::env::var_os("ProgramFiles") {
                dirs.push(PathBuf::from(program_files).join("nodejs"));
            }
        } else {
            if let Some(home) = &self.home_dir {
                dirs.push(home.join(".npm-global").join("bin"));
                dirs.push(home.join(".volta").join("bin"));
                dirs.push(home.join(".local").join("bin"));
            }
            dirs.push(PathBuf::from("/opt/homebrew/bin"));
            dirs.push(PathBuf::from("/usr/local/bin"));
        }

        dirs
    }

    /// 构建增强的 PATH：额外目录在前，原 PATH 在后，去重
    pub fn build_enhanced_path(&self) -> OsString {
        let current = std::env::var_os("PATH").unwrap_or_default();
        let mut entries: Vec<PathBuf> = Vec::new();

        for dir in self
            .extra_search_dirs()
            .into_iter()
            .chain(std::env::split_paths(&current))
        {
            if !entries.contains(&dir) {
                entries.push(dir);
            }
        }

        std::env::join_paths(entries).unwrap_or(current)
    }
}

impl Default for PlatformInfo {
    fn default() -> Self {
        Self::current()
    }
}
