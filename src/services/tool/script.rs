//! 汉化脚本定位与调用
//!
//! 查找顺序固定：打包资源目录 → 可执行文件同级目录 → 开发目录 → 开发目录上级。
//! 候选路径按需生成，第一个存在的文件即为结果。

use crate::core::{AppError, AppResult};
use crate::models::ScriptConfig;
use crate::utils::{CommandExecutor, CommandResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 打包环境资源目录的环境变量
pub const BUNDLE_DIR_ENV: &str = "CODEX_LOCALIZER_BUNDLE_DIR";

/// 脚本支持的两种操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptVerb {
    Apply,
    Revert,
}

/// 单个查找位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRoot {
    /// 打包资源目录：`<dir>/scripts/<name>`
    Bundle(PathBuf),
    /// 当前可执行文件所在目录：`<exe_dir>/scripts/<name>`
    ExecutableDir,
    /// 开发目录：`<dir>/scripts/<name>`，然后 `<dir>/<name>`
    DevTree(PathBuf),
    /// 开发目录的上级：`<dir>/../<name>`
    DevTreeParent(PathBuf),
}

impl SearchRoot {
    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        match self {
            SearchRoot::Bundle(dir) => vec![dir.join("scripts").join(name)],
            SearchRoot::ExecutableDir => std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
                .map(|dir| vec![dir.join("scripts").join(name)])
                .unwrap_or_default(),
            SearchRoot::DevTree(dir) => vec![dir.join("scripts").join(name), dir.join(name)],
            SearchRoot::DevTreeParent(dir) => dir
                .parent()
                .map(|parent| vec![parent.join(name)])
                .unwrap_or_default(),
        }
    }
}

/// 汉化脚本定位器
#[derive(Debug, Clone)]
pub struct ScriptLocator {
    script_name: String,
    roots: Vec<SearchRoot>,
}

impl ScriptLocator {
    pub fn with_roots(script_name: impl Into<String>, roots: Vec<SearchRoot>) -> Self {
        Self {
            script_name: script_name.into(),
            roots,
        }
    }

    /// 按默认顺序构建；打包目录取自配置，其次取环境变量
    pub fn from_config(config: &ScriptConfig) -> Self {
        let dev_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let bundle_dir = config
            .bundle_dir
            .clone()
            .or_else(|| std::env::var_os(BUNDLE_DIR_ENV).map(PathBuf::from));

        let mut roots = Vec::with_capacity(4);
        if let Some(dir) = bundle_dir {
            roots.push(SearchRoot::Bundle(dir));
        }
        roots.push(SearchRoot::ExecutableDir);
        roots.push(SearchRoot::DevTree(dev_dir.clone()));
        roots.push(SearchRoot::DevTreeParent(dev_dir));

        Self::with_roots(config.file_name.clone(), roots)
    }

    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    pub fn roots(&self) -> &[SearchRoot] {
        &self.roots
    }

    pub fn locate(&self) -> AppResult<PathBuf> {
        let mut searched = Vec::new();

        for candidate in self
            .roots
            .iter()
            .flat_map(|root| root.candidates(&self.script_name))
        {
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "找到汉化脚本");
                return Ok(candidate);
            }
            searched.push(candidate);
        }

        tracing::warn!(
            script = %self.script_name,
            searched = ?searched,
            "未找到汉化脚本"
        );
        Err(AppError::ScriptNotFound {
            name: self.script_name.clone(),
            searched,
        })
    }
}

/// 脚本执行器：定位脚本并在脚本所在目录中调用
pub struct ScriptRunner {
    locator: ScriptLocator,
    runtime_program: String,
    apply_arg: String,
    revert_arg: String,
    timeout: Duration,
    command_executor: CommandExecutor,
}

impl ScriptRunner {
    pub fn new(locator: ScriptLocator, config: &ScriptConfig) -> Self {
        Self {
            locator,
            runtime_program: config.runtime_program.clone(),
            apply_arg: config.apply_arg.clone(),
            revert_arg: config.revert_arg.clone(),
            timeout: config.timeout(),
            command_executor: CommandExecutor::new(),
        }
    }

    pub fn from_config(config: &ScriptConfig) -> Self {
        Self::new(ScriptLocator::from_config(config), config)
    }

    pub fn locator(&self) -> &ScriptLocator {
        &self.locator
    }

    pub fn verb_arg(&self, verb: ScriptVerb) -> &str {
        match verb {
            ScriptVerb::Apply => &self.apply_arg,
            ScriptVerb::Revert => &self.revert_arg,
        }
    }

    /// 找不到脚本时直接返回错误，不启动任何进程
    pub async fn run(&self, verb: ScriptVerb) -> AppResult<CommandResult> {
        let script_path = self.locator.locate()?;
        let script_dir = script_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = script_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.locator.script_name().to_string());

        let command = format!(
            "{} \"{}\" {}",
            self.runtime_program,
            file_name,
            self.verb_arg(verb)
        );

        tracing::info!(
            verb = ?verb,
            command = %command,
            dir = %script_dir.display(),
            "执行汉化脚本"
        );

        Ok(self
            .command_executor
            .run_in_dir(&command, &script_dir, self.timeout)
            .await)
    }
}
