//! 统一错误类型定义
//!
//! 使用 `thiserror` 定义库层错误，二进制入口通过 `anyhow` 汇总。
//! 命令执行失败不属于错误，始终以 `CommandResult` 返回。

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// 文件 I/O 错误
    #[error("文件 I/O 错误: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 序列化/反序列化错误
    #[error("配置解析错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 无法定位用户目录等环境问题
    #[error("环境错误: {0}")]
    Environment(String),

    /// 配置不合法
    #[error("无效配置: {0}")]
    InvalidConfig(String),

    /// 所有候选路径下都找不到汉化脚本
    #[error("找不到汉化脚本文件 {name}")]
    ScriptNotFound { name: String, searched: Vec<PathBuf> },
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::ScriptNotFound {
            name: "inject.js".to_string(),
            searched: vec![PathBuf::from("/tmp/scripts/inject.js")],
        };
        assert_eq!(err.to_string(), "找不到汉化脚本文件 inject.js");

        let err = AppError::io(
            "/etc/config.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/etc/config.json"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Json(_)));
    }
}
