use crate::core::{AppError, AppResult};
use crate::models::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// 配置目录 (~/.codex-localizer)，若不存在则创建
pub fn config_dir() -> AppResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| AppError::Environment("无法获取用户主目录".to_string()))?;
    let config_dir = home_dir.join(".codex-localizer");
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).map_err(|e| AppError::io(&config_dir, e))?;
    }
    Ok(config_dir)
}

/// 全局配置文件路径
pub fn global_config_path() -> AppResult<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// 读取全局配置（若文件不存在返回 Ok(None)）
pub fn read_global_config() -> AppResult<Option<AppConfig>> {
    read_config_from(&global_config_path()?)
}

/// 写入全局配置
pub fn write_global_config(config: &AppConfig) -> AppResult<()> {
    write_config_to(&global_config_path()?, config)
}

pub fn read_config_from(path: &Path) -> AppResult<Option<AppConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    let config: AppConfig = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), "已读取配置文件");
    Ok(Some(config))
}

pub fn write_config_to(path: &Path, config: &AppConfig) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).map_err(|e| AppError::io(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)
            .map_err(|e| AppError::io(path, e))?
            .permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms).map_err(|e| AppError::io(path, e))?;
    }

    tracing::info!(path = %path.display(), "配置已保存");
    Ok(())
}

/// 加载配置：显式路径优先，否则读取全局配置；文件不存在时使用默认值
pub fn load_config(explicit: Option<&Path>) -> AppResult<AppConfig> {
    let loaded = match explicit {
        Some(path) => read_config_from(path)?,
        None => read_global_config()?,
    };
    Ok(loaded.unwrap_or_default())
}
