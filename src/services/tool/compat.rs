// 版本兼容策略
//
// 支持列表定义的是一个上限包络：不高于最高支持版本即可使用。
// 解析失败的版本号在比较时视为相等，因此这里对畸形输入是放行的（fail-open），
// 可能允许在无法识别的版本上执行汉化。

use super::version::compare_versions;
use crate::core::{AppError, AppResult};
use std::cmp::Ordering;

/// 内置的支持版本
pub const BUILTIN_SUPPORTED_VERSIONS: &[&str] = &["0.40.0"];

/// 内置支持列表中的最高版本
pub const BUILTIN_MAX_SUPPORTED_VERSION: &str = "0.40.0";

/// 支持的版本集合（构造后不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedVersionSet {
    versions: Vec<String>,
    max_supported: String,
}

impl SupportedVersionSet {
    pub fn new<I, S>(versions: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let versions: Vec<String> = versions.into_iter().map(Into::into).collect();
        let max_supported = versions
            .iter()
            .max_by(|a, b| compare_versions(a, b))
            .cloned()
            .ok_or_else(|| AppError::InvalidConfig("支持版本列表不能为空".to_string()))?;

        Ok(Self {
            versions,
            max_supported,
        })
    }

    pub fn builtin() -> Self {
        Self {
            versions: BUILTIN_SUPPORTED_VERSIONS
                .iter()
                .map(|v| v.to_string())
                .collect(),
            max_supported: BUILTIN_MAX_SUPPORTED_VERSION.to_string(),
        }
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    pub fn max_supported(&self) -> &str {
        &self.max_supported
    }

    pub fn contains(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }

    /// 版本是否在支持范围内；空版本视为支持
    pub fn is_supported(&self, version: &str) -> bool {
        if version.is_empty() || self.contains(version) {
            return true;
        }

        if compare_versions(version, &self.max_supported) == Ordering::Greater {
            return false;
        }

        self.versions
            .iter()
            .any(|supported| compare_versions(version, supported) != Ordering::Greater)
    }

    /// 向下兼容：当前版本允许高于或等于所选版本
    pub fn is_compatible(&self, current: &str, selected: &str) -> bool {
        current == selected
            || (self.is_supported(current)
                && self.is_supported(selected)
                && compare_versions(current, selected) != Ordering::Less)
    }

    /// 是否允许执行 apply/revert
    pub fn permits_action(&self, current: &str, selected: &str) -> bool {
        self.is_supported(current) && self.is_compatible(current, selected)
    }
}

impl Default for SupportedVersionSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(versions: &[&str]) -> SupportedVersionSet {
        SupportedVersionSet::new(versions.iter().copied()).unwrap()
    }

    #[test]
    fn test_builtin_set() {
        let builtin = SupportedVersionSet::builtin();
        assert_eq!(builtin.max_supported(), "0.40.0");
        assert_eq!(builtin, set(BUILTIN_SUPPORTED_VERSIONS));
    }

    #[test]
    fn test_max_is_derived_by_version_order() {
        let policy = set(&["0.9.0", "0.40.0", "0.10.0"]);
        assert_eq!(policy.max_supported(), "0.40.0");
    }

    #[test]
    fn test_empty_set_is_rejected() {
        let result = SupportedVersionSet::new(Vec::<String>::new());
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_is_supported() {
        let policy = set(&["0.40.0"]);
        assert!(policy.is_supported("0.40.0"));
        assert!(policy.is_supported("0.39.0"));
        assert!(!policy.is_supported("0.41.0"));
        assert!(!policy.is_supported("1.0.0"));
        assert!(policy.is_supported(""));
    }

    #[test]
    fn test_malformed_version_fails_open() {
        let policy = set(&["0.40.0"]);
        assert!(policy.is_supported("garbage"));
        assert!(policy.is_compatible("garbage", "0.40.0"));
    }

    #[test]
    fn test_very_large_version_is_too_high() {
        let policy = set(&["0.40.0"]);
        let huge = "99999999999999999999.0.0";
        assert!(!policy.is_supported(huge));
        assert!(!policy.permits_action(huge, "0.40.0"));
    }

    #[test]
    fn test_is_compatible() {
        let policy = set(&["0.40.0"]);
        assert!(policy.is_compatible("0.40.0", "0.40.0"));
        assert!(policy.is_compatible("0.40.0", "0.39.0"));
        assert!(!policy.is_compatible("0.39.0", "0.40.0"));
        // 完全相同时不要求受支持
        assert!(policy.is_compatible("0.41.0", "0.41.0"));
        assert!(!policy.is_compatible("0.41.0", "0.40.0"));
    }

    #[test]
    fn test_permits_action() {
        let policy = set(&["0.39.0", "0.40.0"]);
        assert!(policy.permits_action("0.40.0", "0.40.0"));
        assert!(policy.permits_action("0.40.0", "0.39.0"));
        assert!(!policy.permits_action("0.39.0", "0.40.0"));
        assert!(!policy.permits_action("0.41.0", "0.41.0"));
        assert!(!policy.permits_action("0.41.0", "0.40.0"));
    }
}
