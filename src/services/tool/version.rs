//! 版本号比较与提取
//!
//! 只接受 `MAJOR.MINOR.PATCH` 三段非负整数。任一输入无法解析时
//! `compare_versions` 返回 `Ordering::Equal`（视为"相等/未知"），调用方不会收到错误。
//! 这是有意保留的保守默认值：上层策略因此对畸形版本号放行。

use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;
use std::cmp::Ordering;

static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.\d+\.\d+)").expect("invalid version regex"));

/// 严格解析 `MAJOR.MINOR.PATCH`，不依赖 locale；超出 u64 的分量返回 None
pub fn parse_version(version: &str) -> Option<Version> {
    let [major, minor, patch] = split_components(version)?;
    Some(Version::new(
        major.parse().ok()?,
        minor.parse().ok()?,
        patch.parse().ok()?,
    ))
}

/// 拆分为三段纯数字分量，不做数值转换
fn split_components(version: &str) -> Option<[&str; 3]> {
    let mut parts = version.trim().split('.');
    let components = [parts.next()?, parts.next()?, parts.next()?];
    if parts.next().is_some() {
        return None;
    }
    components
        .iter()
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
        .then_some(components)
}

/// 按数值比较两个十进制数字串，位数不受整数宽度限制
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// 比较两个版本号，解析失败时返回 `Ordering::Equal`
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (split_components(a), split_components(b)) {
        (Some(a), Some(b)) => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| compare_numeric(x, y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// 从任意输出中提取第一个 `MAJOR.MINOR.PATCH`
pub fn extract_version(output: &str) -> Option<String> {
    VERSION_REGEX
        .captures(output)?
        .get(1)
        .map(|m| m.as_str().to_string())
}
