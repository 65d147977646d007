//! 扫描策略、批量选项与统计信息（模块）
use serde::Deserialize;

/// 命中偏移的计算方式
/// - MatchOffset：直接取正则命中本身的偏移（默认，始终准确）。
/// - FirstOccurrence：在全文中重新查找该值的首次出现位置（旧行为）。
///   同一字符串更早出现在无关上下文中时，偏移会指向那一处。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexAttribution {
    #[default]
    MatchOffset,
    FirstOccurrence,
}

/// 扫描策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanPolicy {
    /// 为 true 时只报告优先级最高的命中类别，之后的类别不再尝试
    pub stop_at_first_match: bool,
    pub index: IndexAttribution,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self { stop_at_first_match: true, index: IndexAttribution::MatchOffset }
    }
}

impl ScanPolicy {
    /// 报告所有命中类别
    pub fn all_categories() -> Self {
        Self { stop_at_first_match: false, ..Self::default() }
    }
}

/// 批量扫描选项
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 最大文件大小（字节）；超过则记为不可读
    pub max_file_size: Option<u64>,
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
    /// 是否递归子目录（默认只扫一层）
    pub recursive: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { max_file_size: None, threads: None, recursive: false }
    }
}

/// 批量扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    pub files_scanned: usize,
    /// 读取失败（不可读、过大、二进制）的文件数
    pub files_unavailable: usize,
    /// 至少命中一个类别的文件数
    pub files_flagged: usize,
}
