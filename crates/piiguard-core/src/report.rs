//! 结果上报：把 ScanResult 转成面向用户的通知
//!
//! 只渲染扫描器给出的结果，不会重新匹配。
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::SourceError;
use crate::types::ScanResult;

pub const CLEAN_MESSAGE: &str = "No sensitive data found. You respect our policies.";
pub const UNAVAILABLE_MESSAGE: &str =
    "The content of this document is not accessible for policies control.";

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Informational,
    Error,
}

/// 单条通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub persistent: bool,
}

/// 通知落点（宿主 UI 的消息能力）
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// 收集型落点，测试与嵌入方使用
impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// 逐行写出通知，例如 `[info] SSN detected as sensitive data`
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> NotificationSink for ConsoleSink<W> {
    fn notify(&mut self, n: Notification) {
        let tag = match n.kind {
            NotificationKind::Informational => "info",
            NotificationKind::Error => "error",
        };
        if let Err(e) = writeln!(self.out, "[{tag}] {}", n.message) {
            tracing::warn!(id = %n.id, error = %e, "failed to write notification");
        }
    }
}

/// 转发到 tracing 日志
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, n: Notification) {
        match n.kind {
            NotificationKind::Informational => tracing::info!(id = %n.id, persistent = n.persistent, "{}", n.message),
            NotificationKind::Error => tracing::error!(id = %n.id, persistent = n.persistent, "{}", n.message),
        }
    }
}

/// 上报选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// 是否发送带原始命中值的第二条通知。关闭时该通知整条省略（不做打码）
    pub reveal_values: bool,
    /// 无命中时是否发送一条“未发现敏感信息”的通知
    pub announce_clean: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { reveal_values: true, announce_clean: false }
    }
}

/// 结果上报器
#[derive(Debug, Clone)]
pub struct Reporter {
    id: String,
    options: ReportOptions,
}

impl Reporter {
    pub fn new(id: impl Into<String>, options: ReportOptions) -> Self {
        Self { id: id.into(), options }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> ReportOptions {
        self.options
    }

    /// 每个命中类别最多发出两条通知：
    /// 1. 常驻的提示通知，点名类别；
    /// 2. 带原始命中值的确认通知（`reveal_values` 关闭时省略）。
    pub fn report(&self, result: &ScanResult, sink: &mut dyn NotificationSink) {
        if result.is_empty() {
            if self.options.announce_clean {
                sink.notify(Notification {
                    id: self.id.clone(),
                    kind: NotificationKind::Informational,
                    message: CLEAN_MESSAGE.to_string(),
                    persistent: false,
                });
            }
            return;
        }

        for (category, matches) in result.iter() {
            let label = category.to_uppercase();
            sink.notify(Notification {
                id: self.id.clone(),
                kind: NotificationKind::Informational,
                message: format!("{label} detected as sensitive data"),
                persistent: true,
            });
            if !self.options.reveal_values {
                continue;
            }
            if let Some(first) = matches.first() {
                sink.notify(Notification {
                    id: format!("{}.value", self.id),
                    kind: NotificationKind::Error,
                    message: format!("{label}: {}", first.value),
                    persistent: false,
                });
            }
        }
    }

    /// 文本来源不可用：发出一条错误通知
    pub fn report_unavailable(&self, err: &SourceError, sink: &mut dyn NotificationSink) {
        tracing::warn!(origin = err.origin(), error = %err, "document text unavailable");
        sink.notify(Notification {
            id: self.id.clone(),
            kind: NotificationKind::Error,
            message: UNAVAILABLE_MESSAGE.to_string(),
            persistent: false,
        });
    }
}
