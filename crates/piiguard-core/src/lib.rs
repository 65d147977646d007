//! 敏感信息（PII）检测核心库
//!
//! 数据流：文本来源 → 扫描器（文本 + 规则表）→ ScanResult → 结果上报 → 通知落点。
//! - 规则表（Registry）启动时构建一次，此后只读，顺序即类别优先级。
//! - 扫描（`scan` / `scan_with`）是纯函数，不会失败；无命中即空结果。
//! - 取文本失败以 `SourceError` 返回，与“未发现敏感信息”严格区分。

mod batch;
mod config;
mod error;
mod options;
mod registry;
mod report;
mod rules;
mod scan;
mod session;
mod source;
mod types;

pub use batch::scan_dir_and_write;
pub use config::{GuardConfig, DEFAULT_NOTIFICATION_ID};
pub use error::{RegistryError, SourceError};
pub use options::{BatchOptions, BatchStats, IndexAttribution, ScanPolicy};
pub use registry::{PatternDefinition, Registry};
pub use report::{
    ConsoleSink, Notification, NotificationKind, NotificationSink, ReportOptions, Reporter,
    TracingSink, CLEAN_MESSAGE, UNAVAILABLE_MESSAGE,
};
pub use rules::{load_rule_specs, parse_rule_specs, RuleSpec};
pub use scan::{scan, scan_with};
pub use session::Session;
pub use source::{FileSource, ReaderSource, StaticText, TextSource};
pub use types::{Match, ScanResult};
