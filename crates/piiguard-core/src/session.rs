//! 会话：一次“检查内容”动作所需的全部上下文
//!
//! 取代宿主集成层中的模块级可变状态（当前配置、通知 id 等），显式传给处理函数。
//! 步骤链：取文本 → 扫描 → 上报；前一步失败时后续步骤不会执行。
use std::sync::Arc;

use crate::config::DEFAULT_NOTIFICATION_ID;
use crate::error::SourceError;
use crate::options::ScanPolicy;
use crate::registry::Registry;
use crate::report::{NotificationSink, ReportOptions, Reporter};
use crate::scan::scan_with;
use crate::source::TextSource;
use crate::types::ScanResult;

#[derive(Debug, Clone)]
pub struct Session {
    registry: Arc<Registry>,
    policy: ScanPolicy,
    reporter: Reporter,
}

impl Session {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            policy: ScanPolicy::default(),
            reporter: Reporter::new(DEFAULT_NOTIFICATION_ID, ReportOptions::default()),
        }
    }

    pub fn with_policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_report(mut self, options: ReportOptions) -> Self {
        self.reporter = Reporter::new(self.reporter.id().to_string(), options);
        self
    }

    pub fn with_notification_id(mut self, id: impl Into<String>) -> Self {
        self.reporter = Reporter::new(id, self.reporter.options());
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn policy(&self) -> &ScanPolicy {
        &self.policy
    }

    /// 仅扫描，不上报
    pub fn scan(&self, text: &str) -> ScanResult {
        scan_with(text, &self.registry, &self.policy)
    }

    /// 检查文档内容
    /// - 取文本失败：发出“无法检查”的错误通知，并把错误原样返回给调用方
    /// - 成功：扫描并上报，返回扫描结果（可能为空）
    pub fn verify(
        &self,
        source: &mut dyn TextSource,
        sink: &mut dyn NotificationSink,
    ) -> Result<ScanResult, SourceError> {
        let text = match source.get_text() {
            Ok(t) => t,
            Err(e) => {
                self.reporter.report_unavailable(&e, sink);
                return Err(e);
            }
        };
        let result = self.scan(&text);
        self.reporter.report(&result, sink);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Notification, NotificationKind, UNAVAILABLE_MESSAGE};
    use crate::source::StaticText;

    struct Broken;

    impl TextSource for Broken {
        fn get_text(&mut self) -> Result<String, SourceError> {
            Err(SourceError::Io {
                origin: "mailbox item".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "host refused"),
            })
        }
    }

    fn session() -> Session {
        Session::new(Arc::clone(Registry::builtin()))
    }

    #[test]
    fn verify_scans_and_reports() {
        let mut sink: Vec<Notification> = Vec::new();
        let result = session()
            .verify(&mut StaticText("My SSN is 123-45-6789".into()), &mut sink)
            .unwrap();
        assert_eq!(result.get("ssn").unwrap()[0].index, 10);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn unavailable_source_is_not_a_clean_result() {
        let mut sink: Vec<Notification> = Vec::new();
        let err = session().verify(&mut Broken, &mut sink).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].kind, NotificationKind::Error);
        assert_eq!(sink[0].message, UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn notification_id_and_options_are_applied() {
        let mut sink: Vec<Notification> = Vec::new();
        let s = session()
            .with_notification_id("mail")
            .with_report(ReportOptions { reveal_values: false, announce_clean: true });
        s.verify(&mut StaticText("hello".into()), &mut sink).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].id, "mail");
    }

    #[test]
    fn policy_is_applied() {
        let s = session().with_policy(ScanPolicy::all_categories());
        let result = s.scan("SSN 123-45-6789 and email a@b.com");
        assert_eq!(result.categories().collect::<Vec<_>>(), ["ssn", "email"]);
    }
}
