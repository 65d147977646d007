//! 配置文件（TOML）
//!
//! 所有字段均有默认值，空文件即默认配置：
//!
//! ```toml
//! rules_path = "./rules/default.toml"
//! notification_id = "piiguard"
//!
//! [policy]
//! stop_at_first_match = true
//! index = "match_offset"      # 或 "first_occurrence"
//!
//! [report]
//! reveal_values = true
//! announce_clean = false
//! ```
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::options::ScanPolicy;
use crate::registry::Registry;
use crate::report::ReportOptions;
use crate::session::Session;

pub const DEFAULT_NOTIFICATION_ID: &str = "piiguard";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    /// 规则文件；为空则使用内置规则表
    pub rules_path: Option<PathBuf>,
    pub notification_id: String,
    pub policy: ScanPolicy,
    pub report: ReportOptions,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            notification_id: DEFAULT_NOTIFICATION_ID.to_string(),
            policy: ScanPolicy::default(),
            report: ReportOptions::default(),
        }
    }
}

impl GuardConfig {
    pub fn from_toml_str(txt: &str) -> Result<Self> {
        toml::from_str(txt).context("parse config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&txt)
    }

    /// 按配置构建规则表：指定了规则文件则加载之，否则共享内置规则表
    pub fn registry(&self) -> Result<Arc<Registry>> {
        match &self.rules_path {
            Some(p) => {
                let registry = Registry::load(p)
                    .with_context(|| format!("load rules {}", p.display()))?;
                Ok(Arc::new(registry))
            }
            None => Ok(Arc::clone(Registry::builtin())),
        }
    }

    pub fn session(&self) -> Result<Session> {
        Ok(Session::new(self.registry()?)
            .with_policy(self.policy)
            .with_report(self.report)
            .with_notification_id(self.notification_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::IndexAttribution;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(GuardConfig::from_toml_str("").unwrap(), GuardConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = GuardConfig::from_toml_str(
            r#"
            notification_id = "mail-check"

            [policy]
            stop_at_first_match = false
            index = "first_occurrence"

            [report]
            reveal_values = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.notification_id, "mail-check");
        assert!(!cfg.policy.stop_at_first_match);
        assert_eq!(cfg.policy.index, IndexAttribution::FirstOccurrence);
        assert!(!cfg.report.reveal_values);
        assert!(!cfg.report.announce_clean);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GuardConfig::from_toml_str("stop_at_first = true").is_err());
    }

    #[test]
    fn default_config_shares_builtin_registry() {
        let a = GuardConfig::default().registry().unwrap();
        let b = GuardConfig::default().session().unwrap();
        assert!(Arc::ptr_eq(&a, Registry::builtin()));
        assert!(std::ptr::eq(b.registry(), &**Registry::builtin()));
    }

    #[test]
    fn missing_rules_file_fails_registry_build() {
        let cfg = GuardConfig { rules_path: Some("/no/such/rules.toml".into()), ..GuardConfig::default() };
        assert!(cfg.registry().is_err());
    }
}
