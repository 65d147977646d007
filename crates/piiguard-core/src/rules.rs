//! 规则文件加载（TOML）
use serde::Deserialize;
use std::path::Path;

use crate::error::RegistryError;

/// 内置规则文件（顺序即类别优先级）
pub(crate) const BUILTIN_RULES: &str = include_str!("../../../rules/default.toml");

/// 单条规则的配置（支持 pattern 或 regex 字段）
#[derive(Debug, Clone, Deserialize)]
struct RuleEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub regex: Option<String>,
}

/// 顶层规则文件结构
#[derive(Debug, Clone, Deserialize)]
struct RuleFile {
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

/// 归一化后的规则规格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    /// 类别名（如 `ssn`、`creditCard`）
    pub id: String,
    /// 展示名，可选
    pub name: Option<String>,
    pub pat: String,
}

impl RuleSpec {
    pub fn new(id: impl Into<String>, pat: impl Into<String>) -> Self {
        Self { id: id.into(), name: None, pat: pat.into() }
    }
}

/// 从 TOML 文本解析并归一化为 RuleSpec 列表（保持文件中的顺序）
pub fn parse_rule_specs(txt: &str) -> Result<Vec<RuleSpec>, RegistryError> {
    let parsed: RuleFile = toml::from_str(txt)?;
    let mut out = Vec::with_capacity(parsed.rules.len());

    for e in parsed.rules {
        // 兼容两种字段名：pattern 或 regex
        let pat = match (e.pattern, e.regex) {
            (Some(p), _) => p,
            (None, Some(r)) => r,
            _ => {
                tracing::warn!(rule = %e.id, "rule has neither `pattern` nor `regex`, skipped");
                continue;
            }
        };
        out.push(RuleSpec { id: e.id, name: e.name, pat });
    }

    Ok(out)
}

/// 从 TOML 规则文件加载
pub fn load_rule_specs(path: &Path) -> Result<Vec<RuleSpec>, RegistryError> {
    let txt = std::fs::read_to_string(path)
        .map_err(|source| RegistryError::Read { path: path.to_path_buf(), source })?;
    parse_rule_specs(&txt)
}
