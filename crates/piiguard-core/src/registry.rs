//! 类别规则表（Pattern Registry）
//!
//! 规则表在启动时构建一次，此后只读，可被任意数量的扫描并发共享（无需加锁）。
//! 表内顺序即类别优先级；增删或调整类别只需修改规则文件，扫描逻辑不变。
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::error::RegistryError;
use crate::rules::{load_rule_specs, parse_rule_specs, RuleSpec, BUILTIN_RULES};

/// 单个类别及其匹配规则
#[derive(Debug, Clone)]
pub struct PatternDefinition {
    category: String,
    name: Option<String>,
    rule: Regex,
}

impl PatternDefinition {
    pub fn category(&self) -> &str {
        &self.category
    }

    /// 展示名；规则未提供时退回类别名
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.category)
    }

    pub fn rule(&self) -> &Regex {
        &self.rule
    }
}

/// 有序的类别规则集合
#[derive(Debug, Clone)]
pub struct Registry {
    patterns: Vec<PatternDefinition>,
}

impl Registry {
    /// 从规则条目构建；任一规则无法编译即整体失败（构建期致命错误）
    pub fn from_specs(specs: &[RuleSpec]) -> Result<Self, RegistryError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut patterns = Vec::with_capacity(specs.len());
        for r in specs {
            if r.id.trim().is_empty() {
                return Err(RegistryError::EmptyCategory);
            }
            if !seen.insert(r.id.as_str()) {
                return Err(RegistryError::DuplicateCategory(r.id.clone()));
            }
            let rule = Regex::new(&r.pat).map_err(|source| RegistryError::MalformedRule {
                category: r.id.clone(),
                source,
            })?;
            patterns.push(PatternDefinition { category: r.id.clone(), name: r.name.clone(), rule });
        }
        Ok(Self { patterns })
    }

    pub fn from_toml_str(txt: &str) -> Result<Self, RegistryError> {
        Self::from_specs(&parse_rule_specs(txt)?)
    }

    /// 从 TOML 规则文件加载
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let specs = load_rule_specs(path)?;
        let registry = Self::from_specs(&specs)?;
        tracing::debug!(?path, categories = registry.len(), "loaded rule file");
        Ok(registry)
    }

    /// 进程级内置规则表，首次访问时构建；所有会话共享同一实例
    pub fn builtin() -> &'static Arc<Registry> {
        static BUILTIN: OnceLock<Arc<Registry>> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Arc::new(Registry::from_toml_str(BUILTIN_RULES).expect("builtin rules compile"))
        })
    }

    /// 按优先级顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &PatternDefinition> {
        self.patterns.iter()
    }

    /// 类别名列表（按优先级）
    pub fn categories(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.category.as_str()).collect()
    }

    pub fn get(&self, category: &str) -> Option<&PatternDefinition> {
        self.patterns.iter().find(|p| p.category == category)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
