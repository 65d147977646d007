//! 公共类型（对外暴露）
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// 单次命中：识别出的原文子串及其在文本中的字节偏移
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Match {
    pub value: String,
    pub index: usize,
}

/// 一次扫描的完整结果：类别 → 命中序列
///
/// 插入顺序即发现顺序（亦即规则表优先级顺序）。每次扫描新建，返回后不再修改；
/// 序列化为 JSON 对象时保持该顺序，例如 `{"ssn":[{"value":"123-45-6789","index":10}]}`。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    entries: Vec<(String, Vec<Match>)>,
}

impl ScanResult {
    pub(crate) fn push(&mut self, category: &str, m: Match) {
        match self.entries.iter_mut().find(|(c, _)| c == category) {
            Some((_, matches)) => matches.push(m),
            None => self.entries.push((category.to_string(), vec![m])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 命中的类别数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, category: &str) -> Option<&[Match]> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, m)| m.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Match])> {
        self.entries.iter().map(|(c, m)| (c.as_str(), m.as_slice()))
    }
}

impl Serialize for ScanResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, matches) in &self.entries {
            map.serialize_entry(category, matches)?;
        }
        map.end()
    }
}
