//! 扫描器：按规则表顺序对文本逐类尝试，产出 ScanResult
//!
//! 纯函数，无副作用，对任何输入都不会失败；未发现敏感信息即返回空结果。
use crate::options::{IndexAttribution, ScanPolicy};
use crate::registry::Registry;
use crate::types::{Match, ScanResult};

/// 使用内置规则表与默认策略扫描文本
///
/// 所有上层入口（CLI、会话、批量）最终都经由此处或 [`scan_with`]。
pub fn scan(text: &str) -> ScanResult {
    scan_with(text, Registry::builtin(), &ScanPolicy::default())
}

/// 使用注入的规则表与策略扫描文本
/// - 每个类别只取第一处匹配
/// - `stop_at_first_match` 为 true 时，首个命中的类别之后不再尝试其余类别
pub fn scan_with(text: &str, registry: &Registry, policy: &ScanPolicy) -> ScanResult {
    let mut result = ScanResult::default();
    if text.is_empty() {
        return result;
    }

    for def in registry.iter() {
        let m = match def.rule().find(text) {
            Some(m) if !m.as_str().is_empty() => m,
            _ => continue,
        };
        let index = match policy.index {
            IndexAttribution::MatchOffset => m.start(),
            // 命中值必然出现在文本中，find 不会落空
            IndexAttribution::FirstOccurrence => text.find(m.as_str()).unwrap_or(m.start()),
        };
        result.push(def.category(), Match { value: m.as_str().to_string(), index });

        if policy.stop_at_first_match {
            break;
        }
    }

    tracing::debug!(
        text_len = text.len(),
        categories = result.len(),
        stop_at_first_match = policy.stop_at_first_match,
        "scan finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSpec;

    fn only(result: &ScanResult, category: &str, value: &str, index: usize) {
        assert_eq!(result.len(), 1, "expected only {category}, got {result:?}");
        assert_eq!(
            result.get(category),
            Some(&[Match { value: value.to_string(), index }][..])
        );
    }

    #[test]
    fn detects_ssn() {
        only(&scan("My SSN is 123-45-6789"), "ssn", "123-45-6789", 10);
    }

    #[test]
    fn detects_credit_card() {
        only(&scan("Card 4111111111111111 on file"), "creditCard", "4111111111111111", 5);
    }

    #[test]
    fn detects_date_of_birth() {
        only(&scan("DOB 05/12/1980"), "dateOfBirth", "05/12/1980", 4);
    }

    #[test]
    fn detects_each_lower_priority_category() {
        only(&scan("write to jane.doe@example.com"), "email", "jane.doe@example.com", 9);
        only(&scan("Call (555) 123-4567"), "phoneNumber", "(555) 123-4567", 5);
        only(&scan("host 192.168.1.10 is up"), "ipAddress", "192.168.1.10", 5);
        only(&scan("Passport AB1234567"), "passportNumber", "AB1234567", 9);
        only(&scan("License D12345"), "driverLicense", "D12345", 8);
        only(&scan("Account 12345678"), "bankAccount", "12345678", 8);
    }

    #[test]
    fn detects_values_directly_after_non_ascii_letters() {
        only(&scan("我的SSN是123-45-6789"), "ssn", "123-45-6789", 12);
        only(&scan("卡号4111111111111111"), "creditCard", "4111111111111111", 6);
        only(&scan("生日05/12/1980"), "dateOfBirth", "05/12/1980", 6);
        only(&scan("邮箱jane@example.com"), "email", "jane@example.com", 6);
        only(&scan("电话(555) 123-4567"), "phoneNumber", "(555) 123-4567", 6);
        only(&scan("IP地址192.168.1.10"), "ipAddress", "192.168.1.10", 8);
        only(&scan("护照AB1234567"), "passportNumber", "AB1234567", 6);
        only(&scan("驾照D12345"), "driverLicense", "D12345", 6);
        only(&scan("账户12345678"), "bankAccount", "12345678", 6);
        only(&scan("café123-45-6789"), "ssn", "123-45-6789", 5);
    }

    #[test]
    fn ascii_word_characters_still_block_a_match() {
        assert!(scan("x123-45-6789").get("ssn").is_none());
        assert!(scan("ref123-45-6789x").is_empty());
    }

    #[test]
    fn higher_priority_category_wins() {
        only(&scan("SSN 123-45-6789 and email a@b.com"), "ssn", "123-45-6789", 4);
        only(&scan("email a@b.com, DOB 05/12/1980"), "dateOfBirth", "05/12/1980", 19);
    }

    #[test]
    fn nothing_sensitive_is_empty() {
        assert!(scan("Nothing sensitive here.").is_empty());
        assert!(scan("").is_empty());
        assert!(scan("zip 12345").is_empty());
    }

    #[test]
    fn all_categories_policy_reports_every_hit() {
        let text = "Card 4111111111111111 and DOB 05/12/1980";
        let result = scan_with(text, Registry::builtin(), &ScanPolicy::all_categories());
        let cats: Vec<&str> = result.categories().collect();
        assert_eq!(cats, ["creditCard", "dateOfBirth", "bankAccount"]);
        assert_eq!(result.get("dateOfBirth").unwrap()[0].index, 30);
    }

    #[test]
    fn index_attribution_modes_differ_on_earlier_repeat() {
        // 第一次出现紧贴字母，不构成词边界，规则只命中第二次
        let text = "ref x123-45-6789 ssn 123-45-6789";
        let precise = scan_with(text, Registry::builtin(), &ScanPolicy::default());
        assert_eq!(precise.get("ssn").unwrap()[0].index, 21);

        let legacy = ScanPolicy { index: IndexAttribution::FirstOccurrence, ..ScanPolicy::default() };
        let legacy = scan_with(text, Registry::builtin(), &legacy);
        assert_eq!(legacy.get("ssn").unwrap()[0].index, 5);
    }

    #[test]
    fn index_is_a_byte_offset() {
        let text = "né le 05/12/1980";
        let result = scan(text);
        let m = &result.get("dateOfBirth").unwrap()[0];
        assert_eq!(&text[m.index..m.index + m.value.len()], m.value);
        assert_eq!(m.index, 7);
    }

    #[test]
    fn custom_registry_order_is_respected() {
        let registry = Registry::from_specs(&[
            RuleSpec::new("email", r"\b[a-z]+@[a-z]+\.[a-z]{2,}\b"),
            RuleSpec::new("ssn", r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b"),
        ])
        .unwrap();
        let result = scan_with("SSN 123-45-6789 and email a@b.com", &registry, &ScanPolicy::default());
        only(&result, "email", "a@b.com", 26);
    }

    #[test]
    fn empty_matches_are_ignored() {
        let registry = Registry::from_specs(&[RuleSpec::new("blank", "x*")]).unwrap();
        assert!(scan_with("abc", &registry, &ScanPolicy::default()).is_empty());
    }
}
