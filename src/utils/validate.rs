use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("Invalid integer regex"));

/// 按前导数字解析整数，`"12abc"` → 12，`"abc"` → None
///
/// 与浏览器中数字输入框、下拉框取值时的解析行为一致。
pub fn parse_int(input: &str) -> Option<i64> {
    LEADING_INT_RE
        .captures(input)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// 两个密码字段都为空，或者完全相同
pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    (password.is_empty() && confirmation.is_empty()) || password == confirmation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_leading_digits() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  7 "), Some(7));
        assert_eq!(parse_int("12abc"), Some(12));
        assert_eq!(parse_int("-3"), Some(-3));
    }

    #[test]
    fn test_parse_int_rejects_non_numbers() {
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("a12"), None);
        assert_eq!(parse_int("99999999999999999999"), None);
    }

    #[test]
    fn test_passwords_match() {
        assert!(passwords_match("", ""));
        assert!(passwords_match("Secret1", "Secret1"));
        assert!(!passwords_match("Secret1", ""));
        assert!(!passwords_match("", "Secret1"));
        assert!(!passwords_match("Secret1", "Secret2"));
    }
}
