use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

// 可选 + 号，9 到 15 位数字（E.164 长度范围）
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{9,15}$").expect("Invalid phone regex"));

/// 去掉手机号中的空格、连字符和括号
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

/// 校验已规范化的手机号
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone) {
        return Err("Phone number must contain 9 to 15 digits, optionally prefixed with +");
    }
    Ok(())
}

/// 教师姓名：去除空白后非空，最长 64 个字符
pub fn validate_person_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name must not be empty");
    }
    if name.chars().count() > 64 {
        return Err("Name must be at most 64 characters long");
    }
    Ok(())
}

/// 管理员用户名
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 长度：3 <= x <= 32
    if username.len() < 3 || username.len() > 32 {
        return Err("Username length must be between 3 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, dots, underscores or hyphens");
    }
    Ok(())
}

/// 必填文本字段（标题、单位名称、分区等）
pub fn validate_required_text(value: &str, field: &'static str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if value.chars().count() > 255 {
        return Err(format!("{field} must be at most 255 characters long"));
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 密码策略：至少 8 个字符，同时包含字母和数字，且不是常见弱密码
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    let weak_passwords = [
        "password1",
        "qwerty123",
        "admin123",
        "teacher1",
        "abcd1234",
        "12345678a",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_normalization() {
        let phone = normalize_phone("+998 (90) 123-45-67");
        assert_eq!(phone, "+998901234567");
        assert!(validate_phone(&phone).is_ok());
    }

    #[test]
    fn test_invalid_phones() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("+99890abc4567").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_names() {
        assert!(validate_person_name("Oʻgʻiloy").is_ok());
        assert!(validate_person_name("   ").is_err());
        assert!(validate_person_name(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_usernames() {
        assert!(validate_username("inspector.tashkent").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("School 5", "workplace").is_ok());
        let err = validate_required_text("  ", "workplace").unwrap_err();
        assert_eq!(err, "workplace must not be empty");
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("maktab2024").is_valid);
        assert!(validate_password("Secure Pass 9").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_password_needs_digit_and_letter() {
        assert!(
            validate_password("onlyletters")
                .errors
                .contains(&"Password must contain at least one digit")
        );
        assert!(
            validate_password("1234567890")
                .errors
                .contains(&"Password must contain at least one letter")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Qwerty123");
        assert!(!result.is_valid);
        assert_eq!(
            result.error_message(),
            "Password is too common, please choose a stronger password"
        );
    }
}
