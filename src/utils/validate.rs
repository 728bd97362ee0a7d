use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static YOUTUBE_CHANNEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.|m\.)?(youtube\.com/(@[\w.-]+|channel/[\w-]+|c/[\w.-]+|user/[\w.-]+)|youtu\.be/[\w-]+)/?$")
        .expect("Invalid youtube channel regex")
});

const FULL_NAME_MIN: usize = 2;
const FULL_NAME_MAX: usize = 80;

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_full_name(full_name: &str) -> Result<(), &'static str> {
    // 按字符计数，兼容带重音的名字
    let len = full_name.trim().chars().count();
    if !(FULL_NAME_MIN..=FULL_NAME_MAX).contains(&len) {
        return Err("Full name length must be between 2 and 80 characters");
    }
    Ok(())
}

pub fn validate_youtube_channel(url: &str) -> Result<(), &'static str> {
    if !YOUTUBE_CHANNEL_RE.is_match(url.trim()) {
        return Err("YouTube channel must be a youtube.com or youtu.be link");
    }
    Ok(())
}

/// 去掉首尾空白，空字符串视为未填写
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 验证密码是否符合安全策略
///
/// 至少 8 个字符，同时包含大写字母、小写字母与数字，且不是常见弱密码。
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    let weak_passwords = ["password1", "qwerty123", "abcd1234", "contrasena1"];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("ana.perez@escuela.mx").is_ok());
        assert!(validate_email("ana@").is_err());
        assert!(validate_email("sin-arroba.com").is_err());
    }

    #[test]
    fn test_full_name() {
        assert!(validate_full_name("José Núñez").is_ok());
        assert!(validate_full_name(" J ").is_err());
        assert!(validate_full_name(&"a".repeat(81)).is_err());
    }

    #[test]
    fn test_youtube_channel() {
        assert!(validate_youtube_channel("https://www.youtube.com/@profe.ruiz").is_ok());
        assert!(validate_youtube_channel("https://youtube.com/channel/UCC845Rgvir2wWzJLKKy-c5g").is_ok());
        assert!(validate_youtube_channel("https://vimeo.com/ruiz").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  hola ".to_string())), Some("hola".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecurePass123").is_ok());

        let err = validate_password("Ab1").unwrap_err();
        assert!(err.contains("at least 8 characters"));

        assert!(validate_password("abcd12345").unwrap_err().contains("uppercase"));
        assert!(validate_password("ABCD12345").unwrap_err().contains("lowercase"));
        assert!(validate_password("AbcdEfghi").unwrap_err().contains("digit"));
        assert!(validate_password("Password1").unwrap_err().contains("too common"));
    }
}
