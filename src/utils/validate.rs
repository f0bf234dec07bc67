use once_cell::sync::Lazy;
use regex::Regex;

static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid key regex"));

pub const KEY_MIN_LEN: usize = 6;
pub const KEY_MAX_LEN: usize = 64;
pub const NAME_MAX_LEN: usize = 64;

pub fn validate_name(name: &str) -> Result<(), &'static str> {
    // 显示名称长度校验：1 <= x <= 64（按字符计）
    let len = name.trim().chars().count();
    if len == 0 || len > NAME_MAX_LEN {
        return Err("Name length must be between 1 and 64 characters");
    }
    Ok(())
}

pub fn validate_key(key: &str) -> Result<(), &'static str> {
    // 登录 key 长度校验：6 <= x <= 64
    if key.len() < KEY_MIN_LEN || key.len() > KEY_MAX_LEN {
        return Err("Key length must be between 6 and 64 characters");
    }
    // key 格式校验：只能包含字母、数字、下划线或连字符
    if !KEY_RE.is_match(key) {
        return Err("Key must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

/// 照片作者名，与显示名称规则相同
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    validate_name(username).map_err(|_| "Username length must be between 1 and 64 characters")
}

pub fn validate_scale(scale: i32) -> Result<(), &'static str> {
    if scale < 1 {
        return Err("Scale must be at least 1");
    }
    Ok(())
}

/// 图片地址：绝对 http(s) 地址或站内相对路径
pub fn validate_image_url(url: &str) -> Result<(), &'static str> {
    let url = url.trim();
    if url.is_empty() {
        return Err("Image url must not be empty");
    }
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/') {
        return Ok(());
    }
    Err("Image url must be an http(s) url or an absolute path")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_key() {
        assert!(validate_key("judge_01").is_ok());
        assert!(validate_key("A-b_c-D").is_ok());
    }

    #[test]
    fn test_key_length() {
        assert!(validate_key("abc").is_err());
        assert!(validate_key(&"k".repeat(65)).is_err());
        assert!(validate_key(&"k".repeat(64)).is_ok());
    }

    #[test]
    fn test_key_charset() {
        assert_eq!(
            validate_key("has space"),
            Err("Key must contain only letters, numbers, underscores or hyphens")
        );
        assert!(validate_key("中文密钥abc").is_err());
    }

    #[test]
    fn test_name() {
        assert!(validate_name("Ann").is_ok());
        assert!(validate_name("评委甲").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"n".repeat(65)).is_err());
    }

    #[test]
    fn test_scale() {
        assert!(validate_scale(10).is_ok());
        assert!(validate_scale(0).is_err());
        assert!(validate_scale(-3).is_err());
    }

    #[test]
    fn test_image_url() {
        assert!(validate_image_url("/uploads/a.jpg").is_ok());
        assert!(validate_image_url("https://cdn.example.com/a.jpg").is_ok());
        assert!(validate_image_url("ftp://x/a.jpg").is_err());
        assert!(validate_image_url("").is_err());
    }
}
