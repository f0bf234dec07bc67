use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789";

/// 生成指定长度的随机字符串，去掉了易混淆的字符
pub fn generate_random_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_key;

    #[test]
    fn test_length_and_charset() {
        let code = generate_random_code(12);
        assert_eq!(code.len(), 12);
        assert!(code.bytes().all(|b| CHARSET.contains(&b)));
        assert!(validate_key(&code).is_ok());
    }

    #[test]
    fn test_codes_differ() {
        assert_ne!(generate_random_code(16), generate_random_code(16));
    }
}
