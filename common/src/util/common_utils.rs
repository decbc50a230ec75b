use hex::encode;
use md5::{Digest, Md5};
use uuid::Uuid;

/// 生成业务主键（uuid 简写形式）
pub fn build_id() -> String {
    let uuid = Uuid::new_v4().simple();
    format!("{}", uuid)
}

pub fn build_md5(content: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(content);
    let result = hasher.finalize();
    let hex_string = encode(result);
    hex_string
}

/// 口令摘要：md5(key + 明文)，key 来自配置
pub fn build_password(md5_key: &str, raw: &str) -> String {
    build_md5(&format!("{}{}", md5_key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_digest_is_hex() {
        let digest = build_md5("hello");
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn password_depends_on_key() {
        assert_ne!(build_password("k1", "secret"), build_password("k2", "secret"));
    }
}
