//! Short code generation
//!
//! 短码由 `(long_url, owner_id)` 确定性推导：
//! SHA-256 → 取摘要末尾 8 字节（大端 u64）→ Base58 → 截取前 8 位。
//! 相同输入永远得到相同短码，不保证全局唯一。

use sha2::{Digest, Sha256};

use crate::errors::{Result, ShortenerError};

/// 短码固定长度
pub const SHORT_CODE_LENGTH: usize = 8;

/// u64 的 Base58 表示最多 11 位
const MAX_ENCODED_LEN: usize = 11;

/// Base58 的零值字符，用于左侧补齐
const ZERO_DIGIT: char = '1';

/// Generate the short code for a long URL on behalf of an owner.
///
/// The owner id is appended to the URL before hashing, so the same URL
/// shortened by two different owners yields two different codes.
pub fn generate_short_code(long_url: &str, owner_id: &str) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(long_url.as_bytes());
    hasher.update(owner_id.as_bytes());
    let digest = hasher.finalize();

    let mut tail = [0u8; 8];
    tail.copy_from_slice(&digest[digest.len() - 8..]);
    let value = u64::from_be_bytes(tail);

    let mut code = encode_base58(value)?;
    code.truncate(SHORT_CODE_LENGTH);
    Ok(code)
}

/// Render an integer in base 58 (Bitcoin alphabet), left-padded with `1`
/// to at least [`SHORT_CODE_LENGTH`] characters.
pub fn encode_base58(value: u64) -> Result<String> {
    let bytes = value.to_be_bytes();
    // 去掉前导零字节，否则 bs58 会为每个零字节输出一个 '1'
    let start = bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(bytes.len());

    let mut buf = [0u8; MAX_ENCODED_LEN];
    let len = bs58::encode(&bytes[start..])
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .onto(&mut buf[..])
        .map_err(|e| ShortenerError::encoding(format!("base58 encoding failed: {e}")))?;

    let encoded = std::str::from_utf8(&buf[..len])
        .map_err(|e| ShortenerError::encoding(format!("base58 output is not UTF-8: {e}")))?;

    let mut out = String::with_capacity(len.max(SHORT_CODE_LENGTH));
    for _ in len..SHORT_CODE_LENGTH {
        out.push(ZERO_DIGIT);
    }
    out.push_str(encoded);
    Ok(out)
}

/// 检查短码是否合法：长度为 8，且全部字符属于 Base58 字母表
pub fn is_valid_short_code(code: &str) -> bool {
    code.len() == SHORT_CODE_LENGTH
        && code.bytes().all(|b| match b {
            b'1'..=b'9' => true,
            b'A'..=b'Z' => b != b'I' && b != b'O',
            b'a'..=b'z' => b != b'l',
            _ => false,
        })
}
