//! Weak, fast per-chunk digest.
//!
//! A single collision-prone hash is fine here: a signature is the
//! concatenation of many digests, and the similarity metric is robust
//! to sparse collisions (spec §4.3).

/// Reduce a chunk of bytes to a 4-byte digest, rendered as 8 lowercase
/// hex characters.
pub fn chunk_digest_hex(chunk: &[u8]) -> String {
    let mut h: u32 = 0;
    for &b in chunk {
        h = h.wrapping_mul(31).wrapping_add(b as u32);
    }
    format!("{:08x}", h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_eight_hex_chars() {
        let digest = chunk_digest_hex(b"hello world");
        assert_eq!(digest.len(), 8);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(chunk_digest_hex(b"abc"), chunk_digest_hex(b"abc"));
    }

    #[test]
    fn digest_differs_for_different_input() {
        assert_ne!(chunk_digest_hex(b"abc"), chunk_digest_hex(b"abd"));
    }

    #[test]
    fn known_value_for_hello_world() {
        // h = ((((('h'*31+'e')*31+'l')*31+'l')*31+'o')*31+' ')*31+'w'... folded mod 2^32
        let mut h: u32 = 0;
        for b in b"hello world" {
            h = h.wrapping_mul(31).wrapping_add(*b as u32);
        }
        assert_eq!(chunk_digest_hex(b"hello world"), format!("{:08x}", h));
    }
}
