use crate::error::CrackError;
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

/// Size of a SHA-1 digest in bytes.
pub const DIGEST_LEN: usize = 20;

/// A SHA-1 digest value, used as the search target.
///
/// Equality is exact byte comparison over all 20 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha1Digest(pub [u8; DIGEST_LEN]);

impl Sha1Digest {
    /// Compute the SHA-1 digest of an arbitrary byte string.
    ///
    /// This sits in the innermost search loop on the CPU path and is the
    /// reference the GPU kernel is validated against.
    #[inline(always)]
    pub fn of(data: &[u8]) -> Self {
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&Sha1::digest(data));
        Sha1Digest(out)
    }

    /// Render as a lowercase hex string (40 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Sha1Digest {
    type Err = CrackError;

    /// Parse a 40-character hex string (either case) into a digest.
    fn from_str(s: &str) -> Result<Self, CrackError> {
        let bytes = hex::decode(s.trim())
            .map_err(|_| CrackError::InvalidDigest(s.to_string()))?;
        let raw: [u8; DIGEST_LEN] = bytes
            .try_into()
            .map_err(|_| CrackError::InvalidDigest(s.to_string()))?;
        Ok(Sha1Digest(raw))
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha1Digest({})", self.to_hex())
    }
}

/// Convenience wrapper for the hot loop.
#[inline(always)]
pub fn sha1(data: &[u8]) -> Sha1Digest {
    Sha1Digest::of(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_vector() {
        // FIPS 180 reference digest for the empty message
        assert_eq!(
            sha1(b"").to_hex(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn test_abc_vector() {
        // RFC 3174 TEST1
        assert_eq!(
            sha1(b"abc").to_hex(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_two_block_vector() {
        // RFC 3174 TEST2, 56 bytes, exercises the two-block padding path
        assert_eq!(
            sha1(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq").to_hex(),
            "84983e441c3bd26ebaae4aa1f95129e5e54670f1"
        );
    }

    #[test]
    fn test_long_input_vector() {
        // RFC 3174 TEST3: one million repetitions of 'a'
        let input = vec![b'a'; 1_000_000];
        assert_eq!(
            sha1(&input).to_hex(),
            "34aa973cd4c4daa4f61eeb2bdbad27316534016f"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let digest = sha1(b"cab");
        let parsed: Sha1Digest = digest.to_hex().parse().unwrap();
        assert_eq!(parsed, digest);

        // Uppercase hex is accepted as well
        let upper: Sha1Digest = digest.to_hex().to_uppercase().parse().unwrap();
        assert_eq!(upper, digest);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!("".parse::<Sha1Digest>().is_err());
        assert!("da39a3".parse::<Sha1Digest>().is_err());
        assert!("zz39a3ee5e6b4b0d3255bfef95601890afd80709".parse::<Sha1Digest>().is_err());
        // 42 hex chars: valid hex, wrong length
        assert!("da39a3ee5e6b4b0d3255bfef95601890afd8070900".parse::<Sha1Digest>().is_err());
    }
}
