use md5::{Digest, Md5};

/// Deterministic avatar URL for an email: the Gravatar identicon keyed by the
/// MD5 of the trimmed, lower-cased address.
pub fn avatar_url(email: &str) -> String {
    let digest = Md5::digest(email.trim().to_lowercase().as_bytes());
    let hash: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    format!("https://www.gravatar.com/avatar/{}?s=150&d=identicon", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_the_normalized_email() {
        // Known digest of "myemailaddress@example.com"
        assert_eq!(
            avatar_url(" MyEmailAddress@example.com "),
            "https://www.gravatar.com/avatar/0bc83cb571cd1c50ba6f3e8a78ef1346?s=150&d=identicon"
        );
    }

    #[test]
    fn normalization_makes_case_and_whitespace_irrelevant() {
        assert_eq!(avatar_url("A@b.com"), avatar_url("  a@B.COM "));
    }
}
