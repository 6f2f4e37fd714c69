//! Query normalisation
//!
//! Domains are lowercased and trimmed before hashing. Emails are reduced to
//! the part after the last `@` first. Anything that leaves nothing to hash
//! yields `None`, which callers treat as "not a free email domain".

/// Lowercase and trim a domain; `None` if nothing is left
pub fn normalize_domain(domain: &str) -> Option<String> {
    let normalized = domain.to_lowercase();
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Extract and normalise the domain of an email address
///
/// `None` when there is no `@`, when `@` is the first character, or when the
/// domain is empty after trimming.
pub fn email_domain(email: &str) -> Option<String> {
    match email.rfind('@') {
        Some(at) if at > 0 => normalize_domain(&email[at + 1..]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("Gmail.Com"), Some("gmail.com".to_string()));
        assert_eq!(normalize_domain("  yahoo.com\t"), Some("yahoo.com".to_string()));
        assert_eq!(normalize_domain(""), None);
        assert_eq!(normalize_domain("   "), None);
    }

    #[test]
    fn test_email_domain_uses_last_at() {
        assert_eq!(email_domain("user@gmail.com"), Some("gmail.com".to_string()));
        assert_eq!(
            email_domain("\"odd@local\"@Yahoo.COM "),
            Some("yahoo.com".to_string())
        );
        assert_eq!(
            email_domain("test.user+tag@yahoo.com"),
            Some("yahoo.com".to_string())
        );
    }

    #[test]
    fn test_email_domain_fails_closed() {
        assert_eq!(email_domain(""), None);
        assert_eq!(email_domain("nodomain"), None);
        assert_eq!(email_domain("@"), None);
        assert_eq!(email_domain("@domain.com"), None);
        assert_eq!(email_domain("user@"), None);
        assert_eq!(email_domain("user@   "), None);
    }
}
