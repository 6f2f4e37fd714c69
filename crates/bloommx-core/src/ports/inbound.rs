//! Inbound Ports (Driving Ports)
//!
//! The query API external callers use. Every method is total: malformed input
//! answers `false` instead of failing.

use crate::domain::{email_domain, normalize_domain, BloomFilter};

/// Free email domain membership queries
///
/// Implementors only provide [`test`](DomainMembership::test); the
/// normalising entry points are shared so every implementation folds case and
/// whitespace identically.
pub trait DomainMembership {
    /// Membership test over an already normalised string
    ///
    /// May return a false positive, never a false negative for built items.
    fn test(&self, value: &str) -> bool;

    /// Lowercase and trim `domain`, then test it
    ///
    /// Blank input is `false`.
    fn check_domain(&self, domain: &str) -> bool {
        normalize_domain(domain).is_some_and(|d| self.test(&d))
    }

    /// Test the domain after the last `@` of `email`
    ///
    /// `false` when there is no `@`, the `@` is the first character, or the
    /// domain is empty after trimming.
    fn check_email(&self, email: &str) -> bool {
        email_domain(email).is_some_and(|d| self.test(&d))
    }
}

impl DomainMembership for BloomFilter {
    fn test(&self, value: &str) -> bool {
        self.contains(value)
    }
}

impl<T: DomainMembership + ?Sized> DomainMembership for &T {
    fn test(&self, value: &str) -> bool {
        (**self).test(value)
    }
}

impl<T: DomainMembership + ?Sized> DomainMembership for std::sync::Arc<T> {
    fn test(&self, value: &str) -> bool {
        (**self).test(value)
    }
}
