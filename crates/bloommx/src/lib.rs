//! # bloommx
//!
//! Is this email address or domain a free consumer email provider?
//!
//! Each [`Tier`] embeds a Bloom filter built at compile time from the bundled
//! domain list. Lower tiers are smaller and answer "yes" for more unknown
//! domains; no tier ever answers "no" for a listed domain.
//!
//! | Tier | Target false positive rate |
//! |------|----------------------------|
//! | `micro` | 5% |
//! | `compact` | 1% |
//! | `balanced` (default) | 0.1% |
//! | `precise` | 0.01% |
//!
//! ## Usage Example
//!
//! ```
//! use bloommx::{FreeEmailDomains, Tier};
//!
//! let checker = FreeEmailDomains::load(Tier::Compact)?;
//! assert!(checker.is_free_email("someone@gmail.com"));
//! assert!(checker.is_free_domain("Yahoo.com"));
//! assert!(!checker.is_free_email("not an address"));
//!
//! // The default tier
//! let balanced = FreeEmailDomains::load_default()?;
//! assert!(balanced.is_free_email("USER@OUTLOOK.COM"));
//! # Ok::<(), bloommx::FilterError>(())
//! ```
//!
//! A loaded checker is immutable and `Send + Sync`; load it once and share it.

pub use bloommx_core::{BloomArtifact, BloomFilter, DomainMembership, FilterError, Tier};

include!(concat!(env!("OUT_DIR"), "/source.rs"));

macro_rules! tier_module {
    ($(#[$doc:meta])* $name:ident => $tier:expr) => {
        $(#[$doc])*
        pub mod $name {
            include!(concat!(env!("OUT_DIR"), "/", stringify!($name), ".rs"));

            /// Decode this tier's embedded filter
            pub fn load() -> Result<super::FreeEmailDomains, super::FilterError> {
                super::FreeEmailDomains::load($tier)
            }
        }
    };
}

tier_module!(
    /// ~5% false positives
    micro => super::Tier::Micro
);
tier_module!(
    /// ~1% false positives
    compact => super::Tier::Compact
);
tier_module!(
    /// ~0.1% false positives
    balanced => super::Tier::Balanced
);
tier_module!(
    /// ~0.01% false positives
    precise => super::Tier::Precise
);

/// Embedded artifact for `tier`
pub fn artifact(tier: Tier) -> BloomArtifact {
    let (m, k, data) = match tier {
        Tier::Micro => (micro::M, micro::K, micro::DATA),
        Tier::Compact => (compact::M, compact::K, compact::DATA),
        Tier::Balanced => (balanced::M, balanced::K, balanced::DATA),
        Tier::Precise => (precise::M, precise::K, precise::DATA),
    };
    BloomArtifact {
        m,
        k,
        data: data.to_string(),
    }
}

/// Decoded filter for one tier
///
/// Each value owns its bit array; nothing is cached globally.
#[derive(Clone, Debug)]
pub struct FreeEmailDomains {
    tier: Tier,
    filter: BloomFilter,
}

impl FreeEmailDomains {
    /// Decode the embedded artifact for `tier`
    pub fn load(tier: Tier) -> Result<Self, FilterError> {
        let filter = artifact(tier).decode()?;
        Ok(Self { tier, filter })
    }

    /// Decode the default (`balanced`) tier
    pub fn load_default() -> Result<Self, FilterError> {
        Self::load(Tier::default())
    }

    /// Whether the domain after the last `@` is a free email provider
    ///
    /// Malformed addresses return `false`.
    pub fn is_free_email(&self, email: &str) -> bool {
        self.check_email(email)
    }

    /// Whether `domain` is a free email provider (case and surrounding
    /// whitespace are ignored)
    pub fn is_free_domain(&self, domain: &str) -> bool {
        self.check_domain(domain)
    }

    /// Get the tier this filter was built for
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Get the underlying filter
    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }
}

impl DomainMembership for FreeEmailDomains {
    fn test(&self, value: &str) -> bool {
        self.filter.contains(value)
    }
}
