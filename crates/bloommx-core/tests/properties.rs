//! Property tests for build/query agreement

use bloommx_core::{
    build, build_parallel, verify, BloomArtifact, BuildConfig, DomainMembership, Tier, TierBuilder,
};
use proptest::prelude::*;

fn domain() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9-]{0,15}\\.[a-z]{2,6}"
}

fn domain_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(domain(), 1..200).prop_map(|set| set.into_iter().collect())
}

fn tier() -> impl Strategy<Value = Tier> {
    prop::sample::select(Tier::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_no_false_negatives(items in domain_set(), tier in tier()) {
        let filter = build(&items, tier.false_positive_rate()).unwrap();
        prop_assert_eq!(verify(&filter, &items), 0);
        for item in &items {
            prop_assert!(filter.check_domain(item));
            let email = format!("someone@{}", item);
            prop_assert!(filter.check_email(&email));
        }
    }

    #[test]
    fn prop_case_and_whitespace_insensitive(items in domain_set(), query in "[ -~]{0,40}") {
        let filter = build(&items, 0.01).unwrap();

        for item in &items {
            let shouted = format!("  {}\t", item.to_uppercase());
            prop_assert!(filter.check_domain(&shouted));
            let email = format!("USER@{}", shouted);
            prop_assert!(filter.check_email(&email));
        }

        let padded = format!(" {} ", query.to_uppercase());
        prop_assert_eq!(filter.check_domain(&query), filter.check_domain(&padded));
    }

    #[test]
    fn prop_round_trip_answers_identically(items in domain_set(), queries in prop::collection::vec(domain(), 0..100)) {
        let filter = build(&items, 0.001).unwrap();
        let decoded = BloomArtifact::encode(&filter).decode().unwrap();

        for value in items.iter().chain(&queries) {
            prop_assert_eq!(decoded.test(value), filter.test(value));
        }
    }

    #[test]
    fn prop_builds_are_deterministic(items in domain_set(), tier in tier()) {
        let rate = tier.false_positive_rate();
        let first = BloomArtifact::encode(&build(&items, rate).unwrap());
        let second = BloomArtifact::encode(&build(&items, rate).unwrap());
        let sharded = BloomArtifact::encode(&build_parallel(&items, rate).unwrap());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &sharded);
    }

    #[test]
    fn prop_malformed_email_is_false(local in "[a-z]{0,10}", domains in domain_set()) {
        let filter = build(&domains, 0.05).unwrap();
        prop_assert!(!filter.check_email(&local));
        for d in &domains {
            let leading = format!("@{}", d);
            prop_assert!(!filter.check_email(&leading));
        }
    }
}

#[test]
fn test_false_positive_rate_within_twice_target() {
    let items: Vec<String> = (0..2000).map(|i| format!("free-{}.mail", i)).collect();
    let builds = TierBuilder::new(BuildConfig::default())
        .unwrap()
        .build_all(&items)
        .unwrap();

    let trials = 10_000u64;
    for build in builds {
        let filter = build.artifact.decode().unwrap();
        let false_positives = (0..trials)
            .filter(|&i| {
                let probe = format!(
                    "test-{}-{:x}.randomcorp.xyz",
                    i,
                    i.wrapping_mul(0x9e37_79b9_7f4a_7c15)
                );
                filter.check_domain(&probe)
            })
            .count();

        let observed = false_positives as f64 / trials as f64;
        let max_allowed = build.tier.false_positive_rate * 2.0;
        assert!(
            observed <= max_allowed,
            "{}: observed FPR {} exceeds {}",
            build.tier.name,
            observed,
            max_allowed
        );
    }
}
