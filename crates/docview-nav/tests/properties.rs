//! Property tests for the address codec and version ordering.

use std::cmp::Ordering;

use docview_nav::{NavTuple, compare, decode_address, encode_address};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._/%#?-]{1,16}"
}

fn version_name() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u64..4, 0u64..4, 0u64..4).prop_map(|(a, b, c)| format!("{a}.{b}.{c}")),
        (0u64..3, 0u64..3, "(alpha|beta|rc)(\\.[0-9])?")
            .prop_map(|(a, b, pre)| format!("{a}.{b}.0-{pre}")),
        (0u64..3, "[a-z]{1,4}").prop_map(|(a, build)| format!("v{a}.0.0+{build}")),
        "[a-z]{1,6}",
        "[0-9]{1,2}(\\.[0-9x]{1,2})?",
    ]
}

proptest! {
    #[test]
    fn test_address_round_trip(
        project in segment(),
        version in segment(),
        page in "\\PC{1,24}",
        hash in "(#[^?]{0,12})?",
        hide_ui in any::<bool>(),
    ) {
        let tuple = NavTuple {
            project,
            version,
            page,
            hash,
            hide_ui,
        };
        let decoded = decode_address(&encode_address(&tuple)).unwrap();
        prop_assert_eq!(decoded, tuple);
    }

    #[test]
    fn test_compare_is_antisymmetric(a in version_name(), b in version_name()) {
        prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
    }

    #[test]
    fn test_compare_equal_only_for_same_name(a in version_name(), b in version_name()) {
        prop_assert_eq!(compare(&a, &b) == Ordering::Equal, a == b);
    }

    #[test]
    fn test_compare_is_transitive(
        a in version_name(),
        b in version_name(),
        c in version_name(),
    ) {
        let mut names = [a, b, c];
        names.sort_by(|x, y| compare(x, y));
        prop_assert_ne!(compare(&names[0], &names[1]), Ordering::Greater);
        prop_assert_ne!(compare(&names[1], &names[2]), Ordering::Greater);
        prop_assert_ne!(compare(&names[0], &names[2]), Ordering::Greater);
    }
}
