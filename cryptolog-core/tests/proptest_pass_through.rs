use cryptolog_core::{build_matcher, pseudonym, transform, Salt, SALT_SIZE};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 200;

// Text that can never contain an address: no digits, colons or hex letters.
fn filler_strategy() -> impl Strategy<Value = String> {
    "[g-zG-Z ,;=/\\[\\]\"-]{0,40}"
}

fn ipv4_strategy() -> impl Strategy<Value = String> {
    (0..=999u32, 0..=999u32, 0..=999u32, 0..=999u32)
        .prop_map(|(a, b, c, d)| format!("{}.{}.{}.{}", a, b, c, d))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn prop_filler_passes_through(text in filler_strategy(), seed in any::<u8>()) {
        let matcher = build_matcher(true).unwrap();
        let salt = Salt::from_bytes([seed; SALT_SIZE]);
        prop_assert_eq!(transform(&text, &matcher, &salt), text);
    }

    #[test]
    fn prop_only_address_is_replaced(
        prefix in filler_strategy(),
        suffix in filler_strategy(),
        ip in ipv4_strategy(),
        seed in any::<u8>(),
    ) {
        let matcher = build_matcher(true).unwrap();
        let salt = Salt::from_bytes([seed; SALT_SIZE]);
        let line = format!("{} {} {}", prefix, ip, suffix);

        let out = transform(&line, &matcher, &salt);
        prop_assert_eq!(out, format!("{} {} {}", prefix, pseudonym(&salt, &ip), suffix));
    }

    #[test]
    fn prop_transform_is_deterministic(
        prefix in filler_strategy(),
        ip in ipv4_strategy(),
        seed in any::<u8>(),
    ) {
        let matcher = build_matcher(true).unwrap();
        let salt = Salt::from_bytes([seed; SALT_SIZE]);
        let line = format!("{} {}", prefix, ip);
        prop_assert_eq!(transform(&line, &matcher, &salt), transform(&line, &matcher, &salt));
    }
}
