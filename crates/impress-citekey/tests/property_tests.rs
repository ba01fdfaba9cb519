//! Property-based tests for key generation

mod common;

use common::fixtures::article;
use impress_citekey::{
    expand, letter_suffix, CiteKeyGenerator, DuplicateKeyTracker, KeyGeneratorConfig, MacroTable,
};
use proptest::prelude::*;

fn author_field() -> impl Strategy<Value = String> {
    (prop::collection::vec("[A-Z][a-z]{0,8}", 1..7), any::<bool>()).prop_map(|(names, others)| {
        let mut field = names.join(" and ");
        if others {
            field.push_str(" and others");
        }
        field
    })
}

fn macro_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z ]{0,5}",
            "(ieee|acm|jan|pub|nope)".prop_map(|name| format!("#{}#", name)),
        ],
        0..6,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn test_auth_ini_n_never_exceeds_n(field in author_field(), n in 1usize..20) {
        let entry = article(&[("author", field.as_str())]);
        let key = expand(&format!("[authIni{}]", n), &entry, None, ',');
        prop_assert!(key.chars().count() <= n, "authIni{} of {:?} gave {:?}", n, field, key);
    }

    #[test]
    fn test_expansion_is_idempotent(
        field in author_field(),
        title in "[A-Za-z {}\\\\'-]{0,40}",
        year in "[0-9]{0,4}",
    ) {
        let pattern = "[auth][year][shorttitle][authIni3]";
        let config = KeyGeneratorConfig::default().with_default_pattern(pattern);
        let generator = CiteKeyGenerator::new(config).unwrap();
        let entry = article(&[
            ("author", field.as_str()),
            ("title", title.as_str()),
            ("year", year.as_str()),
        ]);
        let tracker = DuplicateKeyTracker::new();

        prop_assert_eq!(generator.raw_key(&entry), generator.raw_key(&entry));
        prop_assert_eq!(
            generator.generate_key(&entry, &tracker),
            generator.generate_key(&entry, &tracker)
        );
    }

    #[test]
    fn test_regenerating_own_key_is_stable(field in author_field(), year in "[0-9]{4}") {
        let generator = CiteKeyGenerator::new(KeyGeneratorConfig::default()).unwrap();
        let mut tracker = DuplicateKeyTracker::new();
        let mut entry = article(&[("author", field.as_str()), ("year", year.as_str())]);

        let first = generator.generate_and_set(&mut entry, &mut tracker);
        let second = generator.generate_and_set(&mut entry, &mut tracker);
        prop_assert_eq!(first.new_key, second.new_key);
    }

    #[test]
    fn test_macro_resolution_reaches_fixed_point(
        text in macro_text(),
        ieee in "[A-Za-z ]{0,12}",
        acm in "[A-Za-z ]{0,12}",
    ) {
        let table = MacroTable::new()
            .with_macro("ieee", ieee)
            .with_macro("acm", acm)
            .with_macro("pub", "#ieee# Press");
        let once = table.resolve(&text);
        prop_assert_eq!(table.resolve(&once), once);
    }

    #[test]
    fn test_letter_suffix_shape(n in 0usize..100_000) {
        let suffix = letter_suffix(n);
        prop_assert!(suffix.chars().all(|c| c.is_ascii_lowercase()));
        prop_assert_ne!(&suffix, &letter_suffix(n + 1));
        let expected_len = if n < 26 {
            1
        } else if n < 26 + 26 * 26 {
            2
        } else if n < 26 + 26 * 26 + 26 * 26 * 26 {
            3
        } else {
            4
        };
        prop_assert_eq!(suffix.len(), expected_len);
    }

    #[test]
    fn test_duplicates_get_distinct_keys(count in 1usize..40) {
        let generator = CiteKeyGenerator::new(KeyGeneratorConfig::default()).unwrap();
        let mut tracker = DuplicateKeyTracker::new();
        let mut keys = std::collections::HashSet::new();
        for _ in 0..count {
            let mut entry = article(&[("author", "John Doe"), ("year", "2020")]);
            let change = generator.generate_and_set(&mut entry, &mut tracker);
            prop_assert!(keys.insert(change.new_key));
        }
        prop_assert!(tracker.duplicates().is_empty());
    }
}

#[test]
fn test_macro_cycle_terminates() {
    let table = MacroTable::new().with_macro("a", "#b#").with_macro("b", "#a#");
    assert_eq!(table.resolve("#a#"), "a");
}
