use folio_domain::sections::{SectionFlags, SectionKey, Visibility};
use proptest::prelude::*;

fn any_section() -> impl Strategy<Value = SectionKey> {
    prop::sample::select(SectionKey::ALL.to_vec())
}

fn any_visibility() -> impl Strategy<Value = Visibility> {
    prop_oneof![Just(Visibility::Visible), Just(Visibility::Hidden)]
}

fn any_flags() -> impl Strategy<Value = SectionFlags> {
    prop::collection::vec((any_section(), any_visibility()), 0..12)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn wire_form_is_lossless(flags in any_flags()) {
        let json = serde_json::to_string(&flags).unwrap();
        let back: SectionFlags = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, flags);
    }

    #[test]
    fn only_the_exact_word_hides(section in any_section(), value in "\\PC{0,12}") {
        let doc = serde_json::json!({ (section.wire_key()): value.clone() });
        let flags: SectionFlags = serde_json::from_value(doc).unwrap();
        prop_assert_eq!(flags.get(section).is_hidden(), value == "hidden");
    }

    #[test]
    fn defaults_never_unhide(flags in any_flags()) {
        let full = flags.clone().with_defaults();
        prop_assert!(full.is_complete());
        for key in SectionKey::ALL {
            prop_assert_eq!(full.get(key), flags.get(key));
        }
    }
}
