use folio_domain::sections::{SectionFlags, SectionKey, Visibility};
use folio_settings::{HomeSection, compose, should_render};
use proptest::prelude::*;

fn arb_flags() -> impl Strategy<Value = SectionFlags> {
    proptest::collection::vec(
        (
            proptest::sample::select(SectionKey::ALL.to_vec()),
            prop_oneof![Just(Visibility::Visible), Just(Visibility::Hidden)],
        ),
        0..12,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

#[test]
fn hidden_hero_leaves_about_alone() {
    let flags = SectionFlags::new().with(SectionKey::Hero, Visibility::Hidden);
    assert!(should_render(SectionKey::About, &flags));
    assert!(!should_render(SectionKey::Hero, &flags));
}

#[test]
fn explicit_hidden_is_honored() {
    let flags = SectionFlags::new().with(SectionKey::About, Visibility::Hidden);
    assert!(!should_render(SectionKey::About, &flags));
}

proptest! {
    #[test]
    fn only_explicit_hidden_blocks(flags in arb_flags()) {
        for key in SectionKey::ALL {
            let hidden = flags.explicit(key) == Some(Visibility::Hidden);
            prop_assert_eq!(should_render(key, &flags), !hidden);
        }
    }

    #[test]
    fn composition_keeps_fixed_order(flags in arb_flags()) {
        let sections = compose(&flags);
        let positions: Vec<_> = sections
            .iter()
            .map(|s| HomeSection::ORDER.iter().position(|o| o == s).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(sections.contains(&HomeSection::Skills));
        prop_assert!(sections.contains(&HomeSection::Education));
    }

    #[test]
    fn completing_defaults_changes_nothing_visible(flags in arb_flags()) {
        prop_assert_eq!(compose(&flags), compose(&flags.clone().with_defaults()));
    }
}
