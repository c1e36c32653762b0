//! Section visibility registry.
//!
//! The registry maps every gated homepage section to [`Visibility`]. On the wire it is one
//! JSON object whose keys follow the `<section>Visibility` convention:
//!
//! ```json
//! { "heroVisibility": "visible", "galleryVisibility": "hidden" }
//! ```
//!
//! Reading is lenient: only the exact string `"hidden"` hides a section, unknown keys are
//! ignored, and an absent key means visible. A broken registry therefore never hides
//! content by accident.

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Homepage sections whose presence the admin can toggle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, Display, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum SectionKey {
    Hero,
    About,
    Publications,
    Training,
    Activities,
    Experiences,
    Appointments,
    Gallery,
    Leadership,
    Reviews,
}

impl SectionKey {
    pub const ALL: [Self; 10] = [
        Self::Hero,
        Self::About,
        Self::Publications,
        Self::Training,
        Self::Activities,
        Self::Experiences,
        Self::Appointments,
        Self::Gallery,
        Self::Leadership,
        Self::Reviews,
    ];

    /// Key of this section inside the flags document.
    #[must_use]
    pub const fn wire_key(self) -> &'static str {
        match self {
            Self::Hero => "heroVisibility",
            Self::About => "aboutVisibility",
            Self::Publications => "publicationsVisibility",
            Self::Training => "trainingVisibility",
            Self::Activities => "activitiesVisibility",
            Self::Experiences => "experiencesVisibility",
            Self::Appointments => "appointmentsVisibility",
            Self::Gallery => "galleryVisibility",
            Self::Leadership => "leadershipVisibility",
            Self::Reviews => "reviewsVisibility",
        }
    }

    #[must_use]
    pub fn from_wire_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.wire_key() == key)
    }
}

impl FromStr for SectionKey {
    type Err = UnknownSection;

    /// Accepts the bare key (`gallery`) or the wire key (`galleryVisibility`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|section| section.as_ref() == trimmed)
            .or_else(|| Self::from_wire_key(trimmed))
            .ok_or_else(|| UnknownSection { key: value.to_owned() })
    }
}

/// A section name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection {
    pub key: String,
}

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section `{}`", self.key)
    }
}

impl std::error::Error for UnknownSection {}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    #[must_use]
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

/// The `sectionFlags` mapping. May be partial; see [`SectionFlags::with_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionFlags(BTreeMap<SectionKey, Visibility>);

impl SectionFlags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every section present and visible.
    #[must_use]
    pub fn all_visible() -> Self {
        Self(SectionKey::ALL.into_iter().map(|key| (key, Visibility::Visible)).collect())
    }

    /// Effective visibility; an absent key is visible.
    #[must_use]
    pub fn get(&self, key: SectionKey) -> Visibility {
        self.0.get(&key).copied().unwrap_or_default()
    }

    /// The stored value, without the fail-open default.
    #[must_use]
    pub fn explicit(&self, key: SectionKey) -> Option<Visibility> {
        self.0.get(&key).copied()
    }

    pub fn set(&mut self, key: SectionKey, visibility: Visibility) {
        self.0.insert(key, visibility);
    }

    #[must_use]
    pub fn with(mut self, key: SectionKey, visibility: Visibility) -> Self {
        self.set(key, visibility);
        self
    }

    /// Completes the mapping: absent keys become visible, present keys are kept.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        for key in SectionKey::ALL {
            self.0.entry(key).or_default();
        }
        self
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.len() == SectionKey::ALL.len()
    }

    pub fn hidden(&self) -> impl Iterator<Item = SectionKey> + '_ {
        self.0.iter().filter(|(_, visibility)| visibility.is_hidden()).map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, Visibility)> + '_ {
        self.0.iter().map(|(key, visibility)| (*key, *visibility))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SectionKey, Visibility)> for SectionFlags {
    fn from_iter<I: IntoIterator<Item = (SectionKey, Visibility)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for SectionFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, visibility) in &self.0 {
            map.serialize_entry(key.wire_key(), visibility)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SectionFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FlagsVisitor)
    }
}

struct FlagsVisitor;

impl<'de> Visitor<'de> for FlagsVisitor {
    type Value = SectionFlags;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a section flags object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut flags = SectionFlags::new();
        while let Some(key) = map.next_key::<String>()? {
            match SectionKey::from_wire_key(&key) {
                Some(section) => {
                    let LenientVisibility(visibility) = map.next_value()?;
                    flags.set(section, visibility);
                },
                None => {
                    map.next_value::<IgnoredAny>()?;
                },
            }
        }
        Ok(flags)
    }
}

/// Any JSON value; only the exact string `"hidden"` maps to [`Visibility::Hidden`].
struct LenientVisibility(Visibility);

impl<'de> Deserialize<'de> for LenientVisibility {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LenientVisitor)
    }
}

struct LenientVisitor;

impl LenientVisitor {
    const VISIBLE: LenientVisibility = LenientVisibility(Visibility::Visible);
}

impl<'de> Visitor<'de> for LenientVisitor {
    type Value = LenientVisibility;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any value")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        let visibility = if value == "hidden" { Visibility::Hidden } else { Visibility::Visible };
        Ok(LenientVisibility(visibility))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Self::VISIBLE)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(Self::VISIBLE)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(Self::VISIBLE)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(Self::VISIBLE)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Self::VISIBLE)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Self::VISIBLE)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Self::VISIBLE)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Self::VISIBLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read(value: serde_json::Value) -> SectionFlags {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn absent_key_is_visible() {
        let flags = read(json!({ "heroVisibility": "hidden" }));
        assert_eq!(flags.get(SectionKey::About), Visibility::Visible);
        assert_eq!(flags.explicit(SectionKey::About), None);
        assert_eq!(flags.get(SectionKey::Hero), Visibility::Hidden);
    }

    #[test]
    fn only_exact_hidden_hides() {
        let flags = read(json!({
            "heroVisibility": "hidden ",
            "aboutVisibility": "HIDDEN",
            "galleryVisibility": 0,
            "reviewsVisibility": null,
            "trainingVisibility": ["hidden"],
            "leadershipVisibility": { "hidden": true },
            "activitiesVisibility": false,
        }));

        assert!(SectionKey::ALL.into_iter().all(|key| flags.get(key) == Visibility::Visible));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let flags = read(json!({ "_id": "abc", "hero": "hidden", "galleryVisibility": "hidden" }));
        assert_eq!(flags.len(), 1);
        assert_eq!(flags.hidden().collect::<Vec<_>>(), [SectionKey::Gallery]);
    }

    #[test]
    fn serializes_only_present_keys_with_wire_names() {
        let flags = SectionFlags::new().with(SectionKey::Gallery, Visibility::Hidden);
        assert_eq!(serde_json::to_value(&flags).unwrap(), json!({ "galleryVisibility": "hidden" }));
    }

    #[test]
    fn defaults_fill_without_overwriting() {
        let flags = SectionFlags::new().with(SectionKey::Reviews, Visibility::Hidden).with_defaults();
        assert!(flags.is_complete());
        assert_eq!(flags.get(SectionKey::Reviews), Visibility::Hidden);
        assert_eq!(flags.hidden().count(), 1);
    }

    #[test]
    fn parses_bare_and_wire_keys() {
        assert_eq!("gallery".parse::<SectionKey>(), Ok(SectionKey::Gallery));
        assert_eq!("galleryVisibility".parse::<SectionKey>(), Ok(SectionKey::Gallery));
        assert_eq!(
            "skills".parse::<SectionKey>(),
            Err(UnknownSection { key: "skills".to_owned() })
        );
    }

    #[test]
    fn visibility_wire_values() {
        assert_eq!(serde_json::to_value(Visibility::Hidden).unwrap(), json!("hidden"));
        assert_eq!("visible".parse::<Visibility>().unwrap(), Visibility::Visible);
        assert!("Hidden ".parse::<Visibility>().is_err());
    }

    #[test]
    fn non_object_documents_are_rejected() {
        assert!(serde_json::from_value::<SectionFlags>(json!(["heroVisibility"])).is_err());
    }
}
