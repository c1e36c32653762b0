//! Content resources served next to the visibility registry.
//!
//! Every resource is a collection of JSON records at `/<path>`. Records carry a server
//! assigned `_id` and a `createdAt` timestamp; the remaining fields are free-form, except
//! for a few required non-blank strings per resource.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Unknown fields survive a read-modify-write round trip through the typed models.
pub type ExtraFields = BTreeMap<String, Value>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, Display, EnumString, IntoStaticStr,
)]
pub enum ContentResource {
    #[strum(serialize = "hero-section")]
    Hero,
    #[strum(serialize = "about-section")]
    About,
    #[strum(serialize = "skills")]
    Skills,
    #[strum(serialize = "educations")]
    Educations,
    #[strum(serialize = "experience")]
    Experience,
    #[strum(serialize = "trainings")]
    Trainings,
    #[strum(serialize = "leadership")]
    Leadership,
    #[strum(serialize = "activity")]
    Activity,
    #[strum(serialize = "appointments")]
    Appointments,
    #[strum(serialize = "gallery")]
    Gallery,
    #[strum(serialize = "references")]
    References,
    #[strum(serialize = "publications")]
    Publications,
}

impl ContentResource {
    pub const ALL: [Self; 12] = [
        Self::Hero,
        Self::About,
        Self::Skills,
        Self::Educations,
        Self::Experience,
        Self::Trainings,
        Self::Leadership,
        Self::Activity,
        Self::Appointments,
        Self::Gallery,
        Self::References,
        Self::Publications,
    ];

    /// URL segment, also the store collection name.
    #[must_use]
    pub fn path(self) -> &'static str {
        self.into()
    }

    #[must_use]
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Hero => &["title", "name"],
            Self::About => &["name", "descriptions"],
            Self::Skills => &["skill"],
            Self::Educations => &["degreeName", "instituteName"],
            Self::Experience => &["role", "where"],
            Self::Trainings => &["trainingName"],
            Self::Leadership | Self::Publications => &["title"],
            Self::Activity => &["activityTitle"],
            Self::Appointments => &["name", "email", "date", "time"],
            Self::Gallery => &["title", "image"],
            Self::References => &["name", "comment"],
        }
    }

    /// Singletons hold at most one record.
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Hero | Self::About)
    }

    /// Required fields that are absent, not strings, or blank.
    #[must_use]
    pub fn missing_fields(self, record: &Map<String, Value>) -> Vec<&'static str> {
        self.required_fields()
            .iter()
            .copied()
            .filter(|field| {
                !record.get(*field).and_then(Value::as_str).is_some_and(|s| !s.trim().is_empty())
            })
            .collect()
    }

    /// Required fields the record carries with a blank or non-string value. Absent fields
    /// are not reported, so a partial patch passes.
    #[must_use]
    pub fn blank_fields(self, record: &Map<String, Value>) -> Vec<&'static str> {
        self.required_fields()
            .iter()
            .copied()
            .filter(|field| {
                record
                    .get(*field)
                    .is_some_and(|value| !value.as_str().is_some_and(|s| !s.trim().is_empty()))
            })
            .collect()
    }
}

/// A typed view over one record of a [`ContentResource`].
pub trait ContentEntry: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const RESOURCE: ContentResource;

    fn id(&self) -> Option<&str>;
}

macro_rules! content_entry {
    (
        $(#[$meta:meta])*
        $name:ident => $resource:ident {
            $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
            pub id: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub created_at: Option<String>,
            $(
                $(#[$field_meta])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: $ty,
            )*
            #[serde(flatten)]
            pub extra: ExtraFields,
        }

        impl ContentEntry for $name {
            const RESOURCE: ContentResource = ContentResource::$resource;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }
        }
    };
}

content_entry! {
    /// Landing banner; singleton.
    HeroContent => Hero {
        title: Option<String>,
        subtitle: Option<String>,
        type_text: Option<String>,
        descriptions: Option<String>,
        btn_name: Option<String>,
        name: Option<String>,
        profile_image: Option<String>,
    }
}

content_entry! {
    /// Biography; singleton.
    AboutContent => About {
        name: Option<String>,
        descriptions: Option<String>,
    }
}

content_entry! {
    SkillEntry => Skills {
        skill: Option<String>,
        descriptions: Option<String>,
    }
}

content_entry! {
    EducationEntry => Educations {
        degree_name: Option<String>,
        institute_name: Option<String>,
        location: Option<String>,
        session: Option<String>,
        course_duration: Option<String>,
        gpa: Option<String>,
        cgpa: Option<String>,
        passing_year: Option<String>,
        institute_logo: Option<String>,
        description: Option<String>,
        merit_position: Option<String>,
        /// `"yes"` or `"no"`.
        has_award: Option<String>,
    }
}

content_entry! {
    ExperienceEntry => Experience {
        role: Option<String>,
        #[serde(rename = "where")]
        place: Option<String>,
        description: Option<String>,
        #[serde(rename = "type")]
        kind: Option<String>,
        mode: Option<String>,
        joining_date: Option<String>,
        resign_date: Option<String>,
        duration: Option<String>,
    }
}

content_entry! {
    TrainingEntry => Trainings {
        training_name: Option<String>,
        training_from: Option<String>,
        cover_photo: Option<String>,
        description: Option<String>,
        duration: Option<String>,
        joining_date: Option<String>,
        completed_date: Option<String>,
        award: Option<String>,
        merit_position: Option<String>,
    }
}

content_entry! {
    LeadershipEntry => Leadership {
        title: Option<String>,
        subtitle: Option<String>,
        description: Option<String>,
        date: Option<String>,
        achievement: Option<String>,
        image: Option<String>,
    }
}

content_entry! {
    ActivityEntry => Activity {
        activity_title: Option<String>,
        activity_description: Option<String>,
        cover_photos: Option<Vec<String>>,
    }
}

content_entry! {
    /// Visitor booking request.
    AppointmentRequest => Appointments {
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        date: Option<String>,
        time: Option<String>,
        message: Option<String>,
    }
}

content_entry! {
    GalleryItem => Gallery {
        title: Option<String>,
        image: Option<String>,
    }
}

content_entry! {
    ReviewEntry => References {
        name: Option<String>,
        profession: Option<String>,
        institute: Option<String>,
        comment: Option<String>,
        profile_image: Option<String>,
    }
}

content_entry! {
    PublicationEntry => Publications {
        title: Option<String>,
        subtitle: Option<String>,
        date: Option<String>,
        author: Option<String>,
        total_contributors: Option<String>,
        supervisor_name: Option<String>,
        supervisor_position: Option<String>,
        supervisor_institute: Option<String>,
        publication_link: Option<String>,
        cover_photo_url: Option<String>,
        description: Option<String>,
    }
}
