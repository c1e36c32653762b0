//! Public side of the visibility registry: which homepage sections get mounted.

use folio_domain::content::ContentResource;
use folio_domain::sections::{SectionFlags, SectionKey};
use strum_macros::{AsRefStr, Display};

/// `false` only for an explicit `hidden`; absent keys render.
#[must_use]
pub fn should_render(key: SectionKey, flags: &SectionFlags) -> bool {
    !flags.get(key).is_hidden()
}

/// Sections of the public homepage, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum HomeSection {
    Hero,
    About,
    Skills,
    Education,
    Publications,
    Training,
    Activities,
    Experiences,
    Leadership,
    Gallery,
    Reviews,
    Appointments,
}

impl HomeSection {
    pub const ORDER: [Self; 12] = [
        Self::Hero,
        Self::About,
        Self::Skills,
        Self::Education,
        Self::Publications,
        Self::Training,
        Self::Activities,
        Self::Experiences,
        Self::Leadership,
        Self::Gallery,
        Self::Reviews,
        Self::Appointments,
    ];

    /// Registry key controlling this section. Skills and education are always shown.
    #[must_use]
    pub const fn gate(self) -> Option<SectionKey> {
        match self {
            Self::Hero => Some(SectionKey::Hero),
            Self::About => Some(SectionKey::About),
            Self::Skills | Self::Education => None,
            Self::Publications => Some(SectionKey::Publications),
            Self::Training => Some(SectionKey::Training),
            Self::Activities => Some(SectionKey::Activities),
            Self::Experiences => Some(SectionKey::Experiences),
            Self::Leadership => Some(SectionKey::Leadership),
            Self::Gallery => Some(SectionKey::Gallery),
            Self::Reviews => Some(SectionKey::Reviews),
            Self::Appointments => Some(SectionKey::Appointments),
        }
    }

    /// Content collection the section renders from.
    #[must_use]
    pub const fn resource(self) -> ContentResource {
        match self {
            Self::Hero => ContentResource::Hero,
            Self::About => ContentResource::About,
            Self::Skills => ContentResource::Skills,
            Self::Education => ContentResource::Educations,
            Self::Publications => ContentResource::Publications,
            Self::Training => ContentResource::Trainings,
            Self::Activities => ContentResource::Activity,
            Self::Experiences => ContentResource::Experience,
            Self::Leadership => ContentResource::Leadership,
            Self::Gallery => ContentResource::Gallery,
            Self::Reviews => ContentResource::References,
            Self::Appointments => ContentResource::Appointments,
        }
    }

    #[must_use]
    pub fn is_visible(self, flags: &SectionFlags) -> bool {
        self.gate().is_none_or(|key| should_render(key, flags))
    }
}

/// Mounted sections for `flags`, in [`HomeSection::ORDER`].
#[must_use]
pub fn compose(flags: &SectionFlags) -> Vec<HomeSection> {
    HomeSection::ORDER.into_iter().filter(|section| section.is_visible(flags)).collect()
}

#[cfg(feature = "client")]
pub use page::{HomePage, PageState};

#[cfg(feature = "client")]
mod page {
    use super::{HomeSection, compose};
    use crate::client::SettingsClient;
    use folio_kernel::client::{ClientError, Notice, ViewScope};
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
    use tokio::task::JoinHandle;
    use tracing::{debug, warn};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PageState {
        /// The registry read is pending; nothing is rendered.
        Loading,
        Ready(Vec<HomeSection>),
        /// The registry could not be read; sections stay unrendered.
        Failed(Notice),
    }

    /// A mounted public homepage.
    ///
    /// Mounting starts one registry read. Its result is applied only while the page is
    /// mounted: after [`HomePage::unmount`] or drop, a late response is discarded.
    #[derive(Debug)]
    pub struct HomePage {
        state: Arc<Mutex<PageState>>,
        scope: ViewScope,
        task: Option<JoinHandle<()>>,
    }

    impl HomePage {
        /// Must be called inside a Tokio runtime.
        #[must_use]
        pub fn mount(client: SettingsClient) -> Self {
            let scope = ViewScope::new();
            let state = Arc::new(Mutex::new(PageState::Loading));

            let load = scope.child();
            let shared = Arc::clone(&state);
            let task = tokio::spawn(async move {
                let next = match load.run(client.load_flags()).await {
                    Ok(flags) => PageState::Ready(compose(&flags)),
                    Err(ClientError::Cancelled { .. }) => return,
                    Err(err) => {
                        warn!(error = %err, "Homepage could not read section flags");
                        PageState::Failed(Notice::failure("Could not load the page", &err))
                    },
                };

                let mut state = lock(&shared);
                if load.is_cancelled() {
                    debug!("Homepage unmounted before section flags arrived");
                    return;
                }
                *state = next;
            });

            Self { state, scope, task: Some(task) }
        }

        #[must_use]
        pub fn state(&self) -> PageState {
            lock(&self.state).clone()
        }

        /// Rendered sections; empty unless the page is ready.
        #[must_use]
        pub fn sections(&self) -> Vec<HomeSection> {
            match &*lock(&self.state) {
                PageState::Ready(sections) => sections.clone(),
                PageState::Loading | PageState::Failed(_) => Vec::new(),
            }
        }

        #[must_use]
        pub fn is_mounted(&self) -> bool {
            !self.scope.is_cancelled()
        }

        /// Tears the page down. A pending registry read is cancelled and never applied.
        pub fn unmount(&self) {
            let _state = lock(&self.state);
            self.scope.cancel();
        }

        /// Waits for the registry read to finish (or be cancelled) and returns the state.
        pub async fn settled(&mut self) -> PageState {
            if let Some(task) = self.task.take() {
                if let Err(err) = task.await {
                    warn!(error = %err, "Homepage load task failed");
                }
            }
            self.state()
        }
    }

    fn lock(state: &Mutex<PageState>) -> MutexGuard<'_, PageState> {
        state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::sections::Visibility;

    #[test]
    fn absent_flags_render_everything() {
        assert_eq!(compose(&SectionFlags::new()), HomeSection::ORDER);
    }

    #[test]
    fn hidden_sections_are_dropped_in_place() {
        let flags = SectionFlags::new()
            .with(SectionKey::Gallery, Visibility::Hidden)
            .with(SectionKey::Hero, Visibility::Hidden);
        let sections = compose(&flags);

        assert!(!sections.contains(&HomeSection::Gallery));
        assert!(!sections.contains(&HomeSection::Hero));
        assert_eq!(sections.first(), Some(&HomeSection::About));
        assert_eq!(sections.len(), HomeSection::ORDER.len() - 2);
    }

    #[test]
    fn skills_and_education_ignore_the_registry() {
        let everything_hidden: SectionFlags =
            SectionKey::ALL.into_iter().map(|key| (key, Visibility::Hidden)).collect();
        assert_eq!(compose(&everything_hidden), [HomeSection::Skills, HomeSection::Education]);
    }

    #[test]
    fn every_registry_key_gates_one_section() {
        for key in SectionKey::ALL {
            let gated = HomeSection::ORDER.iter().filter(|s| s.gate() == Some(key)).count();
            assert_eq!(gated, 1, "{key}");
        }
    }
}
