use crate::{
    model::Website,
    types::{Id, Locale, Timestamp},
};

///
/// RequestContext
///
/// Explicit per-request state threaded through every engine call:
/// the owning website, the requested and default locales, and the
/// request clock. Nothing in the engine reads ambient state.
///

#[derive(Clone, Debug)]
pub struct RequestContext {
    pub website: Id<Website>,
    pub locale: Locale,
    pub default_locale: Locale,
    pub now: Timestamp,
}

impl RequestContext {
    #[must_use]
    pub fn for_website(website: &Website, now: Timestamp) -> Self {
        Self {
            website: website.id,
            locale: website.default_locale.clone(),
            default_locale: website.default_locale.clone(),
            now,
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}
