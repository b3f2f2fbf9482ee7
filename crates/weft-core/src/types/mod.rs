mod id;
mod locale;
mod slug;
mod timestamp;
mod ulid;
mod width;

pub use id::Id;
pub use locale::{Locale, LocaleError};
pub use slug::{Slug, SlugError};
pub use timestamp::Timestamp;
pub use ulid::{Ulid, UlidError};
pub use width::{ColWidth, WidthError};
