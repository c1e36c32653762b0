pub use crate::config::{ConfigError, load_config};
pub use crate::safe_nanoid;
pub use folio_domain::content::{ContentEntry, ContentResource};
pub use folio_domain::sections::{SectionFlags, SectionKey, Visibility};

#[cfg(feature = "client")]
pub use crate::client::{ApiClient, ClientError, Notice, NoticeLevel, ViewScope};
#[cfg(feature = "server")]
pub use crate::server::error::{ApiErrorBody, ErrorCode};
#[cfg(feature = "server")]
pub use crate::server::state::{ApiState, ApiStateError};
