//! Kernel utilities shared across Folio slices.
//!
//! * `safe_nanoid!` for record ids without look-alike characters.
//! * [`config::load_config`] for layered `server.toml` + `FOLIO__*` configuration.
//! * `server` (feature): application state, the slice registry, the JSON error body and
//!   the `/health` route.
//! * `client` (feature): the HTTP client the admin and public surfaces talk through, its
//!   error taxonomy, cancellation scopes and user notices.
//!
//! ```rust
//! # use folio_kernel::safe_nanoid;
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 12);
//! ```

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;

/// `2-9`, `A-Z` without `I`/`O`, `a-z` without `l`/`i`/`o`.
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub use folio_domain as domain;
pub use nanoid::nanoid;

/// Generates a `NanoID` over [`SAFE_ALPHABET`]; 12 characters unless a size is given.
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!(12, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
