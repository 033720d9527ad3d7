//! Domain types shared by every authentication scheme.
//!
//! - [`Metadata`]: the generic nested mapping exchanged with storage and API collaborators
//! - [`Format`]: the representation a transform reads or produces
//! - [`SecretString`]: an in-memory secret that never prints itself

pub mod format;
pub mod metadata;
pub mod secret;

pub use format::Format;
pub use metadata::Metadata;
pub use secret::SecretString;
