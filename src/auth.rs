//! Auth-domain identifiers, identities, profiles, and credential wrappers.

pub mod id;
pub mod identity;
pub mod profile;
pub mod secret;

pub use id::*;
pub use identity::*;
pub use profile::*;
pub use secret::*;
