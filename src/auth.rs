//! Auth-domain values: validated names, credentials, profiles, and accounts.

pub mod account;
pub mod credentials;
pub mod id;
pub mod profile;

pub use account::*;
pub use credentials::*;
pub use id::*;
pub use profile::*;
