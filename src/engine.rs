//! Request-time mediators orchestrating authentication, login completion,
//! and logout.

pub mod callback;
pub mod logout;
pub mod security;

pub use callback::*;
pub use logout::*;
pub use security::*;
