//! Domain core for the staff authentication service.
//!
//! - [`error`] -- closed error taxonomy shared across crates.
//! - [`roles`] -- fixed role identifiers and display names.
//! - [`permissions`] -- immutable operation -> role-set table.
//! - [`token`] -- opaque token generation and storage digests.
//! - [`store`] -- the `SessionStore` persistence seam.
//! - [`session`] -- the session lifecycle manager.

pub mod error;
pub mod permissions;
pub mod roles;
pub mod session;
pub mod store;
pub mod token;
pub mod types;
