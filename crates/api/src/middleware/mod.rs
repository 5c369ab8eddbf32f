//! Authentication middleware and extractors.
//!
//! - [`session::refresh_session`] -- renews expired sessions from the refresh cookie.
//! - [`auth::AuthUser`] -- requires an authenticated user.
//! - [`auth::MaybeAuthUser`] -- the authenticated user, if any.

pub mod auth;
pub mod session;
