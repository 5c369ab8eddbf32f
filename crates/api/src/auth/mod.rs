//! Authentication primitives.
//!
//! - [`jwt`] -- validation of provider-issued access tokens.
//! - [`cookies`] -- session cookie names, building and parsing.
//! - [`provider`] -- the [`provider::IdentityProvider`] seam over the hosted
//!   identity service.

pub mod cookies;
pub mod jwt;
pub mod provider;
