//! Weighbridge API server library.
//!
//! Exposes the building blocks (config, state, storage provider, RPC layer,
//! auth, routes) so integration tests and the binary entrypoint share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod procedures;
pub mod router;
pub mod routes;
pub mod rpc;
pub mod state;
pub mod storage;
