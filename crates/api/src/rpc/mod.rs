//! Named, input-validated procedures over one batched HTTP endpoint.
//!
//! - [`protocol`] -- error codes and response envelopes.
//! - [`registry`] -- procedure registration and single-call dispatch.
//! - [`batch`] -- single and batched execution of an HTTP request.

pub mod batch;
pub mod protocol;
pub mod registry;

pub use protocol::{RpcError, RpcErrorCode};
pub use registry::{Access, CallContext, ProcedureKind, RpcRouter};
