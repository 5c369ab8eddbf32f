//! The application's RPC procedures.
//!
//! ```text
//! healthCheck               query     public
//! weighing.testConnection   query     public
//! weighing.create           mutation  public
//! weighing.list             query     authenticated
//! weighing.getCompanies     query     public
//! weighing.addCompany       mutation  authenticated
//! weighing.search           query     authenticated
//! ```

pub mod weighing;

use weighbridge_core::weighing::NoInput;

use crate::error::AppResult;
use crate::rpc::{Access, CallContext, RpcRouter};

/// Every procedure, registered under its path.
pub fn app_router() -> RpcRouter {
    let router = RpcRouter::new().query("healthCheck", Access::Public, health_check);
    weighing::register(router)
}

async fn health_check(_ctx: CallContext, _input: NoInput) -> AppResult<&'static str> {
    Ok("OK")
}
