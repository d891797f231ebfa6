//! Request interceptors used by the gateway pipeline.

pub mod cors;
pub mod identity;
pub mod request_id;
pub mod session;
