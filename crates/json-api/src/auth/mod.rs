//! Bearer-token authentication and role gating.

pub(crate) mod middleware;

pub(crate) use middleware::{RequireRole, optional};
