//! POS API

pub(crate) mod handlers;
