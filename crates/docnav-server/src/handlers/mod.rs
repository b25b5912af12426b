//! HTTP request handlers.

pub(crate) mod docs;
pub(crate) mod sidebar;
pub(crate) mod structure;
