//! Caller identity - who is ringing up the sale and which store they work in.
//!
//! Authentication itself happens upstream; this crate only consumes the result.

use crate::errors::{Error, Result};

/// Identity context for a request, established by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// ID of the authenticated cashier (or admin) making the request
    pub cashier_id: String,
    /// Store the cashier is assigned to, if any (superadmins have none)
    pub store_id: Option<i64>,
}

impl Identity {
    /// Creates a new identity.
    #[must_use]
    pub fn new(cashier_id: impl Into<String>, store_id: Option<i64>) -> Self {
        Self {
            cashier_id: cashier_id.into(),
            store_id,
        }
    }

    /// Picks the store a request targets: the explicit one if given, otherwise
    /// the caller's assigned store.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRequest`] when neither is available.
    pub fn resolve_store(&self, requested: Option<i64>) -> Result<i64> {
        requested
            .or(self.store_id)
            .ok_or_else(|| Error::invalid_request("Store ID is required"))
    }
}
