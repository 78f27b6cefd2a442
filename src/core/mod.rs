//! Core business logic, independent of the HTTP layer.

/// Caller identity context
pub mod identity;
/// Invoice creation workflow and invoice queries
pub mod invoice;
/// Product catalogue and stock primitives
pub mod product;
/// Store management
pub mod store;
