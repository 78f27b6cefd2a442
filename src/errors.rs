//! Unified error type for the point-of-sale backend.
//!
//! Every fallible operation returns [`Result`]. Callers branch on
//! [`Error::kind`] instead of matching message strings; the HTTP layer uses the
//! same kind to pick a status code.

use sea_orm::{DbErr, RuntimeErr, SqlErr};
use thiserror::Error;

/// Broad failure category, stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-correctable input problem
    Request,
    /// A referenced record does not exist (or not in the requested store)
    NotFound,
    /// Requested quantity exceeds the current stock
    InsufficientStock,
    /// Concurrent contention; the whole request may be retried
    Conflict,
    /// Persistence layer unreachable
    Unavailable,
    /// Anything else (configuration, I/O, unexpected driver errors)
    Internal,
}

impl ErrorKind {
    /// Short machine-readable code, used in API error bodies.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Request => "invalid_request",
            Self::NotFound => "not_found",
            Self::InsufficientStock => "insufficient_stock",
            Self::Conflict => "conflict",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal_error",
        }
    }
}

/// All errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Missing or malformed request input
    #[error("{message}")]
    InvalidRequest {
        /// Human-readable description of the violated precondition
        message: String,
    },

    /// Price is negative, NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Quantity or stock count outside its allowed range
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// No store with this id
    #[error("Store {id} not found")]
    StoreNotFound {
        /// Store id that was looked up
        id: i64,
    },

    /// No product with this id
    #[error("Product {id} not found")]
    ProductNotFound {
        /// Product id that was looked up
        id: i64,
    },

    /// Product does not exist, or belongs to a different store
    #[error("Product {product} not found in this store")]
    ProductNotInStore {
        /// Name supplied by the caller, or the product id
        product: String,
    },

    /// No invoice with this id
    #[error("Invoice {id} not found")]
    InvoiceNotFound {
        /// Invoice id that was looked up
        id: i64,
    },

    /// Requested quantity exceeds the stock on hand
    #[error("Insufficient stock for {product}")]
    InsufficientStock {
        /// Product name
        product: String,
        /// Stock at the time of the check
        available: i64,
        /// Quantity the caller asked for
        requested: i64,
    },

    /// Generated invoice number already exists
    #[error("Invoice number {number} already exists")]
    DuplicateInvoiceNumber {
        /// The colliding number
        number: String,
    },

    /// Concurrent modification detected
    #[error("Transaction conflict: {message}")]
    Conflict {
        /// Description of the contention
        message: String,
    },

    /// Database could not be reached
    #[error("Database unavailable: {message}")]
    DatabaseUnavailable {
        /// Driver message
        message: String,
    },

    /// Any other database error
    #[error("Database error: {0}")]
    Database(DbErr),

    /// I/O failure (config file, socket binding)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the failure category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest { .. } | Self::InvalidAmount { .. } | Self::InvalidQuantity { .. } => {
                ErrorKind::Request
            }
            Self::StoreNotFound { .. }
            | Self::ProductNotFound { .. }
            | Self::ProductNotInStore { .. }
            | Self::InvoiceNotFound { .. } => ErrorKind::NotFound,
            Self::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            Self::DuplicateInvoiceNumber { .. } | Self::Conflict { .. } => ErrorKind::Conflict,
            Self::DatabaseUnavailable { .. } => ErrorKind::Unavailable,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for [`Error::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

// SQLite: BUSY, LOCKED, BUSY_SNAPSHOT. Postgres: serialization_failure, deadlock_detected.
const CONTENTION_CODES: [&str; 5] = ["5", "6", "517", "40001", "40P01"];

fn is_contention(err: &RuntimeErr) -> bool {
    let RuntimeErr::SqlxError(sqlx_err) = err else {
        return false;
    };
    sqlx_err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| CONTENTION_CODES.iter().any(|known| code == *known))
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => Self::DatabaseUnavailable {
                message: err.to_string(),
            },
            DbErr::Exec(runtime) | DbErr::Query(runtime) if is_contention(runtime) => {
                Self::Conflict {
                    message: err.to_string(),
                }
            }
            _ => Self::Database(err),
        }
    }
}

/// Returns true when the database rejected a write because of a unique constraint.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
