//! Core business logic for `MessMate`.
//!
//! Framework-agnostic operations over the entities: subscription cycle
//! management, the attendance ledger, fee aggregation, payments, and user
//! lifecycle. Everything here takes a database connection and plain values;
//! the HTTP layer stays a thin shell around these functions.

/// Attendance ledger - marking, updating, listing, and counting meal records
pub mod attendance;
/// Subscription window - cycle bounds and expiry rollover
pub mod cycle;
/// Fee aggregation - accrued fees, outstanding balance, monthly report
pub mod fees;
/// Payment ledger - recording payments and querying history
pub mod payment;
/// User lifecycle - registration, token lookup, profile updates, mess reset
pub mod user;
