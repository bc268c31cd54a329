//! Maker-checker-approver workflow engine for bill payments.
//!
//! Bills are created at the maker stage, reviewed by a checker and settled
//! by an approver. [`WorkflowEngine`] is the only writer of bill state and
//! pairs every change with an entry in the append-only [`AuditLog`].
//! [`QueryService`] offers read-only views for queues and reports.

pub mod audit;
pub mod batch;
pub mod billers;
pub mod config;
pub mod error;
pub mod export;
pub mod query;
pub mod registry;
pub mod seed;
pub mod telemetry;
pub mod workflow;

pub use audit::{Actor, AuditEntry, AuditEvent, AuditFilter, AuditLog};
pub use error::{BillflowError, ErrorKind, ValidationError, WorkflowError};
pub use query::QueryService;
pub use registry::{BillFilter, BillRegistry};
pub use workflow::{Bill, BillDraft, BillId, Event, Role, Stage, Status, WorkflowEngine};
