use std::sync::{Arc, PoisonError};

use crate::audit::{AuditEvent, AuditLog};
use crate::error::WorkflowError;
use crate::query::QueryService;
use crate::registry::BillRegistry;

use super::bill::{Bill, BillDraft, BillId};
use super::state::{Event, Rejection, Role, StateMachine};

/// Sole writer of bill state. Every accepted change is paired with exactly
/// one audit entry.
///
/// Cloning is cheap and yields a handle onto the same registry and log, so
/// one engine can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct WorkflowEngine {
    registry: Arc<BillRegistry>,
    audit: Arc<AuditLog>,
}

impl WorkflowEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bill at the `Maker` stage on behalf of the maker role.
    pub fn create(&self, draft: &BillDraft) -> Result<Bill, WorkflowError> {
        let bill = self.registry.create_with(draft, |bill| {
            self.audit.append(AuditEvent::created(bill.id, Role::Maker));
        })?;
        tracing::info!(bill = %bill.id, branch = %bill.branch, amount = %bill.amount, "bill created");
        Ok(bill)
    }

    /// Field-by-field form of [`create`](Self::create) returning only the id.
    pub fn create_bill(
        &self,
        branch: &str,
        biller: &str,
        consumer_number: &str,
        amount: &str,
        due_date: &str,
    ) -> Result<BillId, WorkflowError> {
        let draft = BillDraft::new(branch, biller, consumer_number, amount, due_date);
        self.create(&draft).map(|bill| bill.id)
    }

    /// Applies `event` to the bill as `role` and returns the updated bill.
    ///
    /// The bill stays locked from validation until its audit entry is
    /// written, so of two racing identical requests exactly one succeeds and
    /// the other sees the already-moved bill.
    pub fn transition(&self, id: BillId, event: Event, role: Role) -> Result<Bill, WorkflowError> {
        let handle = self.registry.handle(id)?;
        let mut bill = handle.lock().unwrap_or_else(PoisonError::into_inner);
        let from = bill.stage();

        let to = match StateMachine::resolve(from, event, role) {
            Ok(to) => to,
            Err(rejection) => {
                let err = match rejection {
                    Rejection::Terminal => WorkflowError::AlreadyTerminal {
                        bill: id,
                        stage: from,
                    },
                    Rejection::NoEdge => WorkflowError::InvalidTransition {
                        bill: id,
                        stage: from,
                        event,
                    },
                    Rejection::WrongRole { required } => WorkflowError::Unauthorized {
                        bill: id,
                        stage: from,
                        event,
                        role,
                        required,
                    },
                };
                tracing::warn!(bill = %id, %event, %role, error = %err, "transition refused");
                return Err(err);
            }
        };

        bill.move_to(to);
        self.audit
            .append(AuditEvent::transitioned(id, event, from, to, role));
        tracing::info!(bill = %id, %from, %to, %event, %role, "bill transitioned");
        Ok(bill.clone())
    }

    pub fn registry(&self) -> &BillRegistry {
        &self.registry
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Read-only projections over this engine's state.
    pub fn query(&self) -> QueryService {
        QueryService::new(Arc::clone(&self.registry), Arc::clone(&self.audit))
    }
}
