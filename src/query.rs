//! Read-only projections for work queues and reports.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::audit::{AuditEntry, AuditFilter, AuditLog};
use crate::registry::{BillFilter, BillRegistry};
use crate::workflow::{Bill, BillId, Role, Stage};

/// Never mutates; every call works from one snapshot of the registry.
#[derive(Debug, Clone)]
pub struct QueryService {
    registry: Arc<BillRegistry>,
    audit: Arc<AuditLog>,
}

impl QueryService {
    pub fn new(registry: Arc<BillRegistry>, audit: Arc<AuditLog>) -> Self {
        Self { registry, audit }
    }

    pub fn bills_by_stage(&self, stage: Stage) -> Vec<Bill> {
        self.registry.list(&BillFilter::all().stage(stage)).collect()
    }

    pub fn bills_by_branch(&self, branch: &str, stage: Option<Stage>) -> Vec<Bill> {
        let filter = BillFilter {
            stage,
            branch: Some(branch.to_string()),
        };
        self.registry.list(&filter).collect()
    }

    /// Bills waiting on `role`, optionally narrowed to one branch.
    pub fn queue_for(&self, role: Role, branch: Option<&str>) -> Vec<Bill> {
        let filter = BillFilter {
            stage: Some(role.stage()),
            branch: branch.map(str::to_string),
        };
        self.registry.list(&filter).collect()
    }

    pub fn list_bills(&self, stage: Option<Stage>, branch: Option<&str>) -> Vec<Bill> {
        let filter = BillFilter {
            stage,
            branch: branch.map(str::to_string),
        };
        self.registry.list(&filter).collect()
    }

    pub fn list_audit(&self, bill: Option<BillId>) -> Vec<AuditEntry> {
        let filter = bill.map_or_else(AuditFilter::all, AuditFilter::for_bill);
        self.audit.list(&filter)
    }

    /// Sum of amounts per branch across every stage, rejected bills included.
    /// A sum past `Decimal::MAX` saturates.
    pub fn branch_totals(&self) -> BTreeMap<String, Decimal> {
        self.registry
            .list(&BillFilter::all())
            .fold(BTreeMap::new(), |mut totals, bill| {
                let total = totals.entry(bill.branch).or_insert(Decimal::ZERO);
                *total = total.saturating_add(bill.amount);
                totals
            })
    }
}
