//! Bill identity and storage.
//!
//! Each bill lives behind its own mutex so that transitions on different
//! bills never wait on each other. The outer map lock is held only long
//! enough to insert a bill or clone out a handle.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::error::{ValidationError, WorkflowError};
use crate::workflow::{Bill, BillDraft, BillId, Stage, ValidFields};

/// First number handed out; ids render as `TXN1001`, `TXN1002`, ...
pub const FIRST_BILL_NUMBER: u64 = 1001;

pub(crate) type BillHandle = Arc<Mutex<Bill>>;

/// Which bills [`BillRegistry::list`] should yield. The default matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillFilter {
    pub stage: Option<Stage>,
    pub branch: Option<String>,
}

impl BillFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn matches(&self, bill: &Bill) -> bool {
        self.stage.is_none_or(|s| bill.stage() == s)
            && self.branch.as_deref().is_none_or(|b| bill.branch == b)
    }
}

#[derive(Debug)]
pub struct BillRegistry {
    bills: RwLock<BTreeMap<BillId, BillHandle>>,
    next_number: AtomicU64,
}

impl Default for BillRegistry {
    fn default() -> Self {
        Self {
            bills: RwLock::new(BTreeMap::new()),
            next_number: AtomicU64::new(FIRST_BILL_NUMBER),
        }
    }
}

impl BillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `draft`, allocates a fresh id and stores the bill at the
    /// `Maker` stage. No id is consumed when validation fails.
    pub fn create(&self, draft: &BillDraft) -> Result<Bill, ValidationError> {
        self.create_with(draft, |_| {})
    }

    /// Like [`create`](Self::create), running `on_insert` before any reader
    /// can see the new bill.
    pub(crate) fn create_with<F>(&self, draft: &BillDraft, on_insert: F) -> Result<Bill, ValidationError>
    where
        F: FnOnce(&Bill),
    {
        let fields = draft.validate()?;
        Ok(self.insert_with(fields, Utc::now(), Stage::Maker, on_insert))
    }

    /// Stores already-validated fields at an arbitrary stage. Used to load
    /// bills that entered the workflow before this process started.
    pub(crate) fn insert(
        &self,
        fields: ValidFields,
        created_at: DateTime<Utc>,
        stage: Stage,
    ) -> Bill {
        self.insert_with(fields, created_at, stage, |_| {})
    }

    fn insert_with<F>(
        &self,
        fields: ValidFields,
        created_at: DateTime<Utc>,
        stage: Stage,
        on_insert: F,
    ) -> Bill
    where
        F: FnOnce(&Bill),
    {
        let mut bills = self.bills.write().unwrap_or_else(PoisonError::into_inner);
        let id = BillId::new(self.next_number.fetch_add(1, Ordering::Relaxed));
        let bill = Bill::at_stage(id, fields, created_at, stage);
        on_insert(&bill);
        bills.insert(id, Arc::new(Mutex::new(bill.clone())));
        tracing::debug!(bill = %id, stage = %stage, "bill stored");
        bill
    }

    pub fn get(&self, id: BillId) -> Result<Bill, WorkflowError> {
        let handle = self.handle(id)?;
        let bill = handle.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(bill.clone())
    }

    /// The lock guarding a single bill. Only the engine mutates through it.
    pub(crate) fn handle(&self, id: BillId) -> Result<BillHandle, WorkflowError> {
        self.bills
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(WorkflowError::NotFound(id))
    }

    /// Bills matching `filter`, in id order.
    ///
    /// The result is a snapshot taken when the call is made: transitions
    /// that land while the caller iterates are not reflected.
    pub fn list(&self, filter: &BillFilter) -> std::vec::IntoIter<Bill> {
        self.list_where(|bill| filter.matches(bill))
    }

    /// Like [`list`](Self::list) with an arbitrary predicate.
    pub fn list_where<F>(&self, predicate: F) -> std::vec::IntoIter<Bill>
    where
        F: Fn(&Bill) -> bool,
    {
        let handles: Vec<BillHandle> = self
            .bills
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        let snapshot: Vec<Bill> = handles
            .iter()
            .map(|h| h.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .filter(|bill| predicate(bill))
            .collect();
        snapshot.into_iter()
    }

    pub fn len(&self) -> usize {
        self.bills
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::Status;

    fn draft(branch: &str, amount: &str) -> BillDraft {
        BillDraft::new(branch, "BESCOM", "CN1", amount, "2025-11-05")
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let registry = BillRegistry::new();
        let a = registry.create(&draft("Delhi", "10")).unwrap();
        let b = registry.create(&draft("Delhi", "20")).unwrap();
        assert_eq!(a.id.to_string(), "TXN1001");
        assert_eq!(b.id.to_string(), "TXN1002");
        assert_eq!(a.stage(), Stage::Maker);
        assert_eq!(a.status(), Status::Pending);
    }

    #[test]
    fn invalid_draft_is_not_stored() {
        let registry = BillRegistry::new();
        let err = registry.create(&draft("Delhi", "-5")).unwrap_err();
        assert!(matches!(err, ValidationError::NegativeAmount(_)));
        assert!(registry.is_empty());

        let ok = registry.create(&draft("Delhi", "5")).unwrap();
        assert_eq!(ok.id.number(), FIRST_BILL_NUMBER);
    }

    #[test]
    fn get_unknown_is_not_found() {
        let registry = BillRegistry::new();
        let id = BillId::new(42);
        assert_eq!(registry.get(id), Err(WorkflowError::NotFound(id)));
    }

    #[test]
    fn list_filters_by_stage_and_branch() {
        let registry = BillRegistry::new();
        let fields = draft("Mumbai", "1").validate().unwrap();
        registry.create(&draft("Delhi", "1")).unwrap();
        registry.insert(fields.clone(), Utc::now(), Stage::Checker);
        registry.insert(fields, Utc::now(), Stage::Approver);

        assert_eq!(registry.list(&BillFilter::all()).count(), 3);
        assert_eq!(registry.list(&BillFilter::all().branch("Mumbai")).count(), 2);
        let checker: Vec<Bill> = registry
            .list(&BillFilter::all().branch("Mumbai").stage(Stage::Checker))
            .collect();
        assert_eq!(checker.len(), 1);
        assert_eq!(checker[0].stage(), Stage::Checker);
        assert_eq!(registry.list(&BillFilter::all().branch("Pune")).count(), 0);
    }

    #[test]
    fn list_is_a_snapshot() {
        let registry = BillRegistry::new();
        registry.create(&draft("Delhi", "1")).unwrap();
        let iter = registry.list(&BillFilter::all());
        registry.create(&draft("Delhi", "2")).unwrap();
        assert_eq!(iter.count(), 1);
    }

    #[test]
    fn list_where_takes_any_predicate() {
        let registry = BillRegistry::new();
        registry.create(&draft("Delhi", "100")).unwrap();
        registry.create(&draft("Delhi", "5")).unwrap();
        let big: Vec<Bill> = registry
            .list_where(|b| b.amount > rust_decimal::Decimal::from(50))
            .collect();
        assert_eq!(big.len(), 1);
    }
}
