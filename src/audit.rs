//! Append-only audit trail.
//!
//! [`AuditLog`] is the accountability backbone of the engine: every bill
//! creation and every stage change lands here exactly once, in causal order.
//! Entries are built only through [`AuditEvent`] constructors, so appending
//! never fails.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::{BillId, Event, Role, Stage};

/// Who performed an audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    Role(Role),
    System,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Role(role) => write!(f, "{role}"),
            Actor::System => write!(f, "System"),
        }
    }
}

impl From<Role> for Actor {
    fn from(role: Role) -> Self {
        Actor::Role(role)
    }
}

/// The shape of an entry before the log assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    action: String,
    actor: Actor,
    bill_id: Option<BillId>,
    from_stage: Option<Stage>,
    to_stage: Option<Stage>,
}

impl AuditEvent {
    pub fn created(bill: BillId, role: Role) -> Self {
        Self {
            action: "created".to_string(),
            actor: Actor::Role(role),
            bill_id: Some(bill),
            from_stage: None,
            to_stage: Some(Stage::Maker),
        }
    }

    pub fn transitioned(bill: BillId, event: Event, from: Stage, to: Stage, role: Role) -> Self {
        Self {
            action: format!("{event}: {from} -> {to}"),
            actor: Actor::Role(role),
            bill_id: Some(bill),
            from_stage: Some(from),
            to_stage: Some(to),
        }
    }

    /// A system-level entry with no bill attached.
    pub fn system(message: impl Into<String>) -> Self {
        Self {
            action: message.into(),
            actor: Actor::System,
            bill_id: None,
            from_stage: None,
            to_stage: None,
        }
    }
}

/// Immutable record of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    /// 1-based position in the log.
    pub seq: u64,
    pub action: String,
    pub actor: Actor,
    pub bill_id: Option<BillId>,
    pub from_stage: Option<Stage>,
    pub to_stage: Option<Stage>,
    pub timestamp: DateTime<Utc>,
}

/// Narrows [`AuditLog::list`]. The default matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditFilter {
    pub bill_id: Option<BillId>,
    pub actor: Option<Actor>,
}

impl AuditFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_bill(bill: BillId) -> Self {
        Self {
            bill_id: Some(bill),
            ..Self::default()
        }
    }

    pub fn by_actor(mut self, actor: impl Into<Actor>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.bill_id.is_none_or(|id| entry.bill_id == Some(id))
            && self.actor.is_none_or(|actor| entry.actor == actor)
    }
}

#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps and stores `event`, returning the stored entry.
    ///
    /// The timestamp never goes backwards relative to the previous entry,
    /// even if the wall clock does.
    pub fn append(&self, event: AuditEvent) -> AuditEntry {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();
        let timestamp = match entries.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            seq: entries.len() as u64 + 1,
            action: event.action,
            actor: event.actor,
            bill_id: event.bill_id,
            from_stage: event.from_stage,
            to_stage: event.to_stage,
            timestamp,
        };
        tracing::debug!(seq = entry.seq, action = %entry.action, actor = %entry.actor, "audit entry appended");
        entries.push(entry.clone());
        entry
    }

    /// Matching entries, oldest first.
    pub fn list(&self, filter: &AuditFilter) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
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

    #[test]
    fn append_assigns_sequence_and_ids() {
        let log = AuditLog::new();
        let a = log.append(AuditEvent::system("System initialized with sample data"));
        let b = log.append(AuditEvent::created(BillId::new(1001), Role::Maker));
        assert_eq!(a.seq, 1);
        assert_eq!(b.seq, 2);
        assert_ne!(a.id, b.id);
        assert!(b.timestamp >= a.timestamp);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn system_entries_have_no_bill() {
        let log = AuditLog::new();
        let entry = log.append(AuditEvent::system("boot"));
        assert_eq!(entry.actor, Actor::System);
        assert!(entry.bill_id.is_none());
        assert_eq!(entry.actor.to_string(), "System");
    }

    #[test]
    fn transition_entries_describe_the_edge() {
        let log = AuditLog::new();
        let entry = log.append(AuditEvent::transitioned(
            BillId::new(5),
            Event::Approve,
            Stage::Checker,
            Stage::Approver,
            Role::Checker,
        ));
        assert_eq!(entry.action, "approve: Checker -> Approver");
        assert_eq!(entry.from_stage, Some(Stage::Checker));
        assert_eq!(entry.to_stage, Some(Stage::Approver));
        assert_eq!(entry.actor, Actor::Role(Role::Checker));
    }

    #[test]
    fn list_filters_and_keeps_order() {
        let log = AuditLog::new();
        let one = BillId::new(1);
        let two = BillId::new(2);
        log.append(AuditEvent::created(one, Role::Maker));
        log.append(AuditEvent::created(two, Role::Maker));
        log.append(AuditEvent::transitioned(
            one,
            Event::Submit,
            Stage::Maker,
            Stage::Checker,
            Role::Maker,
        ));
        log.append(AuditEvent::system("noise"));

        let for_one = log.list(&AuditFilter::for_bill(one));
        assert_eq!(for_one.len(), 2);
        assert_eq!(for_one[0].action, "created");
        assert_eq!(for_one[1].action, "submit: Maker -> Checker");

        let system = log.list(&AuditFilter::all().by_actor(Actor::System));
        assert_eq!(system.len(), 1);

        let all = log.list(&AuditFilter::all());
        let seqs: Vec<u64> = all.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4]);
    }

    #[test]
    fn listing_returns_copies() {
        let log = AuditLog::new();
        log.append(AuditEvent::system("boot"));
        let mut copy = log.list(&AuditFilter::all());
        copy[0].action = "tampered".into();
        assert_eq!(log.list(&AuditFilter::all())[0].action, "boot");
    }
}
