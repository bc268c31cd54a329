use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The five stages of the approval workflow.
///
/// Each bill flows through: MAKER → CHECKER → APPROVER → COMPLETED,
/// and may leave to REJECTED from the checker or approver stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Maker,
    Checker,
    Approver,
    Completed,
    Rejected,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Maker,
        Stage::Checker,
        Stage::Approver,
        Stage::Completed,
        Stage::Rejected,
    ];

    /// `Completed` and `Rejected` accept no further events.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Rejected)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Maker => write!(f, "Maker"),
            Stage::Checker => write!(f, "Checker"),
            Stage::Approver => write!(f, "Approver"),
            Stage::Completed => write!(f, "Completed"),
            Stage::Rejected => write!(f, "Rejected"),
        }
    }
}

impl FromStr for Stage {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maker" => Ok(Stage::Maker),
            "checker" => Ok(Stage::Checker),
            "approver" => Ok(Stage::Approver),
            "completed" => Ok(Stage::Completed),
            "rejected" => Ok(Stage::Rejected),
            _ => Err(ParseEnumError::new("stage", s)),
        }
    }
}

/// An actor capability. Who holds it is decided outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Maker,
    Checker,
    Approver,
}

impl Role {
    /// The stage whose work queue this role services.
    pub fn stage(self) -> Stage {
        match self {
            Role::Maker => Stage::Maker,
            Role::Checker => Stage::Checker,
            Role::Approver => Stage::Approver,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Maker => write!(f, "Maker"),
            Role::Checker => write!(f, "Checker"),
            Role::Approver => write!(f, "Approver"),
        }
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maker" => Ok(Role::Maker),
            "checker" => Ok(Role::Checker),
            "approver" => Ok(Role::Approver),
            _ => Err(ParseEnumError::new("role", s)),
        }
    }
}

/// A request to move a bill along an edge of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Submit,
    Approve,
    Reject,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Submit => write!(f, "submit"),
            Event::Approve => write!(f, "approve"),
            Event::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for Event {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submit" => Ok(Event::Submit),
            "approve" => Ok(Event::Approve),
            "reject" => Ok(Event::Reject),
            _ => Err(ParseEnumError::new("event", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// One edge of the workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: Stage,
    pub event: Event,
    pub to: Stage,
    pub role: Role,
}

/// Every legal transition. Anything not listed here is rejected.
pub const TRANSITIONS: [Edge; 5] = [
    Edge { from: Stage::Maker, event: Event::Submit, to: Stage::Checker, role: Role::Maker },
    Edge { from: Stage::Checker, event: Event::Approve, to: Stage::Approver, role: Role::Checker },
    Edge { from: Stage::Checker, event: Event::Reject, to: Stage::Rejected, role: Role::Checker },
    Edge { from: Stage::Approver, event: Event::Approve, to: Stage::Completed, role: Role::Approver },
    Edge { from: Stage::Approver, event: Event::Reject, to: Stage::Rejected, role: Role::Approver },
];

/// Why the state machine refused an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The bill is already `Completed` or `Rejected`.
    Terminal,
    /// No edge leaves the current stage for this event, or the request is
    /// stale: the role performs this event, but from another stage.
    NoEdge,
    /// The edge exists but belongs to a different role.
    WrongRole { required: Role },
}

/// Pure evaluation of the transition table.
pub struct StateMachine;

impl StateMachine {
    /// Resolve the destination stage for `event` performed by `role` on a bill
    /// sitting at `stage`.
    ///
    /// Checks run in order: terminal stage, missing edge, role. A role whose
    /// own edge for `event` leaves an earlier stage gets `NoEdge` rather than
    /// `WrongRole`, so a retried request (e.g. a checker approving twice)
    /// surfaces as an invalid transition. A role acting on a stage it has not
    /// reached yet (an approver at Checker) is still `WrongRole`.
    pub fn resolve(stage: Stage, event: Event, role: Role) -> Result<Stage, Rejection> {
        if stage.is_terminal() {
            return Err(Rejection::Terminal);
        }
        let edge = Self::edge(stage, event).ok_or(Rejection::NoEdge)?;
        if edge.role == role {
            return Ok(edge.to);
        }
        let already_passed = TRANSITIONS
            .iter()
            .any(|e| e.event == event && e.role == role && e.from < stage);
        if already_passed {
            Err(Rejection::NoEdge)
        } else {
            Err(Rejection::WrongRole {
                required: edge.role,
            })
        }
    }

    /// The edge leaving `stage` on `event`, if any.
    pub fn edge(stage: Stage, event: Event) -> Option<Edge> {
        TRANSITIONS
            .iter()
            .copied()
            .find(|e| e.from == stage && e.event == event)
    }

    /// Events that may be fired from `stage`, in table order.
    pub fn events_from(stage: Stage) -> Vec<Event> {
        TRANSITIONS
            .iter()
            .filter(|e| e.from == stage)
            .map(|e| e.event)
            .collect()
    }
}
