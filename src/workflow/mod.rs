mod bill;
mod engine;
mod state;

pub use bill::{Bill, BillDraft, BillId, MAX_AMOUNT, Status, ValidFields};
pub use engine::WorkflowEngine;
pub use state::{Edge, Event, ParseEnumError, Rejection, Role, Stage, StateMachine, TRANSITIONS};
