//! Terminal rendering: bill tables, audit trails and colored outcomes.
//!
//! Uses the `console` crate for styling. Each [`WorkflowError`] kind is
//! printed with its own label so failures are never reported generically.

use std::collections::BTreeMap;

use console::Style;
use rust_decimal::Decimal;

use billflow::audit::AuditEntry;
use billflow::batch::{Operation, Outcome};
use billflow::error::{ErrorKind, WorkflowError};
use billflow::export::TIMESTAMP_FORMAT;
use billflow::workflow::{Bill, Stage};

pub struct Terminal {
    green: Style,
    red: Style,
    yellow: Style,
    dim: Style,
    bold: Style,
}

impl Default for Terminal {
    fn default() -> Self {
        Self {
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
            bold: Style::new().bold(),
        }
    }
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    fn stage_style(&self, stage: Stage) -> &Style {
        match stage {
            Stage::Completed => &self.green,
            Stage::Rejected => &self.red,
            _ => &self.yellow,
        }
    }

    pub fn heading(&self, title: &str) {
        println!();
        println!("{}", self.bold.apply_to(format!("─── {title} ───")));
    }

    pub fn print_bills(&self, bills: &[Bill]) {
        if bills.is_empty() {
            println!("  {}", self.dim.apply_to("(no bills)"));
            return;
        }
        for bill in bills {
            println!(
                "  {:<8} {:<10} {:>10}  due {}  {} {}",
                bill.id.to_string(),
                bill.branch,
                bill.amount.to_string(),
                bill.due_date,
                self.stage_style(bill.stage()).apply_to(format!("{:<9}", bill.stage().to_string())),
                self.dim.apply_to(format!("{} | {}", bill.status(), bill.biller)),
            );
        }
    }

    pub fn print_bill(&self, bill: &Bill) {
        self.print_bills(std::slice::from_ref(bill));
    }

    pub fn print_audit(&self, entries: &[AuditEntry]) {
        if entries.is_empty() {
            println!("  {}", self.dim.apply_to("(no entries)"));
            return;
        }
        for entry in entries {
            let bill = entry
                .bill_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  #{:<4} {}  {:<8} {:<9} {}",
                entry.seq,
                self.dim.apply_to(entry.timestamp.format(TIMESTAMP_FORMAT)),
                bill,
                entry.actor.to_string(),
                entry.action,
            );
        }
    }

    pub fn print_totals(&self, totals: &BTreeMap<String, Decimal>) {
        if totals.is_empty() {
            println!("  {}", self.dim.apply_to("(no bills)"));
            return;
        }
        for (branch, total) in totals {
            println!("  {branch:<12} {:>12}", total.to_string());
        }
    }

    pub fn print_billers(&self, names: &[String]) {
        for name in names {
            println!("  • {name}");
        }
    }

    pub fn print_outcome(&self, outcome: &Outcome) {
        let label = match &outcome.op {
            Operation::Create(draft) => format!("create {} / {}", draft.branch, draft.biller),
            Operation::Transition { bill, event, role } => format!("{event} {bill} as {role}"),
        };
        match &outcome.result {
            Ok(bill) => println!(
                "  {} {label} → {} at {}",
                self.green.apply_to("✓"),
                bill.id,
                self.stage_style(bill.stage()).apply_to(bill.stage()),
            ),
            Err(err) => self.print_error(&label, err),
        }
    }

    pub fn print_error(&self, context: &str, err: &WorkflowError) {
        let marker = match err.kind() {
            ErrorKind::Validation => self.yellow.apply_to("✗ invalid input"),
            ErrorKind::NotFound => self.yellow.apply_to("✗ not found"),
            ErrorKind::InvalidTransition => self.red.apply_to("✗ not allowed now"),
            ErrorKind::Unauthorized => self.red.apply_to("✗ unauthorized"),
            ErrorKind::AlreadyTerminal => self.dim.apply_to("✗ already closed"),
        };
        println!("  {marker} {context}: {err}");
    }

    pub fn warn(&self, message: &str) {
        eprintln!("  {} {message}", self.yellow.apply_to("!"));
    }
}
