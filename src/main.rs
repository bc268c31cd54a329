mod cli;
mod ui;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use billflow::batch::{Batch, Operation};
use billflow::billers::BillerCatalog;
use billflow::config::BillflowConfig;
use billflow::workflow::{BillDraft, BillId, Event, Role, WorkflowEngine};
use billflow::{export, seed, telemetry};
use cli::{Cli, Command};
use ui::Terminal;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BillflowConfig::load_from(path, true)?,
        None => BillflowConfig::load()?,
    };
    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    telemetry::init(level)?;

    let term = Terminal::new();
    let engine = WorkflowEngine::new();
    if config.seed_sample_data && !cli.no_seed {
        seed::load_sample_data(&engine)?;
    }
    let query = engine.query();

    match cli.command {
        Command::Demo => run_demo(&term)?,
        Command::Run { file, export: export_path } => {
            let batch = Batch::load(&file)
                .with_context(|| format!("failed to load batch file {}", file.display()))?;
            let catalog = config.biller_catalog()?;
            warn_unknown_billers(&term, &catalog, &batch);

            term.heading("Operations");
            for outcome in batch.apply(&engine) {
                term.print_outcome(&outcome);
            }
            term.heading("Bills");
            term.print_bills(&query.list_bills(None, None));
            term.heading("Audit Trail");
            term.print_audit(&query.list_audit(None));

            if let Some(path) = export_path {
                write_csv(&export::to_csv(&query.list_bills(None, None))?, Some(path.as_path()))?;
            }
        }
        Command::Queue { role, branch } => {
            let role = Role::from(role);
            term.heading(&format!("{role} queue"));
            term.print_bills(&query.queue_for(role, branch.as_deref()));
        }
        Command::Bills { stage, branch } => {
            term.heading("Bills");
            term.print_bills(&query.list_bills(stage.map(Into::into), branch.as_deref()));
        }
        Command::Totals => {
            term.heading("Branch Totals");
            term.print_totals(&query.branch_totals());
        }
        Command::Audit { bill } => {
            let bill = bill.map(|b| b.parse::<BillId>()).transpose()?;
            term.heading("Audit Trail");
            term.print_audit(&query.list_audit(bill));
        }
        Command::Export { out, stage, branch } => {
            let bills = query.list_bills(stage.map(Into::into), branch.as_deref());
            write_csv(&export::to_csv(&bills)?, out.as_deref())?;
        }
        Command::Billers => {
            term.heading("Billers");
            term.print_billers(config.biller_catalog()?.names());
        }
    }

    Ok(())
}

/// The end-to-end approval on a fresh engine, then a rejection.
fn run_demo(term: &Terminal) -> Result<()> {
    let engine = WorkflowEngine::new();
    let catalog = BillerCatalog::default();
    let biller = catalog.names().first().cloned().unwrap_or_default();

    term.heading("Approval");
    let draft = BillDraft::new("Bangalore", biller.as_str(), "CN12345", "2500", "2025-11-05");
    let bill = engine.create(&draft)?;
    term.print_bill(&bill);
    for (event, role) in [
        (Event::Submit, Role::Maker),
        (Event::Approve, Role::Checker),
        (Event::Approve, Role::Approver),
    ] {
        let bill = engine.transition(bill.id, event, role)?;
        term.print_bill(&bill);
    }

    term.heading("Rejection");
    let draft = BillDraft::new("Delhi", biller.as_str(), "CN45678", "4600", "2025-11-03");
    let rejected = engine.create(&draft)?;
    engine.transition(rejected.id, Event::Submit, Role::Maker)?;
    if let Err(err) = engine.transition(rejected.id, Event::Approve, Role::Maker) {
        term.print_error("approve as Maker", &err);
    }
    let closed = engine.transition(rejected.id, Event::Reject, Role::Checker)?;
    term.print_bill(&closed);
    if let Err(err) = engine.transition(rejected.id, Event::Approve, Role::Approver) {
        term.print_error("approve as Approver", &err);
    }

    term.heading("Audit Trail");
    term.print_audit(&engine.query().list_audit(None));
    term.heading("Branch Totals");
    term.print_totals(&engine.query().branch_totals());
    Ok(())
}

fn warn_unknown_billers(term: &Terminal, catalog: &BillerCatalog, batch: &Batch) {
    for op in &batch.ops {
        if let Operation::Create(draft) = op
            && !draft.biller.trim().is_empty()
            && !catalog.contains(&draft.biller)
        {
            term.warn(&format!("biller {:?} is not in the catalog", draft.biller));
        }
    }
}

fn write_csv(bytes: &[u8], out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout()
            .write_all(bytes)
            .context("failed to write CSV to stdout")?,
    }
    Ok(())
}
