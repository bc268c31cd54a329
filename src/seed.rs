//! Sample bills loaded at startup so queues are not empty on first run.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::audit::AuditEvent;
use crate::error::BillflowError;
use crate::workflow::{Bill, Stage, ValidFields, WorkflowEngine};

pub const SEED_MESSAGE: &str = "System initialized with sample data";

struct SampleBill {
    biller: &'static str,
    consumer_number: &'static str,
    branch: &'static str,
    amount: i64,
    due: (i32, u32, u32),
    stage: Stage,
    created_at: &'static str,
}

const SAMPLES: [SampleBill; 3] = [
    SampleBill {
        biller: "Bangalore Electricity Supply Company Ltd (BESCOM) - Karnataka (LT)",
        consumer_number: "CN12345",
        branch: "Bangalore",
        amount: 2500,
        due: (2025, 11, 5),
        stage: Stage::Maker,
        created_at: "2025-10-25 10:15:00",
    },
    SampleBill {
        biller: "Maharashtra State Electricity Distribution Company Ltd (MSEDCL) - Maharashtra (HT)",
        consumer_number: "CN98541",
        branch: "Mumbai",
        amount: 8700,
        due: (2025, 11, 10),
        stage: Stage::Checker,
        created_at: "2025-10-24 14:22:00",
    },
    SampleBill {
        biller: "BSES Rajdhani Power Ltd (BRPL) - Delhi (LT)",
        consumer_number: "CN45678",
        branch: "Delhi",
        amount: 4600,
        due: (2025, 11, 3),
        stage: Stage::Approver,
        created_at: "2025-10-23 12:05:00",
    },
];

impl SampleBill {
    fn parts(&self) -> Result<(ValidFields, DateTime<Utc>), BillflowError> {
        let (y, m, d) = self.due;
        let due_date = NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| {
            BillflowError::Config(format!("sample due date {y}-{m}-{d} is not a calendar date"))
        })?;
        let created_at =
            NaiveDateTime::parse_from_str(self.created_at, crate::export::TIMESTAMP_FORMAT)
                .map_err(|e| {
                    BillflowError::Config(format!("sample timestamp {:?}: {e}", self.created_at))
                })?
                .and_utc();
        let fields = ValidFields {
            branch: self.branch.to_string(),
            biller: self.biller.to_string(),
            consumer_number: self.consumer_number.to_string(),
            amount: Decimal::from(self.amount),
            due_date,
        };
        Ok((fields, created_at))
    }
}

/// Loads one bill at each active stage plus a single system audit entry.
///
/// Intended for a fresh engine; the bills take the first ids, `TXN1001`
/// through `TXN1003`. Either every sample is loaded or none is.
pub fn load_sample_data(engine: &WorkflowEngine) -> Result<Vec<Bill>, BillflowError> {
    let parts = SAMPLES
        .iter()
        .map(SampleBill::parts)
        .collect::<Result<Vec<_>, _>>()?;
    let bills = SAMPLES
        .iter()
        .zip(parts)
        .map(|(sample, (fields, created_at))| {
            engine.registry().insert(fields, created_at, sample.stage)
        })
        .collect();
    engine.audit().append(AuditEvent::system(SEED_MESSAGE));
    tracing::info!("sample data loaded");
    Ok(bills)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{Actor, AuditFilter};
    use crate::workflow::{BillId, Event, Role, Status};

    #[test]
    fn seeds_one_bill_per_active_stage() {
        let engine = WorkflowEngine::new();
        let bills = load_sample_data(&engine).unwrap();
        assert_eq!(bills.len(), 3);

        let ids: Vec<String> = bills.iter().map(|b| b.id.to_string()).collect();
        assert_eq!(ids, ["TXN1001", "TXN1002", "TXN1003"]);
        let stages: Vec<Stage> = bills.iter().map(|b| b.stage()).collect();
        assert_eq!(stages, [Stage::Maker, Stage::Checker, Stage::Approver]);
        assert!(bills.iter().all(|b| b.status() == Status::Pending));
        assert_eq!(
            bills[1].created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2025-10-24 14:22:00"
        );
    }

    #[test]
    fn every_sample_converts() {
        for sample in &SAMPLES {
            let (fields, _) = sample.parts().unwrap();
            assert_eq!(fields.branch, sample.branch);
        }
    }

    #[test]
    fn bad_sample_is_an_error_not_a_gap() {
        let sample = SampleBill {
            due: (2025, 2, 30),
            ..SAMPLES[0]
        };
        assert!(matches!(sample.parts(), Err(BillflowError::Config(_))));
        let sample = SampleBill {
            created_at: "yesterday",
            ..SAMPLES[0]
        };
        assert!(matches!(sample.parts(), Err(BillflowError::Config(_))));
    }

    #[test]
    fn seeding_writes_one_system_entry() {
        let engine = WorkflowEngine::new();
        load_sample_data(&engine).unwrap();
        let entries = engine.audit().list(&AuditFilter::all());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor, Actor::System);
        assert_eq!(entries[0].action, SEED_MESSAGE);
        assert!(entries[0].bill_id.is_none());
    }

    #[test]
    fn seeded_bills_continue_through_the_workflow() {
        let engine = WorkflowEngine::new();
        load_sample_data(&engine).unwrap();
        let bill = engine
            .transition(BillId::new(1003), Event::Approve, Role::Approver)
            .unwrap();
        assert_eq!(bill.status(), Status::Paid);

        let next = engine
            .create_bill("Pune", "MSEDCL", "CN1", "10", "2025-12-01")
            .unwrap();
        assert_eq!(next.to_string(), "TXN1004");
    }

    #[test]
    fn seeded_totals_match_demo() {
        let engine = WorkflowEngine::new();
        load_sample_data(&engine).unwrap();
        let totals = engine.query().branch_totals();
        assert_eq!(totals["Bangalore"], Decimal::from(2500));
        assert_eq!(totals["Mumbai"], Decimal::from(8700));
        assert_eq!(totals["Delhi"], Decimal::from(4600));
    }
}
