use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::state::Stage;
use crate::error::ValidationError;

/// Identity of a bill, rendered as `TXN<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BillId(u64);

impl BillId {
    pub const PREFIX: &'static str = "TXN";

    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn number(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for BillId {
    type Err = crate::error::BillflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .get(..Self::PREFIX.len())
            .filter(|p| p.eq_ignore_ascii_case(Self::PREFIX))
            .map(|_| &trimmed[Self::PREFIX.len()..])
            .ok_or_else(|| crate::error::BillflowError::UnknownBillId(s.to_string()))?;
        // Digits only, no sign or leading zero, so every id has one spelling.
        let canonical = digits.bytes().all(|b| b.is_ascii_digit())
            && (digits == "0" || !digits.starts_with('0'));
        digits
            .parse::<u64>()
            .ok()
            .filter(|_| canonical)
            .map(BillId)
            .ok_or_else(|| crate::error::BillflowError::UnknownBillId(s.to_string()))
    }
}

impl From<BillId> for String {
    fn from(id: BillId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for BillId {
    type Error = crate::error::BillflowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Payment status, kept in lockstep with [`Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Pending,
    Paid,
    Rejected,
}

impl Status {
    /// The only status a bill may carry at `stage`.
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Maker | Stage::Checker | Stage::Approver => Status::Pending,
            Stage::Completed => Status::Paid,
            Stage::Rejected => Status::Rejected,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => write!(f, "Pending"),
            Status::Paid => write!(f, "Paid"),
            Status::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Unvalidated creation input, as a form or batch file would supply it.
/// Largest amount a single bill may carry (one trillion). Keeps per-branch
/// sums far away from `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillDraft {
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub biller: String,
    #[serde(default)]
    pub consumer_number: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub due_date: String,
}

impl BillDraft {
    pub fn new(
        branch: impl Into<String>,
        biller: impl Into<String>,
        consumer_number: impl Into<String>,
        amount: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            branch: branch.into(),
            biller: biller.into(),
            consumer_number: consumer_number.into(),
            amount: amount.into(),
            due_date: due_date.into(),
        }
    }

    /// Checks every field and returns the typed values.
    pub fn validate(&self) -> Result<ValidFields, ValidationError> {
        let branch = required("branch", &self.branch)?;
        let biller = required("biller", &self.biller)?;
        let consumer_number = required("consumer_number", &self.consumer_number)?;
        let raw_amount = required("amount", &self.amount)?;
        let raw_due = required("due_date", &self.due_date)?;

        let amount = raw_amount
            .parse::<Decimal>()
            .map_err(|_| ValidationError::InvalidAmount(raw_amount.clone()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::NegativeAmount(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge(amount));
        }
        let due_date = NaiveDate::parse_from_str(&raw_due, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDueDate(raw_due.clone()))?;

        Ok(ValidFields {
            branch,
            biller,
            consumer_number,
            amount,
            due_date,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Output of [`BillDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFields {
    pub branch: String,
    pub biller: String,
    pub consumer_number: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

/// One payment obligation moving through approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub biller: String,
    pub consumer_number: String,
    pub branch: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    stage: Stage,
    status: Status,
}

impl Bill {
    /// A freshly created bill: `Maker` stage, `Pending` status.
    pub fn new(id: BillId, fields: ValidFields, created_at: DateTime<Utc>) -> Self {
        Self::at_stage(id, fields, created_at, Stage::Maker)
    }

    /// A bill already sitting at `stage`, status derived from it.
    pub(crate) fn at_stage(
        id: BillId,
        fields: ValidFields,
        created_at: DateTime<Utc>,
        stage: Stage,
    ) -> Self {
        Self {
            id,
            biller: fields.biller,
            consumer_number: fields.consumer_number,
            branch: fields.branch,
            amount: fields.amount,
            due_date: fields.due_date,
            created_at,
            stage,
            status: Status::for_stage(stage),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Moves the bill and realigns its status. Only the engine calls this.
    pub(crate) fn move_to(&mut self, stage: Stage) {
        self.stage = stage;
        self.status = Status::for_stage(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn draft() -> BillDraft {
        BillDraft::new("Bangalore", "BESCOM", "CN12345", "2500", "2025-11-05")
    }

    #[test]
    fn valid_draft_parses_typed_fields() {
        let fields = draft().validate().unwrap();
        assert_eq!(fields.branch, "Bangalore");
        assert_eq!(fields.amount, dec("2500"));
        assert_eq!(fields.due_date, NaiveDate::from_ymd_opt(2025, 11, 5).unwrap());
    }

    #[test]
    fn fields_are_trimmed() {
        let mut d = draft();
        d.branch = "  Mumbai ".into();
        d.amount = " 10.50 ".into();
        let fields = d.validate().unwrap();
        assert_eq!(fields.branch, "Mumbai");
        assert_eq!(fields.amount, dec("10.50"));
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        let mut d = draft();
        d.consumer_number = "   ".into();
        assert_eq!(
            d.validate(),
            Err(ValidationError::MissingField("consumer_number"))
        );
        assert_eq!(
            BillDraft::default().validate(),
            Err(ValidationError::MissingField("branch"))
        );
    }

    #[test]
    fn malformed_amount_and_date_are_rejected() {
        let mut d = draft();
        d.amount = "twelve".into();
        assert_eq!(
            d.validate(),
            Err(ValidationError::InvalidAmount("twelve".into()))
        );

        let mut d = draft();
        d.amount = "-1".into();
        assert_eq!(d.validate(), Err(ValidationError::NegativeAmount(dec("-1"))));

        let mut d = draft();
        d.amount = "79228162514264337593543950335".into();
        assert_eq!(
            d.validate(),
            Err(ValidationError::AmountTooLarge(dec("79228162514264337593543950335")))
        );

        let mut d = draft();
        d.due_date = "2025-02-30".into();
        assert_eq!(
            d.validate(),
            Err(ValidationError::InvalidDueDate("2025-02-30".into()))
        );
    }

    #[test]
    fn amount_bound_is_inclusive() {
        assert_eq!(MAX_AMOUNT, dec("1000000000000"));
        let mut d = draft();
        d.amount = "1000000000000".into();
        assert_eq!(d.validate().unwrap().amount, MAX_AMOUNT);
        d.amount = "1000000000000.01".into();
        assert!(matches!(d.validate(), Err(ValidationError::AmountTooLarge(_))));
    }

    #[test]
    fn zero_amount_is_allowed() {
        let mut d = draft();
        d.amount = "0".into();
        assert_eq!(d.validate().unwrap().amount, Decimal::ZERO);
    }

    #[test]
    fn bill_id_display_and_parse() {
        let id = BillId::new(1001);
        assert_eq!(id.to_string(), "TXN1001");
        assert_eq!("txn1001".parse::<BillId>().unwrap(), id);
        assert!("1001".parse::<BillId>().is_err());
        assert!("TXN".parse::<BillId>().is_err());
        assert!("TXNabc".parse::<BillId>().is_err());
        assert!("TXN+1001".parse::<BillId>().is_err());
        assert!("TXN01001".parse::<BillId>().is_err());
        assert!("TXN-1".parse::<BillId>().is_err());
    }

    #[test]
    fn status_follows_stage() {
        let mut bill = Bill::new(BillId::new(1), draft().validate().unwrap(), Utc::now());
        assert_eq!(bill.stage(), Stage::Maker);
        assert_eq!(bill.status(), Status::Pending);
        bill.move_to(Stage::Completed);
        assert_eq!(bill.status(), Status::Paid);
        bill.move_to(Stage::Rejected);
        assert_eq!(bill.status(), Status::Rejected);
        assert!(bill.is_terminal());
    }

    #[test]
    fn bill_serialization_roundtrip() {
        let bill = Bill::new(BillId::new(7), draft().validate().unwrap(), Utc::now());
        let json = serde_json::to_string(&bill).unwrap();
        assert!(json.contains("\"id\":\"TXN7\""));
        let back: Bill = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bill);
    }
}
