//! CSV projection of bills for reports and downloads.

use csv::Writer;

use crate::error::BillflowError;
use crate::workflow::Bill;

pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "Branch",
    "Biller",
    "ConsumerNumber",
    "Amount",
    "DueDate",
    "Status",
    "Stage",
    "CreatedAt",
];

/// Timestamp layout used in reports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders `bills` as CSV with a fixed column order.
pub fn to_csv<'a, I>(bills: I) -> Result<Vec<u8>, BillflowError>
where
    I: IntoIterator<Item = &'a Bill>,
{
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for bill in bills {
        writer.write_record([
            bill.id.to_string(),
            bill.branch.clone(),
            bill.biller.clone(),
            bill.consumer_number.clone(),
            bill.amount.to_string(),
            bill.due_date.format("%Y-%m-%d").to_string(),
            bill.status().to_string(),
            bill.stage().to_string(),
            bill.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| BillflowError::Io(e.into_error()))
}
