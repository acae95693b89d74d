//! Plain-text ledger report in Filipino, as printed for the store.
//!
//! Shared by the HTTP export endpoint and the `export-ledger` binary.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};

use crate::domain::{EntrySummary, LedgerSnapshot, LedgerTotals};

const WIDTH: usize = 80;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Attachment name for a report generated at `generated_at`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use utang::inbound::report::report_filename;
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 10, 9, 5, 7).unwrap();
/// assert_eq!(report_filename(at), "Listahan_ng_Utang_20250110_090507.txt");
/// ```
pub fn report_filename(generated_at: DateTime<Utc>) -> String {
    format!(
        "Listahan_ng_Utang_{}.txt",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

/// Render `snapshot` as the printable report headed with `store_name`.
pub fn render_report(snapshot: &LedgerSnapshot, store_name: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, snapshot, store_name)?;
    Ok(out)
}

fn rule(out: &mut String, ch: char, width: usize, indent: &str) -> fmt::Result {
    writeln!(out, "{indent}{}", ch.to_string().repeat(width))
}

fn write_report(out: &mut String, snapshot: &LedgerSnapshot, store_name: &str) -> fmt::Result {
    rule(out, '=', WIDTH, "")?;
    writeln!(out, "LISTAHAN NG UTANG - {}", store_name.to_uppercase())?;
    rule(out, '=', WIDTH, "")?;
    writeln!(
        out,
        "Petsa ng Pag-export: {}",
        snapshot.generated_at.format("%B %d, %Y - %I:%M %p")
    )?;
    rule(out, '=', WIDTH, "")?;
    writeln!(out)?;

    for summary in &snapshot.entries {
        write_entry(out, summary)?;
    }

    write_summary(out, &snapshot.totals)
}

fn write_entry(out: &mut String, summary: &EntrySummary) -> fmt::Result {
    let entry = &summary.entry;
    rule(out, '-', WIDTH, "")?;
    writeln!(out, "KOSTUMER: {}", entry.customer_name)?;
    writeln!(out, "ID ng Utang: {}", entry.id)?;
    if let Some(phone) = &entry.phone_number {
        writeln!(out, "Telepono: {phone}")?;
    }
    writeln!(
        out,
        "Katayuan: {}",
        entry.state.status().as_str().to_uppercase()
    )?;
    writeln!(
        out,
        "Tinantyang Petsa ng Bayad: {}",
        entry.estimated_payment_date
    )?;
    writeln!(
        out,
        "Petsa ng Paglikha: {}",
        entry.created_at.format(TIMESTAMP_FORMAT)
    )?;
    writeln!(out)?;

    if summary.items.is_empty() {
        writeln!(out, "  Walang mga produkto")?;
        writeln!(out)?;
    } else {
        writeln!(out, "  MGA PRODUKTO:")?;
        rule(out, '-', WIDTH - 4, "  ")?;
        for (position, item) in summary.items.iter().enumerate() {
            writeln!(out, "  {}. {}", position + 1, item.product)?;
            writeln!(out, "     Halaga: ₱{}", item.cost)?;
            if item.quantity.get() > 1 {
                writeln!(out, "     Dami: {} x ₱{}", item.quantity.get(), item.unit_price)?;
            }
            writeln!(
                out,
                "     Petsa ng Pagdagdag: {}",
                item.added_at.format(TIMESTAMP_FORMAT)
            )?;
            writeln!(out)?;
        }
    }

    writeln!(out, "  KABUUANG UTANG: ₱{}", summary.total_cost)?;
    rule(out, '-', WIDTH, "")?;
    writeln!(out)
}

fn write_summary(out: &mut String, totals: &LedgerTotals) -> fmt::Result {
    rule(out, '=', WIDTH, "")?;
    writeln!(out, "BUOD")?;
    rule(out, '=', WIDTH, "")?;
    writeln!(out, "Kabuuang Bilang ng Utang: {}", totals.entry_count)?;
    writeln!(out, "Kabuuang Hindi Pa Bayad: ₱{}", totals.pending)?;
    writeln!(out, "Kabuuang Nabayaran: ₱{}", totals.paid)?;
    writeln!(out, "KABUUANG LAHAT: ₱{}", totals.all)?;
    rule(out, '=', WIDTH, "")
}
