//! Inbound adapters that translate external requests into ledger service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers live under [`http`]; [`report`] renders the printable ledger
//! for both the export endpoint and the command-line exporter.

pub mod http;
pub mod report;
