//! Markup scanning infrastructure

mod xml_scanner;

pub use xml_scanner::{FileMarkup, MarkupScan, MarkupScanner};
