//! xlsx2xml - Pure-Rust Excel to XML converter with user-defined header blocks
//!
//! This crate converts tabular spreadsheet data into a well-formed XML
//! document combining a user-defined `<HEADER>` block with a `<DATA>` block
//! derived row-by-row from the spreadsheet's first sheet.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xlsx2xml::SessionBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a conversion session with default settings
//!     let mut session = SessionBuilder::new().build()?;
//!
//!     // Declare header fields (emitted in insertion order)
//!     session.add_header_field("CALLREPORT_ID", "DTR001")?;
//!     session.add_header_field("INST_NAME", "STERLING BANK")?;
//!
//!     // Supply the uploaded spreadsheet bytes
//!     session.supply_file(std::fs::read("report.xlsx")?);
//!
//!     // Convert; the XML is returned and retained in the session
//!     let xml = session.start_conversion()?;
//!     println!("{}", xml);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Progress Reporting
//!
//! ```rust,no_run
//! use xlsx2xml::SessionBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = SessionBuilder::new().build()?;
//! session.set_progress_observer(Box::new(|pct| {
//!     eprintln!("converting... {}%", pct);
//! }));
//! # Ok(())
//! # }
//! ```
//!
//! Progress percentages are integers in `[0, 100]`, non-decreasing within
//! one conversion attempt, and reach 100 exactly once when conversion
//! logic finishes.
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use xlsx2xml::{HeaderPolicy, SessionBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionBuilder::new()
//!     .with_header_policy(HeaderPolicy::Required)  // at least one header field
//!     .with_max_input_file_size(64 * 1024 * 1024)  // 64MB upload ceiling
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Recovering From Errors
//!
//! Validation errors (bad tag names, duplicates, missing file) are
//! structured rejections: correct the input and retry. A failed conversion
//! leaves the session in the `Error` state; call
//! [`ConversionSession::reset`] to start over.

mod api;
mod builder;
mod composer;
mod error;
mod extractor;
mod header;
mod progress;
mod session;
mod tag;
mod types;

// 公開API
pub use api::{ConversionState, HeaderPolicy};
pub use builder::SessionBuilder;
pub use error::XlsxToXmlError;
pub use header::{FieldId, HeaderField};
pub use progress::ProgressObserver;
pub use session::ConversionSession;
pub use tag::{escape_xml_text, sanitize_tag_name, validate_tag_name};
