//! Command implementations behind the `fhirfly` binary.
//!
//! Every command writes pretty-printed JSON to the given writer.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

mod lookup;
mod search;

pub use lookup::{CodeSystem, lookup};
pub use search::{search_fda_labels, search_icd10};

/// Writes `value` as pretty JSON followed by a newline.
pub fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize response")?;
    writeln!(out).context("Failed to write output")?;
    Ok(())
}
