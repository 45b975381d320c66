use colored::Colorize;

use crate::cli::commands::key_helpers;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::decryption_record::{DecryptionRecord, RecordKind};

const PREVIEW_CHARS: usize = 48;

/// Execute the `csirt-pgp history` command.
///
/// Lists past decryptions, oldest first, optionally only the last N.
pub fn execute(last: Option<usize>) -> Result<()> {
    let config = key_helpers::load_config()?;
    let records = key_helpers::history_recorder(&config).records()?;

    if records.is_empty() {
        output::header("csirt-pgp history");
        output::warning("No decryptions recorded yet");
        return Ok(());
    }

    let skip = last.map_or(0, |n| records.len().saturating_sub(n));
    let display = &records[skip..];

    output::header(&format!("csirt-pgp history ({} entries)", display.len()));
    println!();
    for (offset, record) in display.iter().enumerate() {
        print_record(skip + offset + 1, record);
    }
    Ok(())
}

fn print_record(number: usize, record: &DecryptionRecord) {
    let kind = match record.kind {
        RecordKind::Text => "text".cyan(),
        RecordKind::File => "file".magenta(),
    };
    let source = record.filename.as_deref().unwrap_or("—");

    println!("  {:>4} {:<4} {}", number.to_string().dimmed(), kind, source);
    output::detail(&format!("in:  {}", output::preview(&record.input, PREVIEW_CHARS)));
    output::detail(&format!("out: {}", output::preview(&record.output, PREVIEW_CHARS)));
}
