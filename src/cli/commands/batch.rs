use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::KeyArgs;
use crate::cli::commands::key_helpers;
use crate::cli::output;
use crate::core::errors::{Result, ToolkitError};
use crate::core::models::batch_item::{BatchFile, BatchItem};
use crate::core::models::decryption_record::DecryptionRecord;
use crate::core::services::batch_runner::BatchRunner;

/// Execute the `csirt-pgp batch` command.
///
/// Every file is decrypted concurrently with the one unlocked key. Each
/// success is written to `<out_dir>/<stem>_decrypted.txt` as soon as it
/// settles; failures (a missing or unreadable file included) are reported
/// per file and never stop the others.
pub fn execute(
    files: &[String],
    out_dir: Option<&str>,
    max_size: Option<u64>,
    key: &KeyArgs,
    quiet: bool,
) -> Result<()> {
    let config = key_helpers::load_config()?;
    let mut policy = config.upload.policy();
    if let Some(max) = max_size {
        if max == 0 {
            return Err(ToolkitError::InvalidConfig {
                detail: "--max-size must be greater than 0".into(),
            });
        }
        policy.max_file_size = max;
    }

    let batch: Vec<BatchFile> = files.iter().map(BatchFile::from_path).collect();

    let out_dir = PathBuf::from(out_dir.unwrap_or("."));
    std::fs::create_dir_all(&out_dir)?;

    let decryptor = Arc::new(key_helpers::unlock_decryptor(key, &config)?);
    let runner = BatchRunner::new(decryptor, policy);

    if !quiet {
        output::header(&format!("Decrypting {} file(s)", batch.len()));
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let bar = output::progress_bar(batch.len() as u64, quiet);
    let mut write_errors: Vec<(usize, ToolkitError)> = Vec::new();

    let items = rt.block_on(runner.decrypt_batch(batch, |index, item| {
        bar.inc(1);
        bar.set_message(item.source_file.clone());
        if let Err(e) = write_output(&out_dir, item) {
            write_errors.push((index, e));
        }
    }));
    bar.finish_and_clear();

    let recorder = key_helpers::history_recorder(&config);
    let mut failed = 0;

    for (index, item) in items.iter().enumerate() {
        let write_error = write_errors.iter().find(|(i, _)| *i == index).map(|(_, e)| e);
        match (&item.result, &item.error, write_error) {
            (Some(plaintext), _, None) => {
                if let Some(input) = &item.input {
                    recorder.record(&DecryptionRecord::file(
                        input.as_str(),
                        plaintext.as_str(),
                        item.source_file.as_str(),
                    ));
                }
                if !quiet {
                    output::success(&format!(
                        "{} → {}",
                        item.source_file,
                        out_dir.join(item.output_filename()).display()
                    ));
                }
            }
            (Some(_), _, Some(e)) => {
                failed += 1;
                output::error(&format!("{}: cannot write output: {e}", item.source_file));
            }
            (None, Some(e), _) => {
                failed += 1;
                output::error(&format!("{}: {e}", item.source_file));
            }
            (None, None, _) => {
                failed += 1;
                output::error(&format!("{}: did not complete", item.source_file));
            }
        }
    }

    tracing::debug!(
        succeeded = items.iter().filter(|i| i.is_success()).count(),
        total = items.len(),
        "batch finished"
    );

    if failed > 0 {
        return Err(ToolkitError::BatchFailed {
            failed,
            total: items.len(),
        });
    }
    if !quiet {
        output::success(&format!("All {} file(s) decrypted", items.len()));
    }
    Ok(())
}

fn write_output(out_dir: &Path, item: &BatchItem) -> Result<()> {
    if let Some(plaintext) = &item.result {
        std::fs::write(out_dir.join(item.output_filename()), plaintext)?;
    }
    Ok(())
}
