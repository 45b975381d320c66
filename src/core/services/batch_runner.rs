use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::task::JoinSet;

use crate::core::errors::{Result, ToolkitError};
use crate::core::models::batch_item::{BatchFile, BatchItem, DecryptedFile, UploadPolicy};
use crate::core::services::decryptor::Decryptor;
use crate::core::traits::pgp_backend::PgpBackend;

/// Decrypts many files concurrently, one isolated pipeline per file.
///
/// A failure in one file only ever marks that file's item as failed.
/// Items come back in input order regardless of completion order.
pub struct BatchRunner<B: PgpBackend + 'static> {
    decryptor: Arc<Decryptor<B>>,
    policy: UploadPolicy,
}

impl<B: PgpBackend + 'static> BatchRunner<B> {
    pub fn new(decryptor: Arc<Decryptor<B>>, policy: UploadPolicy) -> Self {
        Self { decryptor, policy }
    }

    /// Run every file through check → open → read → parse → decrypt.
    ///
    /// `on_item` is called with `(index, item)` as soon as each item
    /// settles, so callers can report progress before the batch ends.
    pub async fn decrypt_batch<F>(&self, files: Vec<BatchFile>, mut on_item: F) -> Vec<BatchItem>
    where
        F: FnMut(usize, &BatchItem),
    {
        let mut items: Vec<BatchItem> = files
            .iter()
            .map(|f| BatchItem::pending(f.name.clone()))
            .collect();

        let mut tasks = JoinSet::new();
        for (index, file) in files.into_iter().enumerate() {
            if index >= self.policy.max_files {
                let err = ToolkitError::TooManyFiles {
                    name: file.name.clone(),
                    max: self.policy.max_files,
                };
                settle(&mut items, index, Err(err), &mut on_item);
                continue;
            }

            let decryptor = Arc::clone(&self.decryptor);
            let policy = self.policy;
            tasks.spawn(async move { (index, process_file(decryptor, policy, file).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => settle(&mut items, index, outcome, &mut on_item),
                // The item stays pending; nothing else is affected.
                Err(e) => tracing::error!(error = %e, "batch task aborted"),
            }
        }

        items
    }
}

fn settle<F>(
    items: &mut [BatchItem],
    index: usize,
    outcome: Result<DecryptedFile>,
    on_item: &mut F,
) where
    F: FnMut(usize, &BatchItem),
{
    match &outcome {
        Err(e) if e.is_file_validation() || e.is_malformed_input() => {
            tracing::info!(file = %items[index].source_file, error = %e, "file rejected");
        }
        Err(e) => {
            tracing::warn!(file = %items[index].source_file, error = %e, "file failed to decrypt");
        }
        Ok(_) => {}
    }
    let pending = std::mem::replace(&mut items[index], BatchItem::pending(String::new()));
    items[index] = pending.settle(outcome);
    on_item(index, &items[index]);
}

/// The per-file pipeline. Rejections happen before any read.
async fn process_file<B: PgpBackend + 'static>(
    decryptor: Arc<Decryptor<B>>,
    policy: UploadPolicy,
    file: BatchFile,
) -> Result<DecryptedFile> {
    policy.check_type(&file.name)?;

    let handle = tokio::fs::File::open(&file.path)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ToolkitError::FileNotFound {
                path: file.path.clone(),
            },
            _ => ToolkitError::Io(e),
        })?;
    let size = handle.metadata().await?.len();
    policy.check(&file.name, size)?;

    let content = read_text(handle, &file.name, &policy).await?;

    let (input, plaintext) = tokio::task::spawn_blocking(move || {
        let plaintext = decryptor.decrypt_text(&content);
        (content, plaintext)
    })
    .await
    .map_err(|e| ToolkitError::DecryptionFailed {
        reason: format!("decrypt task did not complete: {e}"),
    })?;

    Ok(DecryptedFile {
        input,
        plaintext: plaintext?,
    })
}

/// Read the whole file as text, never buffering more than the ceiling.
async fn read_text<R>(reader: R, name: &str, policy: &UploadPolicy) -> Result<String>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader
        .take(policy.max_file_size.saturating_add(1))
        .read_to_end(&mut buf)
        .await?;
    if buf.len() as u64 > policy.max_file_size {
        return Err(policy.too_large(name));
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
