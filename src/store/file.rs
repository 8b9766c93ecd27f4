//! The record file: a header line followed by one comma-delimited row per
//! contact. Every read goes back to disk; there is no in-memory cache, so the
//! file stays the single source of truth even if it is edited by hand between
//! refreshes.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Terminator, Writer, WriterBuilder};
use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::models::{Contact, HEADER};

/// Handle on the delimited text file that stores the address book.
#[derive(Debug, Clone)]
pub struct ContactStore {
    path: PathBuf,
}

impl ContactStore {
    /// Wrap `path` without touching the file system. The file is created
    /// lazily by [`ContactStore::ensure_initialized`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the record file with its header row if it does not exist yet.
    /// Existing files are left untouched.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("failed to create data directory")?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .with_context(|| format!("failed to create {}", self.path.display()))?;
        let mut writer = record_writer(file);
        writer
            .write_record(HEADER)
            .context("failed to write header row")?;
        writer.flush().context("failed to flush record file")?;

        debug!(
            "event=record_file_init module=store path={}",
            self.path.display()
        );
        Ok(())
    }

    /// Read every contact in file order, skipping the header line.
    pub fn load_all(&self) -> Result<Vec<Contact>> {
        self.ensure_initialized()?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        let mut contacts = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.context("failed to read contact row")?;
            if record.len() > HEADER.len() {
                warn!("{}", extra_columns_warning(index + 1, record.len()));
            }
            contacts.push(contact_from_record(&record));
        }

        Ok(contacts)
    }

    /// Add one row to the end of the file. Duplicate detection is the
    /// caller's job.
    pub fn append(&self, contact: &Contact) -> Result<()> {
        self.ensure_initialized()?;

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {} for append", self.path.display()))?;
        let mut writer = record_writer(file);
        writer
            .write_record(contact.as_record())
            .context("failed to append contact")?;
        writer.flush().context("failed to flush record file")?;
        Ok(())
    }

    /// Rewrite the whole file as the header followed by `contacts` in order.
    ///
    /// The new content goes to a temporary file next to the real record file,
    /// which is then renamed over it, so an interrupted write leaves the
    /// previous version intact. A symlinked record file is resolved first so
    /// the link survives, and the existing permissions are carried over.
    pub fn replace_all(&self, contacts: &[Contact]) -> Result<()> {
        let target = self.resolve_target()?;
        let existing_permissions = match fs::metadata(&target) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => None,
        };

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).context("failed to create data directory")?;

        let tmp = NamedTempFile::new_in(dir).context("failed to create temporary record file")?;
        let mut writer = record_writer(tmp);
        writer
            .write_record(HEADER)
            .context("failed to write header row")?;
        for contact in contacts {
            writer
                .write_record(contact.as_record())
                .context("failed to write contact row")?;
        }

        let mut tmp = writer
            .into_inner()
            .map_err(|err| err.into_error())
            .context("failed to flush temporary record file")?;
        tmp.flush().context("failed to flush temporary record file")?;
        tmp.as_file()
            .sync_all()
            .context("failed to sync temporary record file")?;
        if let Some(permissions) = existing_permissions {
            tmp.as_file()
                .set_permissions(permissions)
                .context("failed to copy record file permissions")?;
        }
        tmp.persist(&target)
            .with_context(|| format!("failed to replace {}", target.display()))?;

        debug!(
            "event=record_file_rewrite module=store rows={}",
            contacts.len()
        );
        Ok(())
    }

    /// The file a rewrite should land on: the symlink target when the record
    /// path is a link, the record path otherwise.
    fn resolve_target(&self) -> Result<PathBuf> {
        match fs::symlink_metadata(&self.path) {
            Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(&self.path)
                .with_context(|| format!("failed to resolve {}", self.path.display())),
            _ => Ok(self.path.clone()),
        }
    }
}

/// Rows are CRLF-terminated with minimal quoting; headers are written by
/// hand so an empty book still gets one.
fn record_writer<W: Write>(inner: W) -> Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(inner)
}

fn extra_columns_warning(row: usize, columns: usize) -> String {
    format!(
        "event=record_extra_columns module=store row={row} columns={columns} \
         note=columns_after_email_dropped_on_next_save"
    )
}

/// Missing trailing columns become empty strings; extra columns are dropped.
fn contact_from_record(record: &StringRecord) -> Contact {
    let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();
    Contact {
        name: field(0),
        phone: field(1),
        email: field(2),
    }
}
