//! # mkipk TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! This module turns a directory into an in-memory gzipped tarball laid out the
//! way opkg expects: every member name is relative to the archived directory,
//! prefixed with `./`, and uses `/` separators. Ownership is never taken from the
//! filesystem; every entry is stamped with the identity in `ArchiveOptions`.
//!
//! ## Architecture
//!
//! Building happens in three passes:
//!
//! 1. **Walk** (`collect_nodes`): `walkdir` enumerates every node strictly below
//!    the root in pre-order, optionally sorted by file name.
//! 2. **Describe** (`ArchiveEntry::from_metadata`): each node is re-stated
//!    (following symlinks) and converted to an entry with forced ownership.
//! 3. **Emit**: a GNU header is written for each entry followed by the file body,
//!    streamed straight from disk. The finished tar stream is handed to
//!    `compression::gzip_unix`.
//!
//! The `tar` crate's path helpers strip a leading `./`, so member names are
//! written into the header name field directly, with a GNU long-name record
//! emitted first when a name does not fit in 100 bytes. Names are raw bytes:
//! on Unix a file name that is not UTF-8 is archived unchanged.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::tar::{self, ArchiveOptions};
//!
//! let options = ArchiveOptions::default(); // root:root, 0:0, sorted
//! match tar::create_package_tar(Path::new("pkg/control"), &options)? {
//!     Some(bytes) => println!("control.tar.gz is {} bytes", bytes.len()),
//!     None => println!("nothing to archive"),
//! }
//! ```
//!
use crate::common::archive::compression;
use crate::core::error::{MkipkError, Result};
use anyhow::Context;
use std::ffi::OsStr;
use std::fs::{self, File, Metadata};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tar::{Builder, EntryType, Header};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Size of the name field in a tar header.
const HEADER_NAME_LEN: usize = 100;

/// Pseudo member name used by GNU tar for long-name records.
const GNU_LONG_NAME_MARKER: &[u8] = b"././@LongLink";

/// Order in which sibling entries are written to an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    /// Siblings sorted by file name. Archives are reproducible across hosts.
    #[default]
    Sorted,
    /// Siblings in whatever order the filesystem enumerates them.
    Filesystem,
}

/// # Archive Options (`ArchiveOptions`)
///
/// Identity stamped on every entry, plus the sibling ordering policy.
/// Defaults to the privileged `root:root` (0:0) identity with sorted entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOptions {
    pub owner_name: String,
    pub group_name: String,
    pub owner_id: u64,
    pub group_id: u64,
    pub order: EntryOrder,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            owner_name: "root".to_string(),
            group_name: "root".to_string(),
            owner_id: 0,
            group_id: 0,
            order: EntryOrder::Sorted,
        }
    }
}

/// # Archive Entry (`ArchiveEntry`)
///
/// Description of one filesystem node as it will appear in the tar stream.
/// Ownership fields always come from `ArchiveOptions`, never from the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// `./`-prefixed, `/`-separated path relative to the archived directory.
    pub relative_path: Vec<u8>,
    pub is_directory: bool,
    /// Body length in bytes; always 0 for directories.
    pub size: u64,
    /// Permission bits (`0o7777` mask).
    pub mode: u32,
    pub owner_name: String,
    pub group_name: String,
    pub owner_id: u64,
    pub group_id: u64,
    /// Modification time in seconds since the Unix epoch.
    pub mod_time: u64,
}

impl ArchiveEntry {
    /// Builds an entry from stat output for `source`, forcing ownership to `options`.
    ///
    /// Fails with `MkipkError::UnsupportedEntry` when the node is neither a
    /// regular file nor a directory (sockets, FIFOs, devices, dangling links).
    pub fn from_metadata(
        relative_path: Vec<u8>,
        source: &Path,
        metadata: &Metadata,
        options: &ArchiveOptions,
    ) -> Result<Self> {
        let is_directory = metadata.is_dir();
        if !is_directory && !metadata.is_file() {
            anyhow::bail!(MkipkError::UnsupportedEntry {
                path: source.to_path_buf()
            });
        }

        Ok(Self {
            relative_path,
            is_directory,
            size: if is_directory { 0 } else { metadata.len() },
            mode: permission_bits(metadata),
            owner_name: options.owner_name.clone(),
            group_name: options.group_name.clone(),
            owner_id: options.owner_id,
            group_id: options.group_id,
            mod_time: modified_secs(metadata),
        })
    }

    /// Member name for log and error messages.
    pub fn display_name(&self) -> String {
        String::from_utf8_lossy(&self.relative_path).into_owned()
    }

    /// Renders everything except the name field into a GNU header.
    fn header(&self) -> Result<Header> {
        let mut header = Header::new_gnu();
        header.set_entry_type(if self.is_directory {
            EntryType::Directory
        } else {
            EntryType::Regular
        });
        header.set_size(self.size);
        header.set_mode(self.mode);
        header.set_mtime(self.mod_time);
        header.set_uid(self.owner_id);
        header.set_gid(self.group_id);
        header
            .set_username(&self.owner_name)
            .with_context(|| format!("Owner name '{}' does not fit in a tar header", self.owner_name))?;
        header
            .set_groupname(&self.group_name)
            .with_context(|| format!("Group name '{}' does not fit in a tar header", self.group_name))?;
        Ok(header)
    }
}

/// A node found while walking, before it is re-stated.
#[derive(Debug, Clone)]
struct WalkedNode {
    relative_path: Vec<u8>,
    source: PathBuf,
}

/// # Create Package Tarball (`create_package_tar`)
///
/// Archives every node strictly inside `dir` into a gzipped tar stream held in
/// memory. The directory itself is not an entry.
///
/// ## Returns
///
/// * `Ok(Some(bytes))` - The `.tar.gz` bytes.
/// * `Ok(None)` - `dir` contains nothing; no archive is produced.
///
/// ## Errors
///
/// Any walk, stat, or read failure aborts the whole build. No partial archive
/// is returned.
pub fn create_package_tar(dir: &Path, options: &ArchiveOptions) -> Result<Option<Vec<u8>>> {
    let root = fs::canonicalize(dir)
        .with_context(|| format!("Failed to resolve directory '{}'", dir.display()))?;

    let nodes = collect_nodes(&root, options.order)?;
    if nodes.is_empty() {
        info!("Directory '{}' is empty, no archive produced", root.display());
        return Ok(None);
    }

    let mut builder = Builder::new(Vec::new());
    for node in &nodes {
        let metadata = fs::metadata(&node.source)
            .with_context(|| format!("Failed to stat '{}'", node.source.display()))?;
        let entry =
            ArchiveEntry::from_metadata(node.relative_path.clone(), &node.source, &metadata, options)?;
        debug!(
            "Adding {} '{}' ({} bytes, mode {:o})",
            if entry.is_directory { "directory" } else { "file" },
            entry.display_name(),
            entry.size,
            entry.mode
        );

        if entry.is_directory {
            append_entry(&mut builder, &entry, io::empty())?;
        } else {
            let file = File::open(&node.source)
                .with_context(|| format!("Failed to open '{}'", node.source.display()))?;
            append_entry(&mut builder, &entry, SizedBody::new(file, entry.size))
                .with_context(|| format!("Failed to archive '{}'", node.source.display()))?;
        }
    }

    let tar_bytes = builder
        .into_inner()
        .context("Failed to finalize tar archive structure")?;
    let tar_gz = compression::gzip_unix(&tar_bytes)?;
    info!(
        "Archived {} entries from '{}' ({} bytes compressed)",
        nodes.len(),
        root.display(),
        tar_gz.len()
    );
    Ok(Some(tar_gz))
}

/// Walks `root` in pre-order, excluding `root` itself.
fn collect_nodes(root: &Path, order: EntryOrder) -> Result<Vec<WalkedNode>> {
    let mut walker = WalkDir::new(root).min_depth(1);
    if order == EntryOrder::Sorted {
        walker = walker.sort_by_file_name();
    }

    let mut nodes = Vec::new();
    for entry_result in walker {
        let entry = entry_result
            .with_context(|| format!("Failed to walk directory '{}'", root.display()))?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| {
                format!(
                    "Could not determine relative path for '{}' based on '{}'",
                    entry.path().display(),
                    root.display()
                )
            })?;
        nodes.push(WalkedNode {
            relative_path: archive_path(relative)?,
            source: entry.path().to_path_buf(),
        });
    }
    Ok(nodes)
}

/// Converts a host-relative path into a `./a/b` member name.
fn archive_path(relative: &Path) -> Result<Vec<u8>> {
    let mut name = b".".to_vec();
    for component in relative.components() {
        name.push(b'/');
        name.extend_from_slice(component_bytes(component.as_os_str(), relative)?);
    }
    Ok(name)
}

#[cfg(unix)]
fn component_bytes<'a>(part: &'a OsStr, _relative: &Path) -> Result<&'a [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Ok(part.as_bytes())
}

#[cfg(not(unix))]
fn component_bytes<'a>(part: &'a OsStr, relative: &Path) -> Result<&'a [u8]> {
    part.to_str().map(str::as_bytes).ok_or_else(|| {
        MkipkError::NonUtf8Path {
            path: relative.to_path_buf(),
        }
        .into()
    })
}

/// File body reader that yields exactly `size` bytes.
///
/// Reads past `size` are cut off; running out early is an `UnexpectedEof`
/// error, so a file that changes between stat and read cannot desync the
/// tar stream from its header.
struct SizedBody<R> {
    inner: io::Take<R>,
}

impl<R: Read> SizedBody<R> {
    fn new(inner: R, size: u64) -> Self {
        Self {
            inner: inner.take(size),
        }
    }
}

impl<R: Read> Read for SizedBody<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        if read == 0 && !buf.is_empty() && self.inner.limit() > 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file shrank while being archived ({} bytes missing)", self.inner.limit()),
            ));
        }
        Ok(read)
    }
}

/// Writes `entry`'s header (with its name set verbatim) followed by `data`.
fn append_entry<W: Write, R: Read>(builder: &mut Builder<W>, entry: &ArchiveEntry, data: R) -> Result<()> {
    let name = entry.relative_path.as_slice();
    if name.len() > HEADER_NAME_LEN {
        let mut long_name = Header::new_gnu();
        long_name.as_old_mut().name[..GNU_LONG_NAME_MARKER.len()].copy_from_slice(GNU_LONG_NAME_MARKER);
        long_name.set_entry_type(EntryType::GNULongName);
        long_name.set_mode(0o644);
        long_name.set_uid(0);
        long_name.set_gid(0);
        long_name.set_mtime(0);
        // Name plus trailing NUL.
        long_name.set_size(name.len() as u64 + 1);
        long_name.set_cksum();
        builder
            .append(&long_name, name.chain(&[0u8][..]))
            .context("Failed to write GNU long-name record")?;
    }

    let mut header = entry.header()?;
    let stored = name.len().min(HEADER_NAME_LEN);
    header.as_old_mut().name[..stored].copy_from_slice(&name[..stored]);
    header.set_cksum();
    builder
        .append(&header, data)
        .with_context(|| format!("Failed to append '{}' to tar stream", entry.display_name()))?;
    Ok(())
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

fn modified_secs(metadata: &Metadata) -> u64 {
    metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |elapsed| elapsed.as_secs())
}
