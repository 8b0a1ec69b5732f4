//! Ownership-aware install and uninstall walker.
//!
//! Entries declare project-relative files and an expanded destination
//! directory. Installing recreates the relative directory structure under
//! the destination, copies regular files, recreates symlinks without
//! dereferencing them, and applies uid/gid/mode when declared.
//! Uninstalling walks entries in reverse-declaration order, removes the
//! files, then prunes parent directories that became empty; a directory
//! that is already gone or still populated is left alone, silently.
//!
//! A `DESTDIR` environment variable, if set, is prefixed onto every
//! destination, staging the whole tree under an alternate root.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::fs::{absolutize, ensure_dir, symlink};
use crate::util::shell::{Shell, Status};

/// One declared install entry, destination already expanded.
#[derive(Debug, Clone)]
pub struct InstallEntry {
    /// Files to install, relative to the project root.
    pub files: Vec<PathBuf>,
    /// Absolute destination directory.
    pub dest: PathBuf,
    /// Ownership to apply to everything installed by this entry.
    pub ownership: Option<Ownership>,
}

/// Ownership and permissions for installed paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ownership {
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    /// Permission bits, e.g. `0o644`.
    pub mode: Option<u32>,
}

impl Ownership {
    /// Whether there is anything to apply.
    pub fn is_noop(&self) -> bool {
        self.uid.is_none() && self.gid.is_none() && self.mode.is_none()
    }

    fn apply(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            if self.uid.is_some() || self.gid.is_some() {
                std::os::unix::fs::chown(path, self.uid, self.gid)
                    .with_context(|| format!("failed to chown {}", path.display()))?;
            }
            if let Some(mode) = self.mode {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(path, fs::Permissions::from_mode(mode))
                    .with_context(|| format!("failed to chmod {}", path.display()))?;
            }
        }
        #[cfg(not(unix))]
        {
            let _ = path;
        }
        Ok(())
    }
}

/// Parse an octal mode string such as `"0644"`.
pub fn parse_mode(mode: &str) -> Result<u32> {
    u32::from_str_radix(mode, 8).with_context(|| format!("invalid octal mode `{}`", mode))
}

/// Prefix `DESTDIR` onto an absolute destination, if set.
pub fn apply_destdir(dest: &Path) -> PathBuf {
    match std::env::var("DESTDIR") {
        Ok(destdir) if !destdir.is_empty() => {
            let staged = absolutize(Path::new(&destdir));
            staged.join(strip_root(dest))
        }
        _ => dest.to_path_buf(),
    }
}

/// Drop the root component so a destination can be re-rooted.
fn strip_root(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

/// Install all entries in declaration order. `root` is the project
/// directory the declared relative paths resolve against.
pub fn install(root: &Path, entries: &[InstallEntry], shell: &Shell) -> Result<()> {
    for entry in entries {
        let dest = apply_destdir(&entry.dest);
        ensure_dir(&dest)?;
        for file in &entry.files {
            install_one(root, file, &dest, entry.ownership.as_ref())?;
            shell.status(Status::Installed, dest.join(file).display());
        }
    }
    Ok(())
}

/// Uninstall all entries in reverse-declaration order, so children are
/// removed before their parents are checked for emptiness.
pub fn uninstall(root: &Path, entries: &[InstallEntry], shell: &Shell) -> Result<()> {
    for entry in entries.iter().rev() {
        let dest = apply_destdir(&entry.dest);
        for file in &entry.files {
            uninstall_one(root, file, &dest)?;
            shell.status(Status::Removed, dest.join(file).display());
        }
    }
    Ok(())
}

/// Install a single relative path under `dest`, creating its parent
/// directories first.
fn install_one(
    root: &Path,
    file: &Path,
    dest: &Path,
    ownership: Option<&Ownership>,
) -> Result<()> {
    if let Some(parent) = relative_parent(file) {
        install_one(root, parent, dest, ownership)?;
    }

    let src = root.join(file);
    let dst = dest.join(file);
    let meta = fs::symlink_metadata(&src).ok();

    match meta {
        // Directories, and declared paths that do not exist in the
        // project, become directories at the destination.
        None => {
            if !dst.is_dir() {
                fs::create_dir(&dst)
                    .with_context(|| format!("failed to create {}", dst.display()))?;
            }
        }
        Some(meta) if meta.is_dir() => {
            if !dst.is_dir() {
                fs::create_dir(&dst)
                    .with_context(|| format!("failed to create {}", dst.display()))?;
            }
        }
        Some(meta) if meta.is_symlink() => {
            if dst.exists() || dst.is_symlink() {
                fs::remove_file(&dst)
                    .with_context(|| format!("failed to replace {}", dst.display()))?;
            }
            let target = fs::read_link(&src)
                .with_context(|| format!("failed to read link {}", src.display()))?;
            symlink(&target, &dst)
                .with_context(|| format!("failed to link {}", dst.display()))?;
        }
        Some(_) => {
            fs::copy(&src, &dst).with_context(|| {
                format!("failed to copy {} to {}", src.display(), dst.display())
            })?;
        }
    }

    if let Some(ownership) = ownership {
        if !ownership.is_noop() && !dst.is_symlink() {
            ownership.apply(&dst)?;
        }
    }
    Ok(())
}

/// Remove a single installed path, then prune empty parent directories.
fn uninstall_one(root: &Path, file: &Path, dest: &Path) -> Result<()> {
    let src = root.join(file);
    let dst = dest.join(file);
    let src_is_dir = src.is_dir() || !src.exists();

    if src_is_dir {
        // Absent and non-empty directories are both "nothing to do".
        if fs::remove_dir(&dst).is_err() {
            return Ok(());
        }
    } else if dst.exists() || dst.is_symlink() {
        fs::remove_file(&dst)
            .with_context(|| format!("failed to remove {}", dst.display()))?;
    }

    if let Some(parent) = relative_parent(file) {
        uninstall_one(root, parent, dest)?;
    }
    Ok(())
}

/// The parent of a relative path, when it has meaningful components.
fn relative_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
