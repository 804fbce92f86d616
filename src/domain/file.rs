use serde::{Deserialize, Serialize};

/// One entry of a directory listing, in the shape the gateway reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub last_modified: Option<u64>,
    #[serde(default)]
    pub mode: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Folder,
}

impl FileEntry {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, FileKind::Folder)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionTriad {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub owner: PermissionTriad,
    pub group: PermissionTriad,
    pub others: PermissionTriad,
}

impl Permissions {
    pub fn from_mode(mode: u32) -> Self {
        let triad = |shift: u32| PermissionTriad {
            read: mode & (0o4 << shift) != 0,
            write: mode & (0o2 << shift) != 0,
            execute: mode & (0o1 << shift) != 0,
        };
        Self {
            owner: triad(6),
            group: triad(3),
            others: triad(0),
        }
    }

    pub fn to_mode(self) -> u32 {
        let bits = |t: PermissionTriad, shift: u32| {
            (if t.read { 0o4 } else { 0 } | if t.write { 0o2 } else { 0 }
                | if t.execute { 0o1 } else { 0 })
                << shift
        };
        bits(self.owner, 6) | bits(self.group, 3) | bits(self.others, 0)
    }
}

/// Renders the `rwxr-x---` form of a mode.
pub fn format_mode(mode: u32) -> String {
    let perms = Permissions::from_mode(mode);
    let fmt = |t: PermissionTriad| {
        format!(
            "{}{}{}",
            if t.read { 'r' } else { '-' },
            if t.write { 'w' } else { '-' },
            if t.execute { 'x' } else { '-' }
        )
    };
    format!("{}{}{}", fmt(perms.owner), fmt(perms.group), fmt(perms.others))
}

pub fn format_octal(mode: u32) -> String {
    format!("{:03o}", mode & 0o777)
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Byte".to_string();
    }
    let exp = (bytes.ilog2() / 10).min(UNITS.len() as u32 - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    format!("{} {}", value.round() as u64, UNITS[exp as usize])
}

/// Joins a directory and an entry name, tolerating a trailing slash on
/// the directory.
pub fn full_path(directory: &str, name: &str) -> String {
    if directory.ends_with('/') {
        format!("{directory}{name}")
    } else {
        format!("{directory}/{name}")
    }
}

/// Normalizes a manually entered path: leading slash enforced, trailing
/// slash stripped except for the root.
pub fn normalize_path(input: &str) -> String {
    let trimmed = input.trim();
    let mut path = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

/// Parent directory of a path, or `/` when already at the root.
pub fn parent_path(path: &str) -> String {
    let mut parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    parts.pop();
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}
