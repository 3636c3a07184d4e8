//! Pinned dependency manifest (`requirements.txt` style).
//!
//! One `<package-name>==<version>` pin per line. Blank lines and `#` comment
//! lines separate sections; a comment line opens a new group whose header is
//! the comment text.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

lazy_static! {
    static ref PIN_RE: Regex = Regex::new(
        r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)(?:\[[A-Za-z0-9._,\s-]+\])?==(?P<version>[^\s=;#]+)$"
    )
    .expect("pin regex is valid");
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("line {line}: expected `<package>==<version>`, found `{content}`")]
    InvalidLine { line: usize, content: String },

    #[error("line {line}: duplicate package `{name}` (first pinned on line {first_line})")]
    DuplicatePackage {
        name: String,
        first_line: usize,
        line: usize,
    },

    #[error("cannot read manifest: {0}")]
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub version: String,
    /// 1-based line number in the manifest.
    pub line: usize,
}

impl Requirement {
    /// Name folded for comparison: lowercase, runs of `-`, `_`, `.` become `-`.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestGroup {
    pub header: Option<String>,
    pub requirements: Vec<Requirement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    groups: Vec<ManifestGroup>,
}

impl Manifest {
    /// Parse a manifest, failing on the first problem.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let (manifest, mut errors) = Self::parse_lenient(text);
        if errors.is_empty() {
            Ok(manifest)
        } else {
            Err(errors.remove(0))
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::Io(format!("{}: {}", path.display(), e)))?;
        Self::parse(&text)
    }

    /// Every problem in the manifest, in line order.
    pub fn lint(text: &str) -> Vec<ManifestError> {
        Self::parse_lenient(text).1
    }

    fn parse_lenient(text: &str) -> (Self, Vec<ManifestError>) {
        let mut groups: Vec<ManifestGroup> = Vec::new();
        let mut current = ManifestGroup::default();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut errors = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                continue;
            }

            if let Some(comment) = trimmed.strip_prefix('#') {
                let header = comment.trim().to_string();
                // A run of comment lines keeps the first as the header.
                if current.requirements.is_empty() {
                    current.header.get_or_insert(header);
                } else {
                    groups.push(std::mem::replace(
                        &mut current,
                        ManifestGroup {
                            header: Some(header),
                            requirements: Vec::new(),
                        },
                    ));
                }
                continue;
            }

            let pin = strip_inline_comment(trimmed);
            let Some(caps) = PIN_RE.captures(pin) else {
                errors.push(ManifestError::InvalidLine {
                    line,
                    content: trimmed.to_string(),
                });
                continue;
            };

            let requirement = Requirement {
                name: caps["name"].to_string(),
                version: caps["version"].to_string(),
                line,
            };

            let key = requirement.normalized_name();
            if let Some(&first_line) = seen.get(&key) {
                errors.push(ManifestError::DuplicatePackage {
                    name: requirement.name,
                    first_line,
                    line,
                });
                continue;
            }
            seen.insert(key, line);

            current.requirements.push(requirement);
        }
        groups.push(current);

        groups.retain(|g| !g.requirements.is_empty() || g.header.is_some());
        (Self { groups }, errors)
    }

    pub fn groups(&self) -> &[ManifestGroup] {
        &self.groups
    }

    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.groups.iter().flat_map(|g| g.requirements.iter())
    }

    /// Look up a pin by package name, ignoring case and separator style.
    pub fn get(&self, name: &str) -> Option<&Requirement> {
        let wanted = normalize_name(name);
        self.requirements().find(|r| r.normalized_name() == wanted)
    }

    pub fn len(&self) -> usize {
        self.requirements().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cut at the first `#` that follows whitespace (space or tab).
fn strip_inline_comment(line: &str) -> &str {
    let cut = line
        .char_indices()
        .zip(line.chars().skip(1))
        .find(|((_, c), next)| c.is_whitespace() && *next == '#')
        .map(|((pos, _), _)| pos);
    match cut {
        Some(pos) => line[..pos].trim_end(),
        None => line,
    }
}

fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}
