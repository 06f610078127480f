//! Interface name parsing
//!
//! Names follow `<physical>` or `<physical>.<id>[.<id>]`. The physical part must
//! start with a letter and may contain alphanumerics, `_`, `-`, `/` and `:`; every
//! dot-separated suffix must be a non-empty decimal number.

use serde::Serialize;

/// Position of an interface within the naming hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterfaceKind {
    Physical,
    SubInterface,
    /// A sub-interface of a sub-interface (two stacked tags)
    QinX,
}

impl std::fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterfaceKind::Physical => write!(f, "physical"),
            InterfaceKind::SubInterface => write!(f, "sub-interface"),
            InterfaceKind::QinX => write!(f, "qinx"),
        }
    }
}

/// A well-formed interface name split into its components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName<'a> {
    pub name: &'a str,
    pub base: &'a str,
    pub sub_ids: Vec<u32>,
}

impl<'a> ParsedName<'a> {
    pub fn kind(&self) -> InterfaceKind {
        match self.sub_ids.len() {
            0 => InterfaceKind::Physical,
            1 => InterfaceKind::SubInterface,
            _ => InterfaceKind::QinX,
        }
    }

    /// Last numeric suffix, if any
    pub fn sub_id(&self) -> Option<u32> {
        self.sub_ids.last().copied()
    }

    /// Name with exactly the last suffix removed
    pub fn parent_name(&self) -> Option<&'a str> {
        if self.sub_ids.is_empty() {
            return None;
        }
        self.name.rsplit_once('.').map(|(parent, _)| parent)
    }

    /// The one-level sub-interface carrying the outer tag of a QinX interface
    pub fn qinx_parent_name(&self) -> Option<&'a str> {
        if self.sub_ids.len() < 2 {
            return None;
        }
        self.name
            .match_indices('.')
            .nth(1)
            .map(|(idx, _)| &self.name[..idx])
    }
}

fn is_valid_base(base: &str) -> bool {
    let mut chars = base.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/' | ':'))
}

/// Parse an interface name, returning `None` for anything malformed.
pub fn parse(name: &str) -> Option<ParsedName<'_>> {
    let mut parts = name.split('.');
    let base = parts.next()?;
    if !is_valid_base(base) {
        return None;
    }

    let mut sub_ids = Vec::new();
    for part in parts {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        sub_ids.push(part.parse::<u32>().ok()?);
    }

    Some(ParsedName {
        name,
        base,
        sub_ids,
    })
}

/// Classify a name; `None` means the name cannot be classified.
pub fn classify(name: &str) -> Option<InterfaceKind> {
    parse(name).map(|parsed| parsed.kind())
}

/// Strip exactly the last dot-suffix; `None` for physical or malformed names.
pub fn parent_name(name: &str) -> Option<&str> {
    parse(name).and_then(|parsed| parsed.parent_name())
}
