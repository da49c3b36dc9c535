use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical module-qualified item path used in findings and reports.
///
/// Normalization rules are intentionally simple and deterministic:
/// - segments are separated by `::`
/// - surrounding whitespace is trimmed per segment
/// - empty segments are dropped (`foo::::bar` becomes `foo::bar`)
/// - never empty; degenerate input falls back to the trimmed original
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ItemPath(String);

impl ItemPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let raw = s.as_ref().trim();
        let joined = raw
            .split("::")
            .map(str::trim)
            .filter(|seg| !seg.is_empty())
            .collect::<Vec<_>>()
            .join("::");
        if joined.is_empty() {
            Self(raw.to_string())
        } else {
            Self(joined)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split("::")
    }

    /// The containing path, or `None` for a root segment.
    pub fn parent(&self) -> Option<ItemPath> {
        self.0.rfind("::").map(|idx| ItemPath(self.0[..idx].to_string()))
    }

    pub fn join(&self, segment: &str) -> ItemPath {
        ItemPath::new(format!("{}::{}", self.0, segment))
    }
}

impl std::fmt::Display for ItemPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemPath {
    fn from(value: &str) -> Self {
        ItemPath::new(value)
    }
}
