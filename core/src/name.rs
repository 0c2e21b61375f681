//! Identifiers.

use core::fmt;

use compact_str::CompactString;
use smallvec::SmallVec;

/// How a name asks to be quoted. Combined with
/// [`RenderQuotedNames`](crate::settings::RenderQuotedNames) at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quoted {
    #[default]
    Default,
    Quoted,
    Unquoted,
}

/// A single identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    value: CompactString,
    quoted: Quoted,
}

impl Name {
    pub fn new(value: impl Into<CompactString>) -> Self {
        Self {
            value: value.into(),
            quoted: Quoted::Default,
        }
    }

    pub fn quoted(value: impl Into<CompactString>) -> Self {
        Self {
            value: value.into(),
            quoted: Quoted::Quoted,
        }
    }

    pub fn unquoted(value: impl Into<CompactString>) -> Self {
        Self {
            value: value.into(),
            quoted: Quoted::Unquoted,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn quoting(&self) -> Quoted {
        self.quoted
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

/// A possibly schema-qualified name such as `public.users`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    parts: SmallVec<[Name; 2]>,
}

impl QualifiedName {
    pub fn new(parts: impl IntoIterator<Item = Name>) -> Self {
        Self {
            parts: parts.into_iter().collect(),
        }
    }

    pub fn parts(&self) -> &[Name] {
        &self.parts
    }

    /// Unqualified part.
    pub fn last(&self) -> Option<&Name> {
        self.parts.last()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<Name> for QualifiedName {
    fn from(name: Name) -> Self {
        QualifiedName::new([name])
    }
}

impl From<&str> for QualifiedName {
    /// Splits on `.`: `"public.users"` has two parts.
    fn from(value: &str) -> Self {
        QualifiedName::new(value.split('.').map(Name::new))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(part.as_str())?;
        }
        Ok(())
    }
}
