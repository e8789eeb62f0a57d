//! Output dialects.
//!
//! Both editors read the same grammar, but Valve Hammer Editor only knows a
//! subset of the keyvalue types J.A.C.K accepts. The finer J.A.C.K types are
//! folded into their closest Hammer equivalent at render time so the stored
//! records stay dialect agnostic.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Hammer,
    Jack,
}

impl Dialect {
    /// Every dialect, in generation order.
    pub const ALL: [Dialect; 2] = [Dialect::Hammer, Dialect::Jack];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Hammer => "hammer",
            Dialect::Jack => "jack",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyvalue type as the given dialect should see it.
pub fn remap_for_dialect(kind: &str, dialect: Dialect) -> &str {
    match dialect {
        Dialect::Jack => kind,
        Dialect::Hammer => match kind {
            "float" | "vector" | "scale" | "sky" => "string",
            "target_generic" | "target_name_or_class" => "target_destination",
            other => other,
        },
    }
}
