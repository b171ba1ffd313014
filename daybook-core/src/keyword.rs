//! Lowercase keyword enums shared by the entity modules.

/// Implements `as_str`, `Display`, `FromStr` and `ALL` for a unit-only enum
/// stored as a lowercase string.
macro_rules! keyword_enum {
    ($name:ident, $what:literal, { $($variant:ident => $kw:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $kw),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::DaybookError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == needle)
                    .ok_or_else(|| {
                        let expected: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        $crate::error::DaybookError::validation(format!(
                            "Unknown {} '{}'. Expected one of: {}",
                            $what,
                            s,
                            expected.join(", ")
                        ))
                    })
            }
        }
    };
}

pub(crate) use keyword_enum;
