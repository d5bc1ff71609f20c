//! Tagging policy options.

use std::str::FromStr;

use crate::error::Brat2BioError;

/// How tokens of two characters or fewer inside a multi-token span are tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortTokenPolicy {
    /// Tag short tokens `O` regardless of their position in the span
    #[default]
    Demote,
    /// Tag short tokens like any other token (`-B`/`-I`)
    Keep,
}

impl ShortTokenPolicy {
    /// Maximum length (in characters) of a token the `Demote` policy applies to.
    pub const MAX_SHORT_LEN: usize = 2;

    /// Whether this raw token should be forced to `O`.
    pub fn demotes(self, raw_token: &str) -> bool {
        match self {
            ShortTokenPolicy::Demote => raw_token.chars().count() <= Self::MAX_SHORT_LEN,
            ShortTokenPolicy::Keep => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShortTokenPolicy::Demote => "demote",
            ShortTokenPolicy::Keep => "keep",
        }
    }
}

impl FromStr for ShortTokenPolicy {
    type Err = Brat2BioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "demote" => Ok(ShortTokenPolicy::Demote),
            "keep" => Ok(ShortTokenPolicy::Keep),
            _ => Err(Brat2BioError::InvalidPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_demote() {
        assert_eq!(ShortTokenPolicy::default(), ShortTokenPolicy::Demote);
    }

    #[test]
    fn test_demote_counts_chars_not_bytes() {
        let policy = ShortTokenPolicy::Demote;
        assert!(policy.demotes("в"));
        assert!(policy.demotes("по"));
        assert!(policy.demotes("of"));
        assert!(!policy.demotes("для"));
        assert!(!policy.demotes("the"));
    }

    #[test]
    fn test_keep_never_demotes() {
        assert!(!ShortTokenPolicy::Keep.demotes("в"));
        assert!(!ShortTokenPolicy::Keep.demotes(""));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "demote".parse::<ShortTokenPolicy>().unwrap(),
            ShortTokenPolicy::Demote
        );
        assert_eq!(
            "KEEP".parse::<ShortTokenPolicy>().unwrap(),
            ShortTokenPolicy::Keep
        );
        assert!("o".parse::<ShortTokenPolicy>().is_err());
        assert!(matches!(
            "drop".parse::<ShortTokenPolicy>(),
            Err(Brat2BioError::InvalidPolicy(name)) if name == "drop"
        ));
    }
}
