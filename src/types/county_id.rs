use std::{fmt, sync::Arc};

/// Stable key for a county across every source table.
/// Keeps the GEOID text (with leading zeros), e.g. "48001" = state "48" + county "001".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountyId(Arc<str>);

impl CountyId {
    /// Width of a county GEOID.
    pub const LEN: usize = 5;

    /// Build a county id from a state code and a county code, left-padding the
    /// county code to 3 digits ("48", "1" -> "48001").
    pub fn from_parts(state: &str, county: &str) -> Self {
        Self(Arc::from(format!("{state}{county:0>3}")))
    }

    /// Left-pad a raw identifier to 5 characters ("8001" -> "08001").
    /// Identifiers that are already 5 or more characters are kept as-is.
    pub fn padded(raw: &str) -> Self {
        Self(Arc::from(format!("{:0>width$}", raw.trim(), width = Self::LEN)))
    }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }

    /// True if this is a well-formed county id inside the given state.
    #[inline]
    pub fn is_county_of(&self, state_fips: &str) -> bool {
        self.0.len() == Self::LEN && self.0.starts_with(state_fips)
    }
}

impl fmt::Display for CountyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CountyId {
    fn as_ref(&self) -> &str { &self.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_pads_county_code() {
        assert_eq!(CountyId::from_parts("48", "1").as_str(), "48001");
        assert_eq!(CountyId::from_parts("48", "27").as_str(), "48027");
        assert_eq!(CountyId::from_parts("48", "507").as_str(), "48507");
    }

    #[test]
    fn padded_left_fills_short_ids() {
        assert_eq!(CountyId::padded("1001").as_str(), "01001");
        assert_eq!(CountyId::padded("48001").as_str(), "48001");
        assert_eq!(CountyId::padded(" 48001 ").as_str(), "48001");
    }

    #[test]
    fn county_membership_requires_full_width_and_prefix() {
        assert!(CountyId::padded("48001").is_county_of("48"));
        assert!(!CountyId::padded("4801").is_county_of("48"));   // pads to "04801"
        assert!(!CountyId::padded("481234").is_county_of("48")); // too long
        assert!(!CountyId::padded("06001").is_county_of("48"));
    }
}
