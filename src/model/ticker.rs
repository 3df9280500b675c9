use std::fmt;

use crate::error::ValidationError;

const MAX_TICKER_LEN: usize = 12;

/// Upper-cased exchange symbol, e.g. `AAPL` or `BRK.B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let s = raw.trim().to_ascii_uppercase();
        if s.is_empty() {
            return Err(ValidationError::NoTickerSelected);
        }
        let valid_chars = s
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | ':'));
        if s.len() > MAX_TICKER_LEN || !valid_chars {
            return Err(ValidationError::InvalidTicker(raw.trim().to_string()));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(Ticker::parse("  aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Ticker::parse("brk.b").unwrap().as_str(), "BRK.B");
        assert_eq!(Ticker::parse("nyse:ibm").unwrap().as_str(), "NYSE:IBM");
    }

    #[test]
    fn parse_rejects_empty_and_garbage() {
        assert_eq!(Ticker::parse("   "), Err(ValidationError::NoTickerSelected));
        assert!(matches!(
            Ticker::parse("AA PL"),
            Err(ValidationError::InvalidTicker(_))
        ));
        assert!(matches!(
            Ticker::parse("ABCDEFGHIJKLMN"),
            Err(ValidationError::InvalidTicker(_))
        ));
    }
}
