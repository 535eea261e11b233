/// Parsed representation of prompt templates
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One piece of a scanned prompt text
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text copied to the output unchanged
    Literal(String),

    /// Combination expression: {2$$ and $$a|b|c}
    Combination(Combination),

    /// Wildcard token: __name__
    Wildcard(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    /// How many variants to draw; `None` falls back to the configured default
    pub quantity: Option<QuantitySpec>,
    /// Text placed between drawn variants; `None` falls back to the configured default
    pub joiner: Option<String>,
    /// Never empty: an empty body still yields one empty variant
    pub variants: Vec<String>,
}

impl Combination {
    pub fn new(variants: Vec<String>) -> Self {
        Combination {
            quantity: None,
            joiner: None,
            variants,
        }
    }

    pub fn with_quantity(mut self, quantity: QuantitySpec) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_joiner(mut self, joiner: impl Into<String>) -> Self {
        self.joiner = Some(joiner.into());
        self
    }
}

/// The quantity section of a combination expression
///
/// Written as a single integer (`2`) or a range whose bounds may be left
/// out (`1-3`, `-2`, `2-`, `-`). Missing bounds default to `0` and the
/// number of variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QuantitySpec {
    Exact(i64),
    Range { low: Option<i64>, high: Option<i64> },
}

impl QuantitySpec {
    /// The `-` spec: anywhere from none to all of the variants
    pub const ANY: QuantitySpec = QuantitySpec::Range {
        low: None,
        high: None,
    };
}

impl Default for QuantitySpec {
    fn default() -> Self {
        QuantitySpec::ANY
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid quantity '{0}', expected an integer or a range like 1-3")]
pub struct InvalidQuantity(pub String);

impl FromStr for QuantitySpec {
    type Err = InvalidQuantity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bound = |part: &str| -> Result<Option<i64>, InvalidQuantity> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            part.parse::<i64>()
                .map(Some)
                .map_err(|_| InvalidQuantity(s.to_string()))
        };

        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [single] => match bound(single)? {
                Some(k) => Ok(QuantitySpec::Exact(k)),
                None => Err(InvalidQuantity(s.to_string())),
            },
            [low, high] => Ok(QuantitySpec::Range {
                low: bound(low)?,
                high: bound(high)?,
            }),
            _ => Err(InvalidQuantity(s.to_string())),
        }
    }
}

impl TryFrom<String> for QuantitySpec {
    type Error = InvalidQuantity;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuantitySpec> for String {
    fn from(spec: QuantitySpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for QuantitySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantitySpec::Exact(k) => write!(f, "{}", k),
            QuantitySpec::Range { low, high } => {
                if let Some(low) = low {
                    write!(f, "{}", low)?;
                }
                write!(f, "-")?;
                if let Some(high) = high {
                    write!(f, "{}", high)?;
                }
                Ok(())
            }
        }
    }
}
