//! Flow rate parsing and conversion.

use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use alloy::primitives::aliases::I96;

use crate::superfluid::types::FlowError;

const SECONDS_PER_DAY: i128 = 86_400;
const SECONDS_PER_MONTH: i128 = 30 * SECONDS_PER_DAY;

/// Largest value representable as a Solidity `int96`.
pub const MAX_FLOW_RATE: i128 = (1i128 << 95) - 1;

/// Token amount (smallest unit) streamed per second.
///
/// Always strictly positive and within `int96` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FlowRate(i128);

impl FlowRate {
    /// Parse a decimal string such as `"29400000000000"`.
    ///
    /// Surrounding whitespace is ignored. A sign prefix other than `-` is
    /// rejected.
    pub fn parse(raw: &str) -> Result<Self, FlowError> {
        let trimmed = raw.trim();
        if trimmed.starts_with('+') {
            return Err(FlowError::InvalidFlowRate(format!(
                "'{}' must not carry a '+' sign",
                trimmed
            )));
        }

        let value: i128 = trimmed.parse().map_err(|e: ParseIntError| match e.kind() {
            IntErrorKind::PosOverflow => {
                FlowError::InvalidFlowRate(format!("{} exceeds int96", trimmed))
            }
            IntErrorKind::NegOverflow => {
                FlowError::InvalidFlowRate(format!("{} must be positive", trimmed))
            }
            _ => FlowError::InvalidFlowRate(format!("'{}' is not an integer", raw)),
        })?;
        Self::new(value)
    }

    /// Wrap a raw per-second amount.
    pub fn new(value: i128) -> Result<Self, FlowError> {
        if value <= 0 {
            return Err(FlowError::InvalidFlowRate(format!("{} must be positive", value)));
        }
        if value > MAX_FLOW_RATE {
            return Err(FlowError::InvalidFlowRate(format!("{} exceeds int96", value)));
        }
        Ok(Self(value))
    }

    /// Amount per second.
    pub fn per_second(&self) -> i128 {
        self.0
    }

    /// Amount per day.
    pub fn per_day(&self) -> i128 {
        self.0 * SECONDS_PER_DAY
    }

    /// Amount per 30-day month.
    pub fn per_month(&self) -> i128 {
        self.0 * SECONDS_PER_MONTH
    }

    /// ABI representation.
    pub fn to_i96(&self) -> Result<I96, FlowError> {
        I96::try_from(self.0).map_err(|e| FlowError::InvalidFlowRate(e.to_string()))
    }
}

impl FromStr for FlowRate {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FlowRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Format a smallest-unit amount with the given decimals (up to 6 shown).
pub fn format_units(amount: i128, decimals: u8) -> String {
    if amount == 0 {
        return "0".to_string();
    }

    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let divisor = 10u128.pow(decimals as u32);
    let whole = abs / divisor;
    let remainder = abs % divisor;

    if remainder == 0 {
        return format!("{}{}", sign, whole);
    }

    let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
    let trimmed = decimal_str.trim_end_matches('0');
    format!("{}{}.{}", sign, whole, &trimmed[..trimmed.len().min(6)])
}
