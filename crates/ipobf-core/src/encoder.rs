use crate::error::ObfError;
use std::fmt;
use std::str::FromStr;

/// Per-octet re-encoding rule.
///
/// `mixed` is deliberately absent: a mixed strategy is two encodings applied
/// to either side of a split point, see [`crate::Strategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Hex,
    Octal,
    Dword,
}

impl Encoding {
    pub const ALL: [Encoding; 3] = [Encoding::Hex, Encoding::Dword, Encoding::Octal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Hex => "hex",
            Encoding::Octal => "octal",
            Encoding::Dword => "dword",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = ObfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hex" => Ok(Encoding::Hex),
            "octal" => Ok(Encoding::Octal),
            "dword" => Ok(Encoding::Dword),
            other => Err(ObfError::InvalidMethod(other.to_string())),
        }
    }
}

/// Which end of the address a slice sits on. Only affects `dword` weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Weights count down from 256^3 at the first octet.
    First,
    /// Weights count down to 256^0 at the last octet of the slice.
    Last,
}

/// Re-encodes a slice of decimal octets.
///
/// `Hex` and `Octal` yield one token per octet; `Dword` yields a single token
/// holding the base-256 weighted sum of the whole slice. Callers join the
/// tokens with ".".
///
/// An empty slice still yields one token: an empty string for `Hex` and
/// `Octal`, `"0"` for `Dword`. A mixed split that leaves nothing for its
/// tail therefore keeps its trailing separator.
pub fn encode<S: AsRef<str>>(
    octets: &[S],
    encoding: Encoding,
    order: Order,
) -> Result<Vec<String>, ObfError> {
    if octets.is_empty() && encoding != Encoding::Dword {
        return Ok(vec![String::new()]);
    }
    match encoding {
        Encoding::Hex => octets
            .iter()
            .map(|o| parse_octet(o.as_ref()).map(|v| format!("{:#x}", v)))
            .collect(),
        Encoding::Octal => octets
            .iter()
            .map(|o| parse_octet(o.as_ref()).map(|v| format!("{:o}", v)))
            .collect(),
        Encoding::Dword => dword(octets, order).map(|sum| vec![sum.to_string()]),
    }
}

fn dword<S: AsRef<str>>(octets: &[S], order: Order) -> Result<u128, ObfError> {
    let len = octets.len();
    let mut sum: u128 = 0;

    for (i, octet) in octets.iter().enumerate() {
        // A first-ordered slice longer than four octets would need a negative exponent.
        let exponent = match order {
            Order::First => 3usize.checked_sub(i),
            Order::Last => Some(len - 1 - i),
        }
        .and_then(|e| u32::try_from(e).ok())
        .ok_or(ObfError::DwordOutOfRange)?;

        let weight = 256u128
            .checked_pow(exponent)
            .ok_or(ObfError::DwordOutOfRange)?;
        let term = u128::from(parse_octet(octet.as_ref())?)
            .checked_mul(weight)
            .ok_or(ObfError::DwordOutOfRange)?;
        sum = sum.checked_add(term).ok_or(ObfError::DwordOutOfRange)?;
    }

    Ok(sum)
}

fn parse_octet(octet: &str) -> Result<u64, ObfError> {
    octet
        .parse::<u64>()
        .map_err(|_| ObfError::InvalidOctet(octet.to_string()))
}

/// Replaces every "." separator with its percent-encoded form.
pub fn dotless(address: &str) -> String {
    address.replace('.', "%2E")
}
