use crate::encoder::{dotless, encode, Encoding, Order};
use crate::error::ObfError;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Top-level obfuscation method as selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Hex,
    Dword,
    Octal,
    Mixed,
}

impl Method {
    pub const ALL: [Method; 4] = [Method::Hex, Method::Dword, Method::Octal, Method::Mixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Hex => "hex",
            Method::Dword => "dword",
            Method::Octal => "octal",
            Method::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ObfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mixed" => Ok(Method::Mixed),
            other => other.parse::<Encoding>().map(Method::from),
        }
    }
}

impl From<Encoding> for Method {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Hex => Method::Hex,
            Encoding::Octal => Method::Octal,
            Encoding::Dword => Method::Dword,
        }
    }
}

/// How the octets of one address are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Single(Encoding),
    /// `switch` leading octets use `first`, the rest use `last`.
    Mixed {
        first: Encoding,
        last: Encoding,
        switch: u8,
    },
}

impl Strategy {
    pub const MIN_SWITCH: u8 = 1;
    pub const MAX_SWITCH: u8 = 4;

    pub fn mixed(first: Encoding, last: Encoding, switch: u8) -> Result<Self, ObfError> {
        if !(Self::MIN_SWITCH..=Self::MAX_SWITCH).contains(&switch) {
            return Err(ObfError::InvalidSwitch(switch));
        }
        Ok(Strategy::Mixed { first, last, switch })
    }

    pub fn method(&self) -> Method {
        match self {
            Strategy::Single(encoding) => Method::from(*encoding),
            Strategy::Mixed { .. } => Method::Mixed,
        }
    }

    /// Encodes `octets` into tokens ready to be joined with ".".
    pub fn encode<S: AsRef<str>>(&self, octets: &[S]) -> Result<Vec<String>, ObfError> {
        match *self {
            Strategy::Single(encoding) => encode(octets, encoding, Order::First),
            Strategy::Mixed { first, last, switch } => {
                let split = usize::from(switch).min(octets.len());
                let (head, tail) = octets.split_at(split);
                let mut tokens = encode(head, first, Order::First)?;
                tokens.extend(encode(tail, last, Order::Last)?);
                Ok(tokens)
            }
        }
    }
}

/// The full parameter set of one obfuscation attempt. Used as the
/// deduplication key in randomized runs, so every field takes part in
/// equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObfuscationSpec {
    pub strategy: Strategy,
    pub dotless: bool,
}

impl ObfuscationSpec {
    pub fn new(strategy: Strategy, dotless: bool) -> Self {
        Self { strategy, dotless }
    }

    /// Draws a spec uniformly: method first, then (for mixed) both
    /// encodings and the switch index, then the dotless flag.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let method = Method::ALL[rng.gen_range(0..Method::ALL.len())];
        let strategy = match method {
            Method::Hex => Strategy::Single(Encoding::Hex),
            Method::Dword => Strategy::Single(Encoding::Dword),
            Method::Octal => Strategy::Single(Encoding::Octal),
            Method::Mixed => Strategy::Mixed {
                first: Encoding::ALL[rng.gen_range(0..Encoding::ALL.len())],
                last: Encoding::ALL[rng.gen_range(0..Encoding::ALL.len())],
                switch: rng.gen_range(Strategy::MIN_SWITCH..=Strategy::MAX_SWITCH),
            },
        };
        Self::new(strategy, rng.gen_bool(0.5))
    }

    /// Builds the obfuscated address for `octets`.
    pub fn obfuscate<S: AsRef<str>>(&self, octets: &[S]) -> Result<String, ObfError> {
        let joined = self.strategy.encode(octets)?.join(".");
        if self.dotless {
            Ok(dotless(&joined))
        } else {
            Ok(joined)
        }
    }
}

impl fmt::Display for ObfuscationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy {
            Strategy::Single(encoding) => {
                write!(f, "Method: {}, Dotless: {}", encoding, self.dotless)
            }
            Strategy::Mixed { first, last, switch } => write!(
                f,
                "Method: mixed, First: {}, Last: {}, Switch: {}, Dotless: {}",
                first, last, switch, self.dotless
            ),
        }
    }
}
