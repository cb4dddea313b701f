pub mod config;
pub mod encoder;
pub mod error;
pub mod registry;
pub mod spec;

pub use config::ObfuscatorConfig;
pub use encoder::{dotless, encode, Encoding, Order};
pub use error::ObfError;
pub use registry::SpecRegistry;
pub use spec::{Method, ObfuscationSpec, Strategy};

/// Splits a dotted address into its decimal octet strings.
///
/// The number of groups is not checked; only that each one is a
/// non-empty run of ASCII digits the encoder can work with.
pub fn split_octets(address: &str) -> Result<Vec<String>, ObfError> {
    address
        .split('.')
        .map(|octet| {
            if octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ObfError::InvalidOctet(octet.to_string()));
            }
            Ok(octet.to_string())
        })
        .collect()
}
