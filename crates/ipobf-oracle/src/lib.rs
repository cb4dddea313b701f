pub mod curl;
pub mod extract;
pub mod host;

pub use curl::CurlOracle;
pub use extract::extract_ipv4;
pub use host::HostOs;

use ipobf_core::ObfError;
use std::future::Future;

/// Something that reports how a real-world parser reads an address.
///
/// `Ok(None)` means the oracle ran but named no IPv4 literal, which is an
/// ordinary negative outcome. `Err` is reserved for an oracle that cannot
/// run at all.
pub trait Oracle: Send + Sync + 'static {
    fn probe(
        &self,
        candidate: &str,
    ) -> impl Future<Output = Result<Option<String>, ObfError>> + Send;
}
