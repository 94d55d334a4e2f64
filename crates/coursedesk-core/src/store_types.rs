use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Catalog store backend types
///
/// Defined in core because configuration selects the backend and the
/// storage crate's factory builds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Remote catalog service reached over HTTP.
    Http,
    /// Process-local store seeded explicitly; used for demos and tests.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" | "remote" => Ok(StoreBackend::Http),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid store backend: {}", s)),
        }
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StoreBackend::Http => write!(f, "http"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}
