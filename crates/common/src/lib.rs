pub mod countries;
pub mod error;
pub mod options;

pub use error::{Error, Result};
pub use options::{resolve, Disclosures, ResolvedOptions, VerificationOptions};
