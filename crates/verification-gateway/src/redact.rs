//! Post-verification redaction of undisclosed fields.
//!
//! The gateway does not assume the verifier limited the proof's
//! disclosures correctly: every field whose resolved flag is off is
//! overwritten with a fixed sentinel before the subject leaves the
//! gateway.

use disclosure_common::Disclosures;
use serde_json::{Map, Value};

/// Sentinel written over undisclosed fields.
pub const NOT_DISCLOSED: &str = "Not disclosed";

/// Overwrite every disabled disclosure field in `subject` with the
/// sentinel. The field is written whether or not the verifier sent a
/// value for it, which keeps the response shape stable and makes the
/// filter idempotent.
pub fn redact_credential_subject(subject: &mut Map<String, Value>, disclosures: &Disclosures) {
    for (field, enabled) in disclosures.flags() {
        if !enabled {
            subject.insert(field.to_string(), Value::String(NOT_DISCLOSED.to_string()));
        }
    }
}
