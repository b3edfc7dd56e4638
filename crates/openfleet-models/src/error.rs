//! Error types for the `openfleet-models` crate.
//!
//! Field access on a record can only fail locally: either the field name is
//! not part of the resource's schema, or a helper needed a field that was
//! never set. There is no network failure mode in this crate.

/// Errors produced when reading or writing record fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The field name is not part of the resource's schema.
    #[error("unknown field \"{field}\" on resource \"{resource}\"")]
    UnknownField {
        /// The resource the field was looked up on (e.g. `"job"`).
        resource: &'static str,
        /// The field name that failed the lookup.
        field: String,
    },

    /// A helper required a field that is currently unset.
    #[error("missing field \"{field}\" on resource \"{resource}\"")]
    MissingField {
        /// The resource the field belongs to.
        resource: &'static str,
        /// The name of the unset field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unknown_field() {
        let err = ModelError::UnknownField {
            resource: "job",
            field: "colour".into(),
        };
        assert_eq!(err.to_string(), "unknown field \"colour\" on resource \"job\"");
    }

    #[test]
    fn error_display_missing_field() {
        let err = ModelError::MissingField {
            resource: "vehicle",
            field: "name",
        };
        assert_eq!(
            err.to_string(),
            "missing field \"name\" on resource \"vehicle\""
        );
    }
}
