//! Static schema descriptors for OpenFleet resources.
//!
//! Every wire-facing resource (job, item, vehicle) is described by a
//! [`Schema`]: the full set of field names the remote API recognises for
//! that resource, which of them are always emitted on the wire, which form
//! the resource's lookup identity, and which may be written on create and
//! update requests.
//!
//! Schemas are `&'static` constants defined next to their resource type
//! (see [`crate::job::JOB_SCHEMA`] and friends); a
//! [`Record`](crate::record::Record) borrows one for its whole lifetime.

/// Describes one resource type as the remote API sees it.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    /// Resource name used in error messages (e.g. `"job"`).
    pub resource: &'static str,
    /// Every field the remote API recognises for this resource, in the
    /// order the API documents them.
    pub fields: &'static [&'static str],
    /// Fields that start with a non-null string default instead of null.
    pub defaults: &'static [(&'static str, &'static str)],
    /// Fields that must always be present in outbound payloads, even when
    /// null and untouched.
    pub required: &'static [&'static str],
    /// The minimal field subset the API uses to look this resource up.
    pub identity: &'static [&'static str],
    /// Fields accepted by create/update endpoints. Empty means every field
    /// is writable.
    pub writable: &'static [&'static str],
}

impl Schema {
    /// Whether `field` is part of this schema.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    /// Resolve `field` to its canonical `&'static str`, if known.
    pub fn canonical(&self, field: &str) -> Option<&'static str> {
        self.fields.iter().find(|&&f| f == field).copied()
    }

    /// Whether `field` must always be emitted on the wire.
    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(&field)
    }

    /// The non-null default for `field`, if it has one.
    pub fn default_for(&self, field: &str) -> Option<&'static str> {
        self.defaults
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, default)| *default)
    }

    /// Whether `field` may be sent to create/update endpoints.
    ///
    /// An empty writable mask means the resource has no restriction.
    pub fn is_writable(&self, field: &str) -> bool {
        self.writable.is_empty() || self.writable.contains(&field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_SCHEMA: Schema = Schema {
        resource: "test",
        fields: &["id", "kind", "name", "note"],
        defaults: &[("kind", "standard")],
        required: &["name"],
        identity: &["id"],
        writable: &["kind", "name"],
    };

    #[test]
    fn contains_and_canonical() {
        assert!(TEST_SCHEMA.contains("name"));
        assert!(!TEST_SCHEMA.contains("colour"));
        assert_eq!(TEST_SCHEMA.canonical("note"), Some("note"));
        assert_eq!(TEST_SCHEMA.canonical("colour"), None);
    }

    #[test]
    fn required_lookup() {
        assert!(TEST_SCHEMA.is_required("name"));
        assert!(!TEST_SCHEMA.is_required("note"));
    }

    #[test]
    fn default_lookup() {
        assert_eq!(TEST_SCHEMA.default_for("kind"), Some("standard"));
        assert_eq!(TEST_SCHEMA.default_for("name"), None);
    }

    #[test]
    fn writable_mask() {
        assert!(TEST_SCHEMA.is_writable("kind"));
        assert!(!TEST_SCHEMA.is_writable("note"));
    }

    #[test]
    fn empty_writable_mask_allows_everything() {
        static OPEN: Schema = Schema {
            resource: "open",
            fields: &["a"],
            defaults: &[],
            required: &[],
            identity: &[],
            writable: &[],
        };
        assert!(OPEN.is_writable("a"));
    }
}
