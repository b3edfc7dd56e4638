//! Canonical REST paths for the OpenFleet API.
//!
//! Every path used by the SDK **must** be built through [`Endpoints`], so
//! that clients and tooling agree on a single naming convention and future
//! versioning stays in one place.
//!
//! # Path layout (relative to the versioned base URL)
//!
//! ```text
//! jobs                    ← POST create, GET list
//! jobs/{id}               ← GET fetch, PUT update, DELETE delete
//! jobs/search             ← POST search by partial attributes
//! jobs/bulk               ← POST bulk create, DELETE bulk delete
//! jobs/export/{id}.{fmt}  ← GET proof-of-delivery document
//! vehicles                ← POST create, GET list
//! vehicles/{id}           ← GET fetch, PUT update, DELETE delete
//! ```

use openfleet_models::DocumentFormat;

/// Central authority for all REST path names.
pub struct Endpoints;

impl Endpoints {
    // ------------------------------------------------------------------
    // Jobs
    // ------------------------------------------------------------------

    /// Collection path for jobs (create, list).
    pub fn jobs() -> &'static str {
        "jobs"
    }

    /// Path for one job by id (fetch, update, delete).
    pub fn job(id: &str) -> String {
        format!("jobs/{id}")
    }

    /// Path for searching jobs by partial attributes.
    pub fn jobs_search() -> &'static str {
        "jobs/search"
    }

    /// Path for bulk job operations.
    pub fn jobs_bulk() -> &'static str {
        "jobs/bulk"
    }

    /// Path for exporting a job's proof-of-delivery document.
    pub fn job_export(id: &str, format: DocumentFormat) -> String {
        format!("jobs/export/{id}.{format}")
    }

    // ------------------------------------------------------------------
    // Vehicles
    // ------------------------------------------------------------------

    /// Collection path for vehicles (create, list).
    pub fn vehicles() -> &'static str {
        "vehicles"
    }

    /// Path for one vehicle by id (fetch, update, delete).
    pub fn vehicle(id: &str) -> String {
        format!("vehicles/{id}")
    }

    // ------------------------------------------------------------------
    // Parsing helpers
    // ------------------------------------------------------------------

    /// Extract the job id from a `jobs/{id}` path.
    ///
    /// Given `"jobs/j-42"` returns `Some("j-42")`. Returns `None` for
    /// anything else, including the fixed sub-paths (`search`, `bulk`).
    pub fn parse_job_id(path: &str) -> Option<&str> {
        let id = path.strip_prefix("jobs/")?;
        if id.is_empty() || id.contains('/') || matches!(id, "search" | "bulk") {
            None
        } else {
            Some(id)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- job paths ----------------------------------------------------------

    #[test]
    fn job_paths() {
        assert_eq!(Endpoints::jobs(), "jobs");
        assert_eq!(Endpoints::job("j-42"), "jobs/j-42");
        assert_eq!(Endpoints::jobs_search(), "jobs/search");
        assert_eq!(Endpoints::jobs_bulk(), "jobs/bulk");
    }

    #[test]
    fn job_export_path_uses_lowercase_format() {
        assert_eq!(
            Endpoints::job_export("j-42", DocumentFormat::Pdf),
            "jobs/export/j-42.pdf"
        );
        assert_eq!(
            Endpoints::job_export("j-42", DocumentFormat::Tiff),
            "jobs/export/j-42.tiff"
        );
    }

    // -- vehicle paths ------------------------------------------------------

    #[test]
    fn vehicle_paths() {
        assert_eq!(Endpoints::vehicles(), "vehicles");
        assert_eq!(Endpoints::vehicle("v-7"), "vehicles/v-7");
    }

    // -- parsing helpers ----------------------------------------------------

    #[test]
    fn parse_job_id_valid() {
        assert_eq!(Endpoints::parse_job_id("jobs/j-42"), Some("j-42"));
    }

    #[test]
    fn parse_job_id_invalid() {
        assert_eq!(Endpoints::parse_job_id("jobs/"), None);
        assert_eq!(Endpoints::parse_job_id("jobs/search"), None);
        assert_eq!(Endpoints::parse_job_id("jobs/bulk"), None);
        assert_eq!(Endpoints::parse_job_id("vehicles/v-1"), None);
        assert_eq!(Endpoints::parse_job_id("jobs/a/b"), None);
    }
}
