//! Job operations.
//!
//! All per-job endpoints hang off [`OpenFleetClient`]: create, update,
//! upsert-style save, fetch, search, hydrate, delete, paged listing, the
//! bulk variants, and proof-of-delivery export.
//!
//! Bulk operations are chunked client-side at [`BULK_CHUNK_SIZE`] records
//! per request, preserving input order. Payload construction is split into
//! pure helpers so the request bodies are testable without a network.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use openfleet_models::{DocumentFormat, Job, JobType, JOB_SCHEMA};

use crate::client::{check, OpenFleetClient};
use crate::endpoints::Endpoints;
use crate::error::SdkError;

/// Maximum number of records sent in one bulk request.
pub const BULK_CHUNK_SIZE: usize = 100;

/// Query parameters for [`OpenFleetClient::list_jobs`].
///
/// `None` fields are omitted from the query string. Prefix `sort` with `-`
/// to flip the order (e.g. `"-date"`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobListArgs {
    /// Page number, starting at 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Records per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Sort key, `-` prefix for descending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Filter by job date (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Filter by job type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    /// Filter by assigned vehicle name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign_to: Option<String>,
    /// Filter by job status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Filter by delivery order number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_number: Option<String>,
}

impl OpenFleetClient {
    // ------------------------------------------------------------------
    // Single-job operations
    // ------------------------------------------------------------------

    /// Create `job` remotely and refresh it from the server's copy.
    ///
    /// On success the job is hydrated with server-assigned fields (id,
    /// timestamps) and left clean.
    ///
    /// # Errors
    ///
    /// [`SdkError::MissingField`] when a required field is unset (checked
    /// before any network call), plus the transport/API failure modes.
    pub async fn create_job(&self, job: &mut Job) -> Result<(), SdkError> {
        ensure_required(job)?;
        let payload = Value::Object(job.wire_payload());
        let envelope = check(
            self.send(Method::POST, Endpoints::jobs(), Some(&payload))
                .await?,
        )?;
        match envelope.data {
            Some(data) => job.absorb(&data),
            None => job.reset_dirty(),
        }
        Ok(())
    }

    /// Update an existing job (strict: the job must carry its id).
    ///
    /// # Errors
    ///
    /// [`SdkError::MissingField`] when `id` or a required field is unset,
    /// plus the transport/API failure modes.
    pub async fn update_job(&self, job: &mut Job) -> Result<(), SdkError> {
        ensure_required(job)?;
        let id = job
            .id()
            .ok_or(SdkError::MissingField {
                resource: "job",
                field: "id",
            })?
            .to_string();
        let payload = Value::Object(job.wire_payload());
        let envelope = check(
            self.send(Method::PUT, &Endpoints::job(&id), Some(&payload))
                .await?,
        )?;
        match envelope.data {
            Some(data) => job.absorb(&data),
            None => job.reset_dirty(),
        }
        Ok(())
    }

    /// Upsert `job`: update when its id is known, otherwise look it up by
    /// identity (`do_number` + `date`) and update the match, otherwise
    /// create it.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`create_job`](Self::create_job) /
    /// [`update_job`](Self::update_job).
    pub async fn save_job(&self, job: &mut Job) -> Result<(), SdkError> {
        if job.id().is_some() {
            return self.update_job(job).await;
        }
        let identity = job.identity();
        if !identity.is_empty() {
            let matches = self.search_jobs(&Value::Object(identity)).await?;
            if let Some(id) = matches.first().and_then(Job::id) {
                let id = id.to_string();
                job.set("id", id)?;
                return self.update_job(job).await;
            }
        }
        self.create_job(job).await
    }

    /// Fetch one job by id. `Ok(None)` when the server reports it missing.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn fetch_job(&self, id: &str) -> Result<Option<Job>, SdkError> {
        let envelope = self.send(Method::GET, &Endpoints::job(id), None).await?;
        if envelope.is_not_found() {
            return Ok(None);
        }
        let envelope = check(envelope)?;
        Ok(envelope.data.as_ref().map(Job::from_value))
    }

    /// Search jobs by partial attributes.
    ///
    /// `query` is a JSON object of field/value pairs (an identity mapping,
    /// or any serialized job payload). Returned jobs are clean.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn search_jobs(&self, query: &Value) -> Result<Vec<Job>, SdkError> {
        let envelope = self
            .send(Method::POST, Endpoints::jobs_search(), Some(query))
            .await?;
        if envelope.is_not_found() {
            return Ok(Vec::new());
        }
        let envelope = check(envelope)?;
        Ok(jobs_from_data(envelope.data_array()))
    }

    /// Fill up `job` from the server, by id when known, else by identity
    /// search. Only overwrites the job when a match is found.
    ///
    /// Returns whether a match was found.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn hydrate_job(&self, job: &mut Job) -> Result<bool, SdkError> {
        if let Some(id) = job.id().map(str::to_string) {
            let envelope = self.send(Method::GET, &Endpoints::job(&id), None).await?;
            if envelope.is_not_found() {
                return Ok(false);
            }
            let envelope = check(envelope)?;
            return Ok(match envelope.data {
                Some(data) => {
                    job.absorb(&data);
                    true
                }
                None => false,
            });
        }
        let identity = job.identity();
        if identity.is_empty() {
            return Ok(false);
        }
        let envelope = self
            .send(
                Method::POST,
                Endpoints::jobs_search(),
                Some(&Value::Object(identity)),
            )
            .await?;
        if envelope.is_not_found() {
            return Ok(false);
        }
        let envelope = check(envelope)?;
        match envelope.data_array().and_then(<[Value]>::first) {
            Some(data) => {
                job.absorb(data);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete `job` remotely, hydrating first when its id is unknown.
    ///
    /// Returns whether anything was deleted.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn delete_job(&self, job: &mut Job) -> Result<bool, SdkError> {
        if job.id().is_none() && !self.hydrate_job(job).await? {
            return Ok(false);
        }
        let Some(id) = job.id().map(str::to_string) else {
            return Ok(false);
        };
        self.delete_job_by_id(&id).await
    }

    /// Delete one job by id. Returns whether anything was deleted.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn delete_job_by_id(&self, id: &str) -> Result<bool, SdkError> {
        let envelope = self.send(Method::DELETE, &Endpoints::job(id), None).await?;
        if envelope.is_not_found() {
            return Ok(false);
        }
        check(envelope)?;
        Ok(true)
    }

    /// List jobs matching `args`, one page at a time. Returned jobs are
    /// clean.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn list_jobs(&self, args: &JobListArgs) -> Result<Vec<Job>, SdkError> {
        let envelope = check(self.get_with_query(Endpoints::jobs(), args).await?)?;
        Ok(jobs_from_data(envelope.data_array()))
    }

    // ------------------------------------------------------------------
    // Bulk operations
    // ------------------------------------------------------------------

    /// Create many jobs in [`BULK_CHUNK_SIZE`]-record requests, preserving
    /// order. Each job is refreshed from the server's copy and left clean.
    ///
    /// # Errors
    ///
    /// [`SdkError::MissingField`] when any job misses a required field
    /// (checked for the whole batch before the first request), plus the
    /// transport/API failure modes.
    pub async fn bulk_create_jobs(&self, jobs: &mut [Job]) -> Result<(), SdkError> {
        for job in jobs.iter() {
            ensure_required(job)?;
        }
        for chunk in jobs.chunks_mut(BULK_CHUNK_SIZE) {
            let payload = bulk_create_payload(chunk);
            let envelope = check(
                self.send(Method::POST, Endpoints::jobs_bulk(), Some(&payload))
                    .await?,
            )?;
            if let Some(returned) = envelope.data_array() {
                for (job, data) in chunk.iter_mut().zip(returned) {
                    job.absorb(data);
                }
            }
            for job in chunk.iter_mut() {
                job.reset_dirty();
            }
        }
        Ok(())
    }

    /// Delete many jobs by identity in [`BULK_CHUNK_SIZE`]-record
    /// requests. Jobs without any identity component are skipped.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn bulk_delete_jobs(&self, jobs: &[Job]) -> Result<(), SdkError> {
        for chunk in jobs.chunks(BULK_CHUNK_SIZE) {
            let payload = bulk_identity_payload(chunk);
            if payload.as_array().is_some_and(Vec::is_empty) {
                continue;
            }
            check(
                self.send(Method::DELETE, Endpoints::jobs_bulk(), Some(&payload))
                    .await?,
            )?;
        }
        Ok(())
    }

    /// Fetch many jobs by identity in [`BULK_CHUNK_SIZE`]-record search
    /// requests. Unmatched identities are silently absent from the result.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn bulk_fetch_jobs(&self, jobs: &[Job]) -> Result<Vec<Job>, SdkError> {
        let mut results = Vec::new();
        for chunk in jobs.chunks(BULK_CHUNK_SIZE) {
            let payload = bulk_identity_payload(chunk);
            if payload.as_array().is_some_and(Vec::is_empty) {
                continue;
            }
            let envelope = self
                .send(Method::POST, Endpoints::jobs_search(), Some(&payload))
                .await?;
            if envelope.is_not_found() {
                continue;
            }
            let envelope = check(envelope)?;
            results.extend(jobs_from_data(envelope.data_array()));
        }
        Ok(results)
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Download the proof-of-delivery document for a job.
    ///
    /// Returns the raw file bytes, or `None` when no document exists.
    ///
    /// # Errors
    ///
    /// Transport failure modes.
    pub async fn export_pod_document(
        &self,
        job_id: &str,
        format: DocumentFormat,
    ) -> Result<Option<Vec<u8>>, SdkError> {
        self.download(&Endpoints::job_export(job_id, format)).await
    }
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Fail fast when a required field is unset, before any network call.
fn ensure_required(job: &Job) -> Result<(), SdkError> {
    for &field in JOB_SCHEMA.required {
        let unset = job
            .record()
            .get(field)
            .map_or(true, Value::is_null);
        if unset {
            return Err(SdkError::MissingField {
                resource: "job",
                field,
            });
        }
    }
    Ok(())
}

/// Wire payloads for one bulk-create chunk, in input order.
fn bulk_create_payload(jobs: &[Job]) -> Value {
    Value::Array(
        jobs.iter()
            .map(|job| Value::Object(job.wire_payload()))
            .collect(),
    )
}

/// Identity mappings for one bulk chunk, in input order, skipping jobs
/// without any identity component.
fn bulk_identity_payload(jobs: &[Job]) -> Value {
    Value::Array(
        jobs.iter()
            .map(Job::identity)
            .filter(|identity| !identity.is_empty())
            .map(Value::Object)
            .collect(),
    )
}

/// Parse a `data` array into clean jobs.
fn jobs_from_data(data: Option<&[Value]>) -> Vec<Job> {
    data.unwrap_or_default().iter().map(Job::from_value).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
