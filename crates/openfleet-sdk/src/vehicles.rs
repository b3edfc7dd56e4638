//! Vehicle operations.
//!
//! Vehicle create/update endpoints accept only the writable field subset
//! (name, staff id, limits, groups, zones); everything else on the resource
//! is server-maintained telemetry. Lookup falls back from the
//! organisation-scoped `id` to `name` and then `staff_id`, because callers
//! frequently hold only the human-readable name.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use openfleet_models::{Vehicle, VEHICLE_CREATE_FIELDS};

use crate::client::{check, OpenFleetClient};
use crate::endpoints::Endpoints;
use crate::error::SdkError;

/// Query parameters for [`OpenFleetClient::list_vehicles`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct VehicleListArgs {
    /// Page number, starting at 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Records per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Sort key, `-` prefix for descending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Filter by vehicle name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Filter by the driver's staff id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    /// Filter by service zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Filter by vehicle group id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl OpenFleetClient {
    /// Create `vehicle` remotely (strict insert) and refresh it from the
    /// server's copy.
    ///
    /// Only the writable field subset is sent.
    ///
    /// # Errors
    ///
    /// [`SdkError::MissingField`] when `name` or `staff_id` is unset
    /// (checked before any network call), [`SdkError::Validation`] when the
    /// server rejects a field, plus the transport failure modes.
    pub async fn create_vehicle(&self, vehicle: &mut Vehicle) -> Result<(), SdkError> {
        ensure_creatable(vehicle)?;
        let payload = Value::Object(vehicle.writable_payload());
        let envelope = check(
            self.send(Method::POST, Endpoints::vehicles(), Some(&payload))
                .await?,
        )?;
        match envelope.data {
            Some(data) => vehicle.absorb(&data),
            None => vehicle.reset_dirty(),
        }
        Ok(())
    }

    /// Update an existing vehicle (strict: hydrates first when the id is
    /// unknown, and fails if no match is found).
    ///
    /// Only the writable field subset is sent.
    ///
    /// # Errors
    ///
    /// [`SdkError::MissingField`] when the vehicle cannot be identified,
    /// plus the transport/API failure modes.
    pub async fn update_vehicle(&self, vehicle: &mut Vehicle) -> Result<(), SdkError> {
        if vehicle.id().is_none() {
            // Keep the caller's pending writes; look up the id separately.
            let mut probe = vehicle.clone();
            if self.hydrate_vehicle(&mut probe).await? {
                if let Some(id) = probe.id() {
                    let id = id.to_string();
                    vehicle.set("id", id)?;
                }
            }
        }
        let id = vehicle
            .id()
            .ok_or(SdkError::MissingField {
                resource: "vehicle",
                field: "id",
            })?
            .to_string();
        let payload = Value::Object(vehicle.writable_payload());
        let envelope = check(
            self.send(Method::PUT, &Endpoints::vehicle(&id), Some(&payload))
                .await?,
        )?;
        match envelope.data {
            Some(data) => vehicle.absorb(&data),
            None => vehicle.reset_dirty(),
        }
        Ok(())
    }

    /// Upsert `vehicle`: update when it can be found remotely, otherwise
    /// create it.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`create_vehicle`](Self::create_vehicle) /
    /// [`update_vehicle`](Self::update_vehicle).
    pub async fn save_vehicle(&self, vehicle: &mut Vehicle) -> Result<(), SdkError> {
        if vehicle.id().is_some() {
            return self.update_vehicle(vehicle).await;
        }
        let mut probe = vehicle.clone();
        if self.hydrate_vehicle(&mut probe).await? {
            if let Some(id) = probe.id() {
                let id = id.to_string();
                vehicle.set("id", id)?;
            }
            return self.update_vehicle(vehicle).await;
        }
        self.create_vehicle(vehicle).await
    }

    /// Fetch one vehicle by id. `Ok(None)` when the server reports it
    /// missing.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn fetch_vehicle(&self, id: &str) -> Result<Option<Vehicle>, SdkError> {
        let envelope = self
            .send(Method::GET, &Endpoints::vehicle(id), None)
            .await?;
        if envelope.is_not_found() {
            return Ok(None);
        }
        let envelope = check(envelope)?;
        Ok(envelope.data.as_ref().map(Vehicle::from_value))
    }

    /// Fill up `vehicle` from the server.
    ///
    /// Looks up by `id` when known; otherwise searches the vehicle list by
    /// `name`, then by `staff_id`. Only overwrites the vehicle when an
    /// exact match is found.
    ///
    /// Returns whether a match was found.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn hydrate_vehicle(&self, vehicle: &mut Vehicle) -> Result<bool, SdkError> {
        if let Some(id) = vehicle.id().map(str::to_string) {
            let envelope = self
                .send(Method::GET, &Endpoints::vehicle(&id), None)
                .await?;
            if envelope.is_not_found() {
                return Ok(false);
            }
            let envelope = check(envelope)?;
            return Ok(match envelope.data {
                Some(data) => {
                    vehicle.absorb(&data);
                    true
                }
                None => false,
            });
        }
        for key in ["name", "staff_id"] {
            let Some(wanted) = vehicle.get(key)?.as_str().map(str::to_string) else {
                continue;
            };
            let args = match key {
                "name" => VehicleListArgs {
                    name: Some(wanted.clone()),
                    ..VehicleListArgs::default()
                },
                _ => VehicleListArgs {
                    staff_id: Some(wanted.clone()),
                    ..VehicleListArgs::default()
                },
            };
            let candidates = self.list_vehicles(&args).await?;
            let matched = candidates.into_iter().find(|candidate| {
                candidate
                    .get(key)
                    .ok()
                    .and_then(Value::as_str)
                    .is_some_and(|v| v == wanted)
            });
            if let Some(found) = matched {
                vehicle.absorb(&Value::Object(found.wire_payload()));
                return Ok(true);
            }
            return Ok(false);
        }
        Ok(false)
    }

    /// Delete `vehicle` remotely, hydrating first when its id is unknown.
    ///
    /// Returns whether anything was deleted.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn delete_vehicle(&self, vehicle: &mut Vehicle) -> Result<bool, SdkError> {
        if vehicle.id().is_none() && !self.hydrate_vehicle(vehicle).await? {
            return Ok(false);
        }
        let Some(id) = vehicle.id().map(str::to_string) else {
            return Ok(false);
        };
        let envelope = self
            .send(Method::DELETE, &Endpoints::vehicle(&id), None)
            .await?;
        if envelope.is_not_found() {
            return Ok(false);
        }
        check(envelope)?;
        Ok(true)
    }

    /// List vehicles matching `args`. Returned vehicles are clean.
    ///
    /// # Errors
    ///
    /// Transport/API failure modes.
    pub async fn list_vehicles(
        &self,
        args: &VehicleListArgs,
    ) -> Result<Vec<Vehicle>, SdkError> {
        let envelope = check(self.get_with_query(Endpoints::vehicles(), args).await?)?;
        Ok(envelope
            .data_array()
            .unwrap_or_default()
            .iter()
            .map(Vehicle::from_value)
            .collect())
    }
}

/// Fail fast when a create-mandatory field is unset.
fn ensure_creatable(vehicle: &Vehicle) -> Result<(), SdkError> {
    for &field in VEHICLE_CREATE_FIELDS {
        let unset = vehicle
            .record()
            .get(field)
            .map_or(true, Value::is_null);
        if unset {
            return Err(SdkError::MissingField {
                resource: "vehicle",
                field,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ensure_creatable_requires_name_and_staff_id() {
        let mut vehicle = Vehicle::new();
        vehicle.set_name("Truck 7");
        match ensure_creatable(&vehicle) {
            Err(SdkError::MissingField { resource, field }) => {
                assert_eq!(resource, "vehicle");
                assert_eq!(field, "staff_id");
            }
            other => panic!("unexpected: {other:?}"),
        }
        vehicle.set_staff_id("drv-1");
        assert!(ensure_creatable(&vehicle).is_ok());
    }

    #[test]
    fn list_args_omit_unset_filters() {
        let args = VehicleListArgs {
            name: Some("Truck 7".into()),
            limit: Some(50),
            ..VehicleListArgs::default()
        };
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({"name": "Truck 7", "limit": 50})
        );
    }
}
