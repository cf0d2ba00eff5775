//! Request/response records exchanged with the simulation.

use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::parameters::{ForestType, Season, SimulationParameters};
use crate::records::{FluxRecord, TemperatureRecord};

/// Body of the simulation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub season: Season,
    pub forest_type: ForestType,
}

impl SimulationRequest {
    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Raw response payload. Every block is optional on the wire because an error
/// reply carries only `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationResponse {
    #[serde(default)]
    pub parameters: Option<SimulationParameters>,
    #[serde(default)]
    pub temperatures: TemperatureRecord,
    #[serde(default)]
    pub fluxes: FluxRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A successful, complete simulation result.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioData {
    pub parameters: SimulationParameters,
    pub temperatures: TemperatureRecord,
    pub fluxes: FluxRecord,
}

impl SimulationResponse {
    /// Convert a decoded payload into a result. An `error` field is a failure
    /// even when the transport reported success.
    pub fn into_data(self) -> Result<ScenarioData, ScenarioError> {
        if let Some(message) = self.error {
            return Err(ScenarioError::Application(message));
        }
        let parameters = self
            .parameters
            .ok_or_else(|| ScenarioError::Decode("response has no `parameters` block".into()))?;
        Ok(ScenarioData {
            parameters,
            temperatures: self.temperatures,
            fluxes: self.fluxes,
        })
    }
}

impl From<ScenarioData> for SimulationResponse {
    fn from(data: ScenarioData) -> Self {
        Self {
            parameters: Some(data.parameters),
            temperatures: data.temperatures,
            fluxes: data.fluxes,
            error: None,
        }
    }
}

/// Interpret an HTTP reply from the simulation.
///
/// A body with an `error` field wins over the status code so the backend's
/// own message reaches the user; otherwise a non-2xx status is a failure.
pub fn decode_reply(status: u16, body: &str) -> Result<ScenarioData, ScenarioError> {
    let parsed = serde_json::from_str::<SimulationResponse>(body);
    let success = (200..300).contains(&status);

    match (parsed, success) {
        (Ok(response), _) if response.error.is_some() => response.into_data(),
        (Ok(response), true) => response.into_data(),
        (Err(e), true) => Err(e.into()),
        (_, false) => Err(ScenarioError::Status {
            code: status,
            body: body.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Component;

    const OK_BODY: &str = r#"{
        "parameters": {"season": "summer", "forest_type": "coniferous", "A_can": 0.7, "H_canopy": 15.0},
        "temperatures": {"canopy": 305.0, "trunk": 300.0, "soil": 299.0},
        "fluxes": {"canopy": {"conv_atm": -40.0, "LW_atm": 20.0, "net": -20.0}}
    }"#;

    #[test]
    fn test_request_serializes_wire_names() {
        let req = SimulationRequest {
            season: Season::Winter,
            forest_type: ForestType::None,
        };
        assert_eq!(
            req.to_json().unwrap(),
            r#"{"season":"winter","forest_type":"none"}"#
        );
    }

    #[test]
    fn test_decode_success() {
        let data = decode_reply(200, OK_BODY).unwrap();
        assert_eq!(data.parameters.forest_type, ForestType::Coniferous);
        assert_eq!(data.temperatures.get(Component::Canopy), Some(305.0));
        assert_eq!(data.fluxes.get(Component::Canopy, "conv_atm"), Some(-40.0));
    }

    #[test]
    fn test_error_field_fails_even_with_ok_status() {
        let err = decode_reply(200, r#"{"error": "solver diverged"}"#).unwrap_err();
        assert!(matches!(err, ScenarioError::Application(ref m) if m == "solver diverged"));
    }

    #[test]
    fn test_error_field_with_500_reports_backend_message() {
        let body = r#"{"error": "No successful simulation runs converged. Try again."}"#;
        let err = decode_reply(500, body).unwrap_err();
        assert!(matches!(err, ScenarioError::Application(_)));
    }

    #[test]
    fn test_non_success_status_without_error_field() {
        let err = decode_reply(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ScenarioError::Status { code: 502, .. }));
    }

    #[test]
    fn test_success_status_with_garbage_is_decode_error() {
        let err = decode_reply(200, "not json").unwrap_err();
        assert!(matches!(err, ScenarioError::Decode(_)));
    }

    #[test]
    fn test_missing_parameters_is_decode_error() {
        let err = decode_reply(200, r#"{"temperatures": {}, "fluxes": {}}"#).unwrap_err();
        assert!(matches!(err, ScenarioError::Decode(_)));
    }

    #[test]
    fn test_response_round_trips_through_data() {
        let data = decode_reply(200, OK_BODY).unwrap();
        let json = serde_json::to_string(&SimulationResponse::from(data.clone())).unwrap();
        assert_eq!(decode_reply(200, &json).unwrap(), data);
    }
}
