//! Create / get / dequeue request handlers
//!
//! Each handler turns one [`GatewayRequest`] into exactly one
//! [`GatewayResponse`]; errors never escape as `Err`.
//!
//! | Outcome                                   | Status |
//! |-------------------------------------------|--------|
//! | created                                   | 201    |
//! | fetched / dequeued                        | 200    |
//! | missing body, bad JSON, missing field     | 400    |
//! | unknown aircraft, empty airport queue     | 404    |
//! | missing table, id exhaustion, store fault | 500    |

use super::types::{
    GatewayRequest, GatewayResponse, SC_BAD_REQUEST, SC_CREATED, SC_INTERNAL_SERVER_ERROR, SC_NOT_FOUND, SC_OK,
};
use crate::models::aircraft::{Aircraft, CreateAircraftRequest};
use crate::orchestrator::{DispatchError, DispatchOrchestrator};

pub const AIRCRAFT_ID_PARAM: &str = "aircraftId";
pub const AIRPORT_CODE_PARAM: &str = "airportCode";

const BODY_WAS_NULL: &str = "Body was null";
const REQUEST_WAS_NULL: &str = "Request was null";
const AIRCRAFT_ID_NOT_SET: &str = "Aircraft with given aircraftId is NOT_FOUND";
const AIRPORT_CODE_NOT_SET: &str = "Airport with given code is NOT_FOUND";

/// `POST /aircraft`
pub fn create_aircraft_handler(orchestrator: &DispatchOrchestrator, request: &GatewayRequest) -> GatewayResponse {
    let Some(body) = request.body.as_deref() else {
        return GatewayResponse::error(SC_BAD_REQUEST, BODY_WAS_NULL);
    };

    let create = match serde_json::from_str::<Option<CreateAircraftRequest>>(body) {
        Ok(Some(create)) => create,
        Ok(None) => return GatewayResponse::error(SC_BAD_REQUEST, REQUEST_WAS_NULL),
        Err(e) => {
            return GatewayResponse::error(SC_BAD_REQUEST, format!("Invalid JSON in body: {}", e));
        }
    };

    match orchestrator.create_aircraft(&create) {
        Ok(aircraft) => aircraft_response(SC_CREATED, &aircraft),
        Err(e) => error_response(e),
    }
}

/// `GET /aircraft/{aircraftId}`
pub fn get_aircraft_handler(orchestrator: &DispatchOrchestrator, request: &GatewayRequest) -> GatewayResponse {
    let Some(aircraft_id) = request.path_parameter(AIRCRAFT_ID_PARAM) else {
        return GatewayResponse::error(SC_BAD_REQUEST, AIRCRAFT_ID_NOT_SET);
    };

    match orchestrator.get_aircraft(aircraft_id) {
        Ok(aircraft) => aircraft_response(SC_OK, &aircraft),
        Err(e) => error_response(e),
    }
}

/// `DELETE /airport/{airportCode}/aircraft`
pub fn dequeue_aircraft_handler(orchestrator: &DispatchOrchestrator, request: &GatewayRequest) -> GatewayResponse {
    let Some(airport_code) = request.path_parameter(AIRPORT_CODE_PARAM) else {
        return GatewayResponse::error(SC_BAD_REQUEST, AIRPORT_CODE_NOT_SET);
    };

    match orchestrator.dequeue_aircraft(airport_code) {
        Ok(aircraft) => aircraft_response(SC_OK, &aircraft),
        Err(e) => error_response(e),
    }
}

fn aircraft_response(status_code: u16, aircraft: &Aircraft) -> GatewayResponse {
    match serde_json::to_string(aircraft) {
        Ok(body) => GatewayResponse::json(status_code, body),
        Err(e) => GatewayResponse::error(SC_INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn error_response(error: DispatchError) -> GatewayResponse {
    let status_code = match &error {
        DispatchError::Validation(_) => SC_BAD_REQUEST,
        DispatchError::NotFound(_) => SC_NOT_FOUND,
        DispatchError::ResourceMissing(_) | DispatchError::CreateFailed { .. } | DispatchError::Store(_) => {
            tracing::error!(error = %error, "request failed");
            SC_INTERNAL_SERVER_ERROR
        }
    };
    GatewayResponse::error(status_code, error.to_string())
}
