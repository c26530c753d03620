//! Request handlers - gateway events in, gateway responses out

pub mod aircraft;
pub mod types;

pub use aircraft::{
    create_aircraft_handler, dequeue_aircraft_handler, get_aircraft_handler, AIRCRAFT_ID_PARAM, AIRPORT_CODE_PARAM,
};
pub use types::{ErrorMessage, GatewayRequest, GatewayResponse};
