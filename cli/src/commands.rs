//! Line-oriented request processing.
//!
//! Each input line is one JSON command, tagged by `action`:
//!
//! ```text
//! {"action":"create","body":{"airportCode":"IAD","aircraftType":"VIP","aircraftSize":"LARGE"}}
//! {"action":"get","aircraftId":"..."}
//! {"action":"dequeue","airportCode":"IAD"}
//! ```
//!
//! Each command produces exactly one gateway response, written as one JSON
//! line. Blank lines are skipped.

use crate::error::CliError;
use atc_dispatch_core::handlers::types::SC_BAD_REQUEST;
use atc_dispatch_core::handlers::{AIRCRAFT_ID_PARAM, AIRPORT_CODE_PARAM};
use atc_dispatch_core::{
    create_aircraft_handler, dequeue_aircraft_handler, get_aircraft_handler, DispatchOrchestrator, GatewayRequest,
    GatewayResponse,
};
use serde::Deserialize;
use serde_json::Value;
use std::io::{BufRead, Write};

/// One input command
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Command {
    Create {
        /// Create payload, either an object or its JSON text
        #[serde(default)]
        body: Value,
    },
    Get {
        #[serde(rename = "aircraftId", default)]
        aircraft_id: String,
    },
    Dequeue {
        #[serde(rename = "airportCode", default)]
        airport_code: String,
    },
}

impl Command {
    /// Gateway event equivalent to this command
    pub fn to_request(&self) -> GatewayRequest {
        match self {
            Command::Create { body } => GatewayRequest {
                body: match body {
                    Value::Null => None,
                    Value::String(text) => Some(text.clone()),
                    other => Some(other.to_string()),
                },
                ..GatewayRequest::default()
            },
            Command::Get { aircraft_id } => GatewayRequest::with_path_parameter(AIRCRAFT_ID_PARAM, aircraft_id.clone()),
            Command::Dequeue { airport_code } => {
                GatewayRequest::with_path_parameter(AIRPORT_CODE_PARAM, airport_code.clone())
            }
        }
    }
}

/// Route one raw line to its handler
pub fn handle_line(orchestrator: &DispatchOrchestrator, line: &str) -> GatewayResponse {
    let command = match serde_json::from_str::<Command>(line) {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable command");
            return GatewayResponse::error(SC_BAD_REQUEST, format!("Invalid command: {}", e));
        }
    };

    let request = command.to_request();
    match command {
        Command::Create { .. } => create_aircraft_handler(orchestrator, &request),
        Command::Get { .. } => get_aircraft_handler(orchestrator, &request),
        Command::Dequeue { .. } => dequeue_aircraft_handler(orchestrator, &request),
    }
}

/// Process every line of `input`, writing one response line per command
///
/// # Returns
///
/// Number of commands processed
pub fn run<R: BufRead, W: Write>(orchestrator: &DispatchOrchestrator, input: R, mut output: W) -> Result<usize, CliError> {
    let mut processed = 0;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(orchestrator, &line);
        tracing::debug!(status_code = response.status_code, "command handled");

        serde_json::to_writer(&mut output, &response).map_err(std::io::Error::from)?;
        writeln!(output)?;
        processed += 1;
    }

    output.flush()?;
    Ok(processed)
}
