//! Dispatch error taxonomy
//!
//! | Variant           | Meaning                                   | Fault  |
//! |-------------------|-------------------------------------------|--------|
//! | `Validation`      | bad or missing input, nothing written     | client |
//! | `NotFound`        | aircraft / airport queue / group absent   | client |
//! | `ResourceMissing` | backing table absent, never retried       | server |
//! | `CreateFailed`    | id regeneration budget exhausted          | server |
//! | `Store`           | any other store failure                   | server |
//!
//! `ConditionFailed` never escapes the store layer on its own: it is either
//! consumed by the id retry loop or turned into an absent result.

use crate::store::{InsertError, StoreError};
use thiserror::Error;

/// Errors returned by dispatch operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ResourceMissing(String),

    #[error("Unable to generate aircraft after {attempts} tries")]
    CreateFailed { attempts: u32 },

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl DispatchError {
    /// Whether the caller is at fault (maps to a 4xx response)
    pub fn is_client_fault(&self) -> bool {
        matches!(self, DispatchError::Validation(_) | DispatchError::NotFound(_))
    }
}

impl From<StoreError> for DispatchError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::ResourceMissing { .. } => DispatchError::ResourceMissing(error.to_string()),
            other => DispatchError::Store(other),
        }
    }
}

impl From<InsertError> for DispatchError {
    fn from(error: InsertError) -> Self {
        match error {
            InsertError::CreateFailed { attempts } => DispatchError::CreateFailed { attempts },
            InsertError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_missing_is_classified() {
        let err: DispatchError = StoreError::ResourceMissing {
            table: "AircraftTable".to_string(),
        }
        .into();

        assert_eq!(
            err,
            DispatchError::ResourceMissing("Table AircraftTable does not exist".to_string())
        );
        assert!(!err.is_client_fault());
    }

    #[test]
    fn test_fault_classes() {
        assert!(DispatchError::Validation("x".to_string()).is_client_fault());
        assert!(DispatchError::NotFound("x".to_string()).is_client_fault());
        assert!(!DispatchError::CreateFailed { attempts: 2 }.is_client_fault());
        assert!(!DispatchError::Store(StoreError::Unavailable("timeout".to_string())).is_client_fault());
    }

    #[test]
    fn test_create_failed_message() {
        assert_eq!(
            DispatchError::CreateFailed { attempts: 2 }.to_string(),
            "Unable to generate aircraft after 2 tries"
        );
    }

    #[test]
    fn test_insert_errors_map_to_dispatch_errors() {
        assert_eq!(
            DispatchError::from(InsertError::CreateFailed { attempts: 2 }),
            DispatchError::CreateFailed { attempts: 2 }
        );
        assert_eq!(
            DispatchError::from(InsertError::Store(StoreError::ResourceMissing {
                table: "AircraftTable".to_string()
            })),
            DispatchError::ResourceMissing("Table AircraftTable does not exist".to_string())
        );
    }
}
