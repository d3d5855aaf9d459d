//! Unit tests for error handling

use super::*;
use std::io;

#[cfg(test)]
mod stats_error_tests {
    use super::*;

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = StatsError::from(json_error);

        match error {
            StatsError::Json(_) => (),
            _ => panic!("Expected Json error variant"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = StatsError::from(io_error);

        match error {
            StatsError::Io(_) => (),
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_database_error_conversion() {
        let db_error = rusqlite::Error::InvalidColumnType(
            0,
            "test_column".to_string(),
            rusqlite::types::Type::Null,
        );
        let error = StatsError::from(db_error);

        match error {
            StatsError::Database(_) => (),
            _ => panic!("Expected Database error variant"),
        }
    }

    #[test]
    fn test_validation_error_names_field() {
        let error = StatsError::validation("player_id");
        let error_string = error.to_string();
        assert!(error_string.contains("Validation failed"));
        assert!(error_string.contains("player_id"));
        assert!(!error.is_transient());
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_configuration_error_is_fatal() {
        let error = StatsError::configuration("missing minutes_played");
        assert!(error.is_fatal());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("missing minutes_played"));
    }

    #[test]
    fn test_transient_store_error_is_retryable() {
        let error = StatsError::TransientStore {
            message: "database is locked".to_string(),
        };
        assert!(error.is_transient());
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_source_not_found_is_not_fatal() {
        let error = StatsError::SourceNotFound {
            path: "/data/EPL_23_24.csv".to_string(),
        };
        assert!(!error.is_fatal());
        assert!(error.to_string().contains("EPL_23_24.csv"));
    }

    #[test]
    fn test_classify_busy_as_transient() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".to_string()),
        );
        assert!(classify_db_error(busy).is_transient());

        let other = rusqlite::Error::QueryReturnedNoRows;
        match classify_db_error(other) {
            StatsError::Database(_) => (),
            _ => panic!("Expected Database error variant"),
        }
    }

    #[test]
    fn test_error_source_chain() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = StatsError::from(io_error);

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_system_time_error_conversion() {
        use std::time::{Duration, SystemTime, UNIX_EPOCH};

        let future_time = SystemTime::now() + Duration::from_secs(100);
        let system_time_error = UNIX_EPOCH.duration_since(future_time).unwrap_err();
        let error = StatsError::from(system_time_error);

        match error {
            StatsError::SystemTime(_) => (),
            _ => panic!("Expected SystemTime error variant"),
        }
    }

    #[test]
    fn test_result_type_alias_error() {
        fn test_function() -> Result<String> {
            Err(StatsError::InvalidSeason {
                season: "2023".to_string(),
            })
        }

        match test_function().unwrap_err() {
            StatsError::InvalidSeason { season } => assert_eq!(season, "2023"),
            _ => panic!("Expected InvalidSeason error"),
        }
    }
}
