use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesAnalyticsError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Catalog request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid catalog response: {0}")]
    CatalogFormat(#[from] serde_json::Error),

    #[error("Invalid catalog URL '{0}'")]
    InvalidCatalogUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_file_read_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = SalesAnalyticsError::FileReadError(io_error);

        assert!(error.to_string().contains("Failed to read file"));
        assert!(error.source().is_some());

        let error_from: SalesAnalyticsError = io::Error::new(io::ErrorKind::NotFound, "file not found").into();
        assert!(matches!(error_from, SalesAnalyticsError::FileReadError(_)));
    }

    #[test]
    fn test_csv_error() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let csv_error = csv::Error::from(io_error);

        let error: SalesAnalyticsError = csv_error.into();
        assert!(error.to_string().contains("CSV error"));
        assert!(error.source().is_some());
        assert!(matches!(error, SalesAnalyticsError::CsvError(_)));
    }

    #[test]
    fn test_catalog_format_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();

        let error: SalesAnalyticsError = json_error.into();
        assert!(error.to_string().contains("Invalid catalog response"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_invalid_catalog_url() {
        let error = SalesAnalyticsError::InvalidCatalogUrl("not a url".to_string());

        assert_eq!(error.to_string(), "Invalid catalog URL 'not a url'");
        assert!(error.source().is_none());
    }
}
