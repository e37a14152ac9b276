use crate::common::error::StatusLineError;

/// Result alias used across the crate.
///
/// # Examples
///
/// ```
/// use cc_status_line::common::result::StatusLineResult;
/// use cc_status_line::common::error::StatusLineError;
///
/// fn example_function() -> StatusLineResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> StatusLineResult<()> {
///     Err(StatusLineError::config_error("Something went wrong"))
/// }
/// ```
pub type StatusLineResult<T> = Result<T, StatusLineError>;

/// Error conversion helpers for foreign `Result` types.
pub trait ResultExt<T, E> {
    /// Convert an I/O flavoured error into a file system error carrying the path.
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> StatusLineResult<T>
    where
        E: Into<std::io::Error>;

    /// Convert any error into a configuration error.
    fn with_config_error(self, message: impl Into<String>) -> StatusLineResult<T>
    where
        E: std::error::Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> StatusLineResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| StatusLineError::filesystem_error_with_source(message, path, e.into()))
    }

    fn with_config_error(self, message: impl Into<String>) -> StatusLineResult<T>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.map_err(|e| StatusLineError::config_error_with_source(message, e))
    }
}

/// Helpers for results that are allowed to degrade.
pub trait StatusLineResultExt<T> {
    /// Convert to `Option`, logging the error at warn level.
    fn to_option_logged(self) -> Option<T>;

    /// Fall back to `T::default()`, logging the error at warn level.
    fn unwrap_or_default_logged(self) -> T
    where
        T: Default;
}

impl<T> StatusLineResultExt<T> for StatusLineResult<T> {
    fn to_option_logged(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    fn unwrap_or_default_logged(self) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("{}, using default", e);
                T::default()
            }
        }
    }
}
