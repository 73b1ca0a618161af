//! Result type alias for ShiftSync

use super::errors::ShiftSyncError;

/// Result type alias for ShiftSync operations
///
/// # Examples
///
/// ```
/// use shiftsync::domain::result::Result;
/// use shiftsync::domain::errors::ShiftSyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ShiftSyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ShiftSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
