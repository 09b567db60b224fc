use filterdeck_core::FilterError;
use std::io::ErrorKind;
use std::path::Path;

fn bullet_list(errors: &[String]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, error)| format!("  {}. {}", i + 1, error))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Map file loading errors to user-friendly messages
/// Returns (title, message, details)
pub fn map_file_load_error(error: &FilterError, path: &Path) -> (String, String, String) {
    match error {
        FilterError::Validation(errors) => (
            "Validation Error".to_string(),
            "The filter file has validation errors.".to_string(),
            bullet_list(errors),
        ),
        FilterError::Malformed(err) => (
            "Invalid JSON".to_string(),
            "The filter file is not a valid filter map.".to_string(),
            format!("{} (line {}, column {})", err, err.line(), err.column()),
        ),
        FilterError::Io(err) if err.kind() == ErrorKind::NotFound => (
            "File Not Found".to_string(),
            "The file could not be found.".to_string(),
            format!(
                "Path: {}\n\nPlease verify the file exists and you have permission to read it.",
                path.display()
            ),
        ),
        FilterError::Io(err) if err.kind() == ErrorKind::PermissionDenied => (
            "Permission Denied".to_string(),
            "Permission denied.".to_string(),
            format!("You don't have permission to read this file:\n{}", path.display()),
        ),
        other => (
            "Error Loading File".to_string(),
            "Failed to load filter file.".to_string(),
            other.to_string(),
        ),
    }
}

/// Map file saving errors to user-friendly messages
/// Returns (title, message, details)
pub fn map_file_save_error(error: &FilterError, path: Option<&Path>) -> (String, String, String) {
    match error {
        FilterError::InvalidConfiguration { .. } if path.is_none() => (
            "No File Path".to_string(),
            "No file path is set for these filters.".to_string(),
            "Use 'save <path>' or --output to choose a location.".to_string(),
        ),
        FilterError::Io(err) if err.kind() == ErrorKind::PermissionDenied => {
            let details = if let Some(p) = path {
                format!("You don't have permission to write to:\n{}", p.display())
            } else {
                "You don't have permission to write to this file.".to_string()
            };
            ("Permission Denied".to_string(), "Permission denied.".to_string(), details)
        }
        FilterError::Io(err) if err.to_string().contains("No space left") => (
            "Disk Full".to_string(),
            "Disk full.".to_string(),
            "There is no space left on the device to save the file.".to_string(),
        ),
        other => (
            "Error Saving File".to_string(),
            "Failed to save filter file.".to_string(),
            other.to_string(),
        ),
    }
}

/// Map revert errors to user-friendly messages
/// Returns (title, message, details)
pub fn map_revert_error(error: &FilterError, path: &Path) -> (String, String, String) {
    match error {
        FilterError::Io(err) if err.kind() == ErrorKind::NotFound => (
            "File Not Found".to_string(),
            "The file could not be found.".to_string(),
            format!("Path: {}\n\nThe file may have been moved or deleted.", path.display()),
        ),
        FilterError::Io(_) | FilterError::Malformed(_) | FilterError::Validation(_) => {
            let (_, message, details) = map_file_load_error(error, path);
            ("Error Reverting File".to_string(), message, details)
        }
        other => (
            "Error Reverting File".to_string(),
            "Failed to reload filter file.".to_string(),
            other.to_string(),
        ),
    }
}

/// Map errors raised while running a command
/// Returns (title, message, details)
pub fn map_command_error(error: &anyhow::Error) -> (String, String, String) {
    let Some(filter_error) = error.downcast_ref::<FilterError>() else {
        return (
            "Error".to_string(),
            "The command failed.".to_string(),
            format!("{:#}", error),
        );
    };

    match filter_error {
        FilterError::UnknownGroup { group_id } => (
            "Unknown Filter Group".to_string(),
            format!("There is no filter group named '{}'.", group_id),
            "Run 'show' to list the loaded groups.".to_string(),
        ),
        FilterError::IndexOutOfRange { group_id, index, len } => (
            "No Such Option".to_string(),
            format!("Group '{}' has no option at position {}.", group_id, index),
            format!("Positions run from 0 to {}.", len.saturating_sub(1)),
        ),
        FilterError::UnknownItem { .. } | FilterError::UnknownGroupLabel { .. } => (
            "No Such Option".to_string(),
            filter_error.to_string(),
            "Run 'view <group>' to list the available options.".to_string(),
        ),
        FilterError::Schema(errors) => (
            "Invalid Options".to_string(),
            "The engine options do not match the options schema.".to_string(),
            bullet_list(errors),
        ),
        FilterError::Validation(errors) => (
            "Validation Error".to_string(),
            "The filters have validation errors.".to_string(),
            bullet_list(errors),
        ),
        _ => (
            "Error".to_string(),
            "The command failed.".to_string(),
            format!("{:#}", error),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_load_error_titles() {
        let path = Path::new("missing.json");

        let not_found = FilterError::Io(io::Error::new(ErrorKind::NotFound, "gone"));
        assert_eq!(map_file_load_error(&not_found, path).0, "File Not Found");

        let invalid = FilterError::Validation(vec!["a".to_string(), "b".to_string()]);
        let (title, _, details) = map_file_load_error(&invalid, path);
        assert_eq!(title, "Validation Error");
        assert_eq!(details, "  1. a\n  2. b");

        let malformed = FilterError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert_eq!(map_file_load_error(&malformed, path).0, "Invalid JSON");
    }

    #[test]
    fn test_save_error_without_path() {
        let error = FilterError::InvalidConfiguration {
            message: "No file path set".to_string(),
        };
        assert_eq!(map_file_save_error(&error, None).0, "No File Path");
    }

    #[test]
    fn test_revert_error_keeps_load_details() {
        let error = FilterError::Validation(vec!["bad count".to_string()]);
        let (title, _, details) = map_revert_error(&error, Path::new("f.json"));
        assert_eq!(title, "Error Reverting File");
        assert!(details.contains("bad count"));
    }

    #[test]
    fn test_command_errors() {
        let error = anyhow::Error::new(FilterError::IndexOutOfRange {
            group_id: "Country".to_string(),
            index: 9,
            len: 2,
        });
        let (title, message, details) = map_command_error(&error);
        assert_eq!(title, "No Such Option");
        assert!(message.contains("position 9"));
        assert_eq!(details, "Positions run from 0 to 1.");

        let plain = anyhow::anyhow!("boom");
        assert_eq!(map_command_error(&plain).2, "boom");
    }
}
