//! Note field constants and validation.
//!
//! Colors, statuses, and layers are closed string sets mirrored by CHECK
//! constraints in the schema. Validation runs in handlers before any
//! mutation starts.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a note title in characters.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum length of note and reply content in characters.
pub const MAX_CONTENT_LENGTH: usize = 10_000;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_YELLOW: &str = "yellow";
pub const COLOR_PINK: &str = "pink";
pub const COLOR_BLUE: &str = "blue";
pub const COLOR_GREEN: &str = "green";
pub const COLOR_PURPLE: &str = "purple";
pub const COLOR_ORANGE: &str = "orange";

/// All valid note colors.
pub const VALID_COLORS: &[&str] = &[
    COLOR_YELLOW,
    COLOR_PINK,
    COLOR_BLUE,
    COLOR_GREEN,
    COLOR_PURPLE,
    COLOR_ORANGE,
];

/// Default color applied when a note is created without one.
pub const DEFAULT_COLOR: &str = COLOR_YELLOW;

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// A draft is visible only to its owner.
pub const STATUS_DRAFT: &str = "draft";
/// A published note is visible to everyone (subject to layer).
pub const STATUS_PUBLISHED: &str = "published";

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

/// The default, always-visible partition.
pub const LAYER_SURFACE: &str = "surface";
/// The PIN-gated partition.
pub const LAYER_HIDDEN: &str = "hidden";

/// All valid layer values.
pub const VALID_LAYERS: &[&str] = &[LAYER_SURFACE, LAYER_HIDDEN];

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate that the color is one of the allowed values.
pub fn validate_color(color: &str) -> Result<(), String> {
    if VALID_COLORS.contains(&color) {
        Ok(())
    } else {
        Err(format!(
            "Invalid color '{color}'. Must be one of: {}",
            VALID_COLORS.join(", ")
        ))
    }
}

/// Validate that the layer is one of the allowed values.
pub fn validate_layer(layer: &str) -> Result<(), String> {
    if VALID_LAYERS.contains(&layer) {
        Ok(())
    } else {
        Err(format!(
            "Invalid layer '{layer}'. Must be one of: {}",
            VALID_LAYERS.join(", ")
        ))
    }
}

/// Validate an optional note title: length-limited, empty allowed.
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate note or reply content: must be non-empty and within the limit.
pub fn validate_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Content cannot be empty".to_string());
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(format!(
            "Content exceeds maximum length of {MAX_CONTENT_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Coerce a possibly stale color value back into the allowed set.
///
/// Archived snapshots may carry colors that were valid when written but
/// have since left the enum; restore maps those to [`DEFAULT_COLOR`]
/// instead of failing the whole reconstruction.
pub fn coerce_color(color: &str) -> &str {
    if VALID_COLORS.contains(&color) {
        color
    } else {
        DEFAULT_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_colors_valid() {
        for color in VALID_COLORS {
            assert!(validate_color(color).is_ok());
        }
    }

    #[test]
    fn test_unknown_color_rejected() {
        let err = validate_color("teal").unwrap_err();
        assert!(err.contains("teal"));
        assert!(err.contains("yellow"), "error should list the valid set");
    }

    #[test]
    fn test_title_at_limit_passes() {
        let title = "x".repeat(MAX_TITLE_LENGTH);
        assert!(validate_title(&title).is_ok());
        let over = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(validate_title(&over).is_err());
    }

    #[test]
    fn test_title_limit_counts_chars_not_bytes() {
        // 100 multibyte characters must pass even though the byte length
        // exceeds the limit.
        let title = "ö".repeat(MAX_TITLE_LENGTH);
        assert!(validate_title(&title).is_ok());
    }

    #[test]
    fn test_empty_content_rejected() {
        assert!(validate_content("").is_err());
        assert!(validate_content("   \n").is_err());
        assert!(validate_content("hello").is_ok());
    }

    #[test]
    fn test_layer_validation() {
        assert!(validate_layer(LAYER_SURFACE).is_ok());
        assert!(validate_layer(LAYER_HIDDEN).is_ok());
        assert!(validate_layer("basement").is_err());
    }

    #[test]
    fn test_coerce_color_keeps_valid_and_maps_stale() {
        assert_eq!(coerce_color("pink"), "pink");
        assert_eq!(coerce_color("chartreuse"), DEFAULT_COLOR);
    }
}
