//! Fixed color swatches shared by notes and lists.

use super::entity::ValidationError;

/// Palette swatch offered by the note/list color pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swatch {
    Yellow,
    Blue,
    Pink,
    Orange,
    Green,
    Purple,
    Red,
}

impl Swatch {
    pub const ALL: [Swatch; 7] = [
        Self::Yellow,
        Self::Blue,
        Self::Pink,
        Self::Orange,
        Self::Green,
        Self::Purple,
        Self::Red,
    ];

    /// Canonical upper-case hex value as stored.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Yellow => "#FFEB3B",
            Self::Blue => "#2196F3",
            Self::Pink => "#FF1493",
            Self::Orange => "#FF9800",
            Self::Green => "#4CAF50",
            Self::Purple => "#9C27B0",
            Self::Red => "#FF5252",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Yellow => "Yellow",
            Self::Blue => "Blue",
            Self::Pink => "Pink",
            Self::Orange => "Orange",
            Self::Green => "Green",
            Self::Purple => "Purple",
            Self::Red => "Red",
        }
    }

    pub fn from_hex(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|swatch| swatch.hex().eq_ignore_ascii_case(value))
    }
}

/// Human-readable swatch name; anything off-palette reads as `Custom`.
pub fn color_name(hex: &str) -> &'static str {
    Swatch::from_hex(hex).map_or("Custom", Swatch::name)
}

/// Resolves an optional color input against the palette.
pub fn resolve_color(value: Option<&str>, default: Swatch) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default.hex().to_string()),
        Some(raw) => Swatch::from_hex(raw)
            .map(|swatch| swatch.hex().to_string())
            .ok_or_else(|| ValidationError::InvalidColor(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_lookup_is_case_insensitive() {
        assert_eq!(Swatch::from_hex("#4caf50"), Some(Swatch::Green));
        assert_eq!(
            resolve_color(Some("#ffeb3b"), Swatch::Green).unwrap(),
            "#FFEB3B"
        );
    }

    #[test]
    fn off_palette_colors_are_custom_and_rejected_on_write() {
        assert_eq!(color_name("#123456"), "Custom");
        assert_eq!(
            resolve_color(Some("#123456"), Swatch::Yellow).unwrap_err(),
            ValidationError::InvalidColor("#123456".to_string())
        );
        assert_eq!(resolve_color(None, Swatch::Yellow).unwrap(), "#FFEB3B");
    }
}
