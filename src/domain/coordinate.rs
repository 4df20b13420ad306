//! Degree/minute/second coordinate normalization.
//!
//! Polygon sheets are maintained by hand in spreadsheets, so the same angle
//! shows up as `3°45'33.1"S`, `3° 45′ 33.1″ S`, `-3 45 33.1` and so on.
//! [`dms_to_dd`] turns all of those into signed decimal degrees.

use std::sync::OnceLock;

use regex::Regex;

use super::error::FormatError;

/// Compass hemisphere marker found in a coordinate string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Self::North),
            'S' => Some(Self::South),
            'E' => Some(Self::East),
            'W' => Some(Self::West),
            _ => None,
        }
    }

    /// Southern and western hemispheres carry a negative sign.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::South | Self::West)
    }
}

fn dms_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(-?[0-9]+)[^0-9]+([0-9]+)[^0-9]+([0-9]+(?:\.[0-9]+)?)")
            .expect("static DMS pattern is valid")
    })
}

fn dm_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(-?[0-9]+)[^0-9]+([0-9]+(?:\.[0-9]+)?)").expect("static DM pattern is valid")
    })
}

/// Replace the prime/quote glyphs spreadsheets like to substitute.
fn canonical_marks(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '’' | '′' => '\'',
            '”' | '″' => '"',
            other => other,
        })
        .collect()
}

/// Convert a DMS-like string to signed decimal degrees.
///
/// The last hemisphere letter wins when several appear. Without a
/// hemisphere the sign of the degree group is kept, including `-0`:
/// `-0°30'` gives `-0.5`. Converters that test `degrees < 0` read the same
/// string as `+0.5`, so sub-degree values archived by such tools can flip
/// sign when re-normalized here.
///
/// # Errors
///
/// Returns [`FormatError::UnrecognizedDms`] when neither three nor two
/// numeric groups can be found.
///
/// # Examples
///
/// ```
/// use fadtrack::domain::coordinate::dms_to_dd;
///
/// let lat = dms_to_dd("3°45'33.1\"S").unwrap();
/// assert!((lat + 3.759194).abs() < 1e-5);
/// ```
pub fn dms_to_dd(raw: &str) -> Result<f64, FormatError> {
    let canonical = canonical_marks(raw);

    let hemisphere = canonical.chars().filter_map(Hemisphere::from_char).last();
    let numeric: String = canonical
        .chars()
        .filter(|c| Hemisphere::from_char(*c).is_none())
        .collect();

    let unrecognized = || FormatError::UnrecognizedDms {
        input: raw.to_string(),
    };
    let number = |text: &str| text.parse::<f64>().map_err(|_| unrecognized());

    let (degrees, minutes, seconds) = if let Some(caps) = dms_pattern().captures(&numeric) {
        (number(&caps[1])?, number(&caps[2])?, number(&caps[3])?)
    } else if let Some(caps) = dm_pattern().captures(&numeric) {
        (number(&caps[1])?, number(&caps[2])?, 0.0)
    } else {
        return Err(unrecognized());
    };

    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;

    let negative = match hemisphere {
        Some(h) => h.is_negative(),
        None => degrees.is_sign_negative(),
    };

    Ok(if negative { -magnitude } else { magnitude })
}
