//! # Style Codec
//!
//! Bidirectional mapping between the wire style record (delimited color
//! strings, snake_case icon keys) and the in-memory [`Style`]. Decoding is
//! total: any well-formed DTO produces a style, falling back to defaults
//! for absent or unrecognized fields, and `decode(&encode(&s)) == s` for
//! every style the decoder produces.

use serde::{Deserialize, Serialize};

use crate::icons::{self, AvatarIcon};

/// Default gradient endpoint when a color field is absent or empty.
const DEFAULT_COLOR: &str = "#888888";

/// A hex color, normalized to lowercase `#rrggbb`-style form on
/// construction so equality is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColor(String);

impl HexColor {
    /// Trims, prefixes a missing leading `#`, and lowercases.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let normalized = if trimmed.starts_with('#') {
            trimmed.to_ascii_lowercase()
        } else {
            format!("#{}", trimmed.to_ascii_lowercase())
        };
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The wire form: hex digits with the leading `#` stripped.
    pub fn without_hash(&self) -> &str {
        self.0.trim_start_matches('#')
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::parse(DEFAULT_COLOR)
    }
}

/// Gradient direction: a named CSS direction or a degree angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientDirection {
    #[default]
    ToRight,
    ToLeft,
    ToTop,
    ToBottom,
    Angle(u16),
}

impl GradientDirection {
    /// Parses a wire direction. Absent or unrecognized values fall back to
    /// the `to right` baseline.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        let normalized = raw.trim().replace('_', " ").to_ascii_lowercase();
        match normalized.as_str() {
            "to right" => Self::ToRight,
            "to left" => Self::ToLeft,
            "to top" => Self::ToTop,
            "to bottom" => Self::ToBottom,
            other => other
                .strip_suffix("deg")
                .and_then(|deg| deg.trim().parse::<u16>().ok())
                .map(Self::Angle)
                .unwrap_or_default(),
        }
    }

    /// Canonical wire form.
    pub fn as_wire(&self) -> String {
        match self {
            Self::ToRight => "to right".to_string(),
            Self::ToLeft => "to left".to_string(),
            Self::ToTop => "to top".to_string(),
            Self::ToBottom => "to bottom".to_string(),
            Self::Angle(deg) => format!("{deg}deg"),
        }
    }
}

/// A user's visual identity: avatar and username gradients plus the
/// resolved avatar icon.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub avatar: (HexColor, HexColor),
    pub username: (HexColor, HexColor),
    pub direction: GradientDirection,
    pub icon: AvatarIcon,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            avatar: (HexColor::default(), HexColor::default()),
            username: (HexColor::default(), HexColor::default()),
            direction: GradientDirection::default(),
            icon: AvatarIcon::default(),
        }
    }
}

/// The wire twin of [`Style`]: colors as `"RRGGBB, RRGGBB"`, icon as a
/// snake_case registry key. Also the shape cached in the client store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Decodes a wire style. A single color yields equal endpoints (solid, not
/// gradient); unknown icon keys resolve to the default `user` icon.
pub fn decode(dto: &StyleDto) -> Style {
    Style {
        avatar: decode_colors(dto.avatar_color.as_deref()),
        username: decode_colors(dto.username_color.as_deref()),
        direction: GradientDirection::parse(dto.direction.as_deref()),
        icon: decode_icon(dto.icon.as_deref()),
    }
}

/// Encodes a style back to its wire form.
pub fn encode(style: &Style) -> StyleDto {
    StyleDto {
        avatar_color: Some(encode_colors(&style.avatar)),
        username_color: Some(encode_colors(&style.username)),
        direction: Some(style.direction.as_wire()),
        icon: Some(camel_to_snake(icons::avatar_name(style.icon))),
    }
}

fn decode_colors(raw: Option<&str>) -> (HexColor, HexColor) {
    let parts: Vec<HexColor> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(HexColor::parse)
        .collect();

    match parts.as_slice() {
        [] => (HexColor::default(), HexColor::default()),
        [only] => (only.clone(), only.clone()),
        [first, second, ..] => (first.clone(), second.clone()),
    }
}

fn encode_colors(colors: &(HexColor, HexColor)) -> String {
    format!("{}, {}", colors.0.without_hash(), colors.1.without_hash())
}

fn decode_icon(key: Option<&str>) -> AvatarIcon {
    match key.map(str::trim).filter(|key| !key.is_empty()) {
        Some(key) => icons::avatar_by_name(&snake_to_camel(key)).unwrap_or_default(),
        None => AvatarIcon::default(),
    }
}

fn snake_to_camel(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    for (index, part) in snake.split('_').filter(|p| !p.is_empty()).enumerate() {
        if index == 0 {
            out.push_str(part);
        } else {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

fn camel_to_snake(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len());
    for ch in camel.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_normalizes_colors() {
        let dto = StyleDto {
            avatar_color: Some("FFAA00 , #11bb22".into()),
            ..StyleDto::default()
        };
        let style = decode(&dto);
        assert_eq!(style.avatar.0.as_str(), "#ffaa00");
        assert_eq!(style.avatar.1.as_str(), "#11bb22");
    }

    #[test]
    fn single_color_is_solid() {
        let dto = StyleDto {
            username_color: Some("ABCDEF".into()),
            ..StyleDto::default()
        };
        let style = decode(&dto);
        assert_eq!(style.username.0, style.username.1);
        assert_eq!(style.username.0.as_str(), "#abcdef");
    }

    #[test]
    fn icon_key_resolves_through_registry() {
        let dto = StyleDto {
            icon: Some("user_astronaut".into()),
            ..StyleDto::default()
        };
        assert_eq!(decode(&dto).icon, AvatarIcon::UserAstronaut);
    }

    #[test]
    fn unknown_or_absent_icon_falls_back() {
        let unknown = StyleDto {
            icon: Some("wizard_hat".into()),
            ..StyleDto::default()
        };
        assert_eq!(decode(&unknown).icon, AvatarIcon::User);
        assert_eq!(decode(&StyleDto::default()).icon, AvatarIcon::User);
    }

    #[test]
    fn absent_direction_takes_baseline() {
        assert_eq!(
            decode(&StyleDto::default()).direction,
            GradientDirection::ToRight
        );
    }

    #[test]
    fn degree_directions_parse() {
        assert_eq!(
            GradientDirection::parse(Some("135deg")),
            GradientDirection::Angle(135)
        );
        assert_eq!(
            GradientDirection::parse(Some("to_bottom")),
            GradientDirection::ToBottom
        );
        assert_eq!(
            GradientDirection::parse(Some("sideways")),
            GradientDirection::ToRight
        );
    }

    #[test]
    fn round_trip_is_stable_over_decoded_styles() {
        let dtos = [
            StyleDto::default(),
            StyleDto {
                avatar_color: Some("ff0000, 00ff00".into()),
                username_color: Some("#123456".into()),
                direction: Some("45deg".into()),
                icon: Some("dragon".into()),
            },
            StyleDto {
                avatar_color: Some("  AABBCC  ".into()),
                username_color: Some("ddeeff, 001122".into()),
                direction: Some("to left".into()),
                icon: Some("user_ninja".into()),
            },
        ];

        for dto in dtos {
            let style = decode(&dto);
            assert_eq!(decode(&encode(&style)), style);
        }
    }

    #[test]
    fn distinct_colors_survive_in_order() {
        let style = Style {
            avatar: (HexColor::parse("#ff0000"), HexColor::parse("#0000ff")),
            ..Style::default()
        };
        let recovered = decode(&encode(&style));
        assert_eq!(recovered.avatar.0.as_str(), "#ff0000");
        assert_eq!(recovered.avatar.1.as_str(), "#0000ff");
    }

    #[test]
    fn case_conversion_helpers() {
        assert_eq!(snake_to_camel("user_astronaut"), "userAstronaut");
        assert_eq!(snake_to_camel("user"), "user");
        assert_eq!(camel_to_snake("userAstronaut"), "user_astronaut");
        assert_eq!(camel_to_snake("user"), "user");
    }
}
