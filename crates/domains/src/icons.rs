//! # Icon Registry
//!
//! Static lookup tables from symbolic names to visual identifiers: the
//! avatar icon set users pick from, and the display glyph per reaction
//! kind. The avatar table is keyed by the camelCase names the style codec
//! resolves against; lookups are linear first-match in both directions.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::reactions::ReactionKind;

/// A resolved avatar icon. `User` is the fallback for unknown keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvatarIcon {
    #[default]
    User,
    UserAstronaut,
    UserNinja,
    UserSecret,
    Ghost,
    Cat,
    Dog,
    Dragon,
    Robot,
    Skull,
}

/// camelCase registry name → resolved icon. Each identifier is expected to
/// be registered at most once.
pub const AVATAR_ICONS: &[(&str, AvatarIcon)] = &[
    ("user", AvatarIcon::User),
    ("userAstronaut", AvatarIcon::UserAstronaut),
    ("userNinja", AvatarIcon::UserNinja),
    ("userSecret", AvatarIcon::UserSecret),
    ("ghost", AvatarIcon::Ghost),
    ("cat", AvatarIcon::Cat),
    ("dog", AvatarIcon::Dog),
    ("dragon", AvatarIcon::Dragon),
    ("robot", AvatarIcon::Robot),
    ("skull", AvatarIcon::Skull),
];

static AVATAR_BY_NAME: Lazy<BTreeMap<&'static str, AvatarIcon>> =
    Lazy::new(|| AVATAR_ICONS.iter().copied().collect());

/// Resolves a camelCase registry name. Unknown names yield `None`; the
/// style codec supplies the `User` fallback.
pub fn avatar_by_name(name: &str) -> Option<AvatarIcon> {
    AVATAR_BY_NAME.get(name).copied()
}

/// Reverse-maps an icon to its registry name: first match wins.
pub fn avatar_name(icon: AvatarIcon) -> &'static str {
    AVATAR_ICONS
        .iter()
        .find(|(_, candidate)| *candidate == icon)
        .map(|(name, _)| *name)
        .unwrap_or("user")
}

/// Display glyph per reaction kind.
pub fn reaction_glyph(kind: ReactionKind) -> &'static str {
    match kind {
        ReactionKind::Like => "👍",
        ReactionKind::Laugh => "😂",
        ReactionKind::Heart => "❤️",
        ReactionKind::Wow => "😮",
        ReactionKind::Sad => "😢",
        ReactionKind::Angry => "😠",
    }
}
