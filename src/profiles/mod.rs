//! Vision profiles: the fixed set of accessibility configurations a user can
//! pick during onboarding.
//!
//! Everything a screen needs to know about a profile (theme, font scale,
//! screen-reader policy) is derived from the records in this module instead of
//! being re-inspected ad hoc per screen.

pub mod theme;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AccessibilityError;

pub use theme::{FontScaleId, FontSizes, Theme, ThemeColors, ThemeId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum VisionProfileId {
    Standard,
    LowVision,
    Blind,
}

impl Default for VisionProfileId {
    fn default() -> Self {
        VisionProfileId::Standard
    }
}

impl VisionProfileId {
    pub fn as_str(self) -> &'static str {
        match self {
            VisionProfileId::Standard => "standard",
            VisionProfileId::LowVision => "low-vision",
            VisionProfileId::Blind => "blind",
        }
    }

    pub fn profile(self) -> &'static VisionProfile {
        match self {
            VisionProfileId::Standard => &PROFILES[0],
            VisionProfileId::LowVision => &PROFILES[1],
            VisionProfileId::Blind => &PROFILES[2],
        }
    }
}

impl fmt::Display for VisionProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisionProfileId {
    type Err = AccessibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `good` and `low` are the ids older mobile builds wrote to storage.
        match s.trim() {
            "standard" | "good" => Ok(VisionProfileId::Standard),
            "low-vision" | "low" => Ok(VisionProfileId::LowVision),
            "blind" => Ok(VisionProfileId::Blind),
            other => Err(AccessibilityError::UnknownProfile(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VisionProfile {
    pub id: VisionProfileId,
    pub display_name: &'static str,
    pub description: &'static str,
    /// The screen reader cannot be switched off while this profile is active.
    pub screen_reader_forced: bool,
    pub screen_reader_toggleable: bool,
    pub theme: ThemeId,
    pub font_scale: FontScaleId,
}

impl VisionProfile {
    pub fn theme(&self) -> &'static Theme {
        Theme::for_id(self.theme)
    }

    pub fn font_multiplier(&self) -> f32 {
        self.font_scale.multiplier()
    }

    /// The profile that never speaks on its own and offers no toggle.
    pub fn is_standard(&self) -> bool {
        !self.screen_reader_forced && !self.screen_reader_toggleable
    }
}

static PROFILES: [VisionProfile; 3] = [
    VisionProfile {
        id: VisionProfileId::Standard,
        display_name: "Buena visión",
        description: "Sin lector de pantalla. Interfaz normal.",
        screen_reader_forced: false,
        screen_reader_toggleable: false,
        theme: ThemeId::Normal,
        font_scale: FontScaleId::Normal,
    },
    VisionProfile {
        id: VisionProfileId::LowVision,
        display_name: "Baja visión",
        description: "Alto contraste, texto grande. Lector opcional.",
        screen_reader_forced: false,
        screen_reader_toggleable: true,
        theme: ThemeId::HighContrast,
        font_scale: FontScaleId::Large,
    },
    VisionProfile {
        id: VisionProfileId::Blind,
        display_name: "Ceguera",
        description: "Lector de pantalla obligatorio. Navegación por voz.",
        screen_reader_forced: true,
        screen_reader_toggleable: false,
        theme: ThemeId::HighContrast,
        font_scale: FontScaleId::Large,
    },
];

/// Resolve a profile from its string id.
pub fn lookup(id: &str) -> Result<&'static VisionProfile, AccessibilityError> {
    id.parse::<VisionProfileId>().map(VisionProfileId::profile)
}

/// All profiles in onboarding order: standard, low vision, blind.
pub fn all() -> &'static [VisionProfile] {
    &PROFILES
}
