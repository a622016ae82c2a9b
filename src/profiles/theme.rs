use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ThemeId {
    Normal,
    HighContrast,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FontScaleId {
    Normal,
    Large,
}

impl FontScaleId {
    pub fn multiplier(self) -> f32 {
        match self {
            FontScaleId::Normal => 1.0,
            FontScaleId::Large => 1.25,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: &'static str,
    pub background: &'static str,
    pub text: &'static str,
    pub text_light: &'static str,
    pub border: &'static str,
    pub card_bg: &'static str,
}

/// Point sizes for each text role.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FontSizes {
    pub small: u16,
    pub normal: u16,
    pub large: u16,
    pub xlarge: u16,
    pub title: u16,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: ThemeId,
    pub colors: ThemeColors,
    pub font_sizes: FontSizes,
}

const NORMAL: Theme = Theme {
    id: ThemeId::Normal,
    colors: ThemeColors {
        primary: "#667eea",
        background: "#ffffff",
        text: "#2d3748",
        text_light: "#718096",
        border: "#e2e8f0",
        card_bg: "#f7fafc",
    },
    font_sizes: FontSizes {
        small: 14,
        normal: 18,
        large: 20,
        xlarge: 24,
        title: 32,
    },
};

// Black on yellow reads best for most low-vision users.
const HIGH_CONTRAST: Theme = Theme {
    id: ThemeId::HighContrast,
    colors: ThemeColors {
        primary: "#000000",
        background: "#ffff00",
        text: "#000000",
        text_light: "#333333",
        border: "#000000",
        card_bg: "#ffd700",
    },
    font_sizes: FontSizes {
        small: 16,
        normal: 22,
        large: 26,
        xlarge: 30,
        title: 38,
    },
};

impl Theme {
    pub fn for_id(id: ThemeId) -> &'static Theme {
        match id {
            ThemeId::Normal => &NORMAL,
            ThemeId::HighContrast => &HIGH_CONTRAST,
        }
    }
}
