use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::annotation::Annotation;

/// Kind of visual contribution a layer makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Image,
    Annotation,
    Effect,
    Text,
}

impl LayerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Image => "image",
            LayerType::Annotation => "annotation",
            LayerType::Effect => "effect",
            LayerType::Text => "text",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a layer combines with the layers below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

/// Type-specific layer payload. The variant is the layer's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerContent {
    Image {
        /// Asset reference (path, URL or library id); never decoded here.
        source: String,
        #[serde(default)]
        natural_width: Option<u32>,
        #[serde(default)]
        natural_height: Option<u32>,
    },
    Annotation {
        #[serde(default)]
        marks: Vec<Annotation>,
    },
    Effect {
        effect: String,
        #[serde(default)]
        parameters: BTreeMap<String, f64>,
    },
    Text {
        text: String,
        font_family: String,
        font_size: f64,
        color: String,
    },
}

impl LayerContent {
    pub fn layer_type(&self) -> LayerType {
        match self {
            LayerContent::Image { .. } => LayerType::Image,
            LayerContent::Annotation { .. } => LayerType::Annotation,
            LayerContent::Effect { .. } => LayerType::Effect,
            LayerContent::Text { .. } => LayerType::Text,
        }
    }
}

/// One entry of a panel's z-ordered layer stack.
///
/// Identity is the `id`; names are free text and may repeat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    /// 0.0 (transparent) to 1.0 (opaque)
    pub opacity: f64,
    pub blend_mode: BlendMode,
    pub content: LayerContent,
}

impl Layer {
    /// Visible, unlocked, fully opaque layer with normal blending.
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: LayerContent) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            locked: false,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            content,
        }
    }

    pub fn image(id: impl Into<String>, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            LayerContent::Image {
                source: source.into(),
                natural_width: None,
                natural_height: None,
            },
        )
    }

    pub fn text(id: impl Into<String>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            LayerContent::Text {
                text: text.into(),
                font_family: "sans-serif".to_string(),
                font_size: 24.0,
                color: "#ffffff".to_string(),
            },
        )
    }

    pub fn effect(id: impl Into<String>, name: impl Into<String>, effect: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            LayerContent::Effect {
                effect: effect.into(),
                parameters: BTreeMap::new(),
            },
        )
    }

    pub fn annotation(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, LayerContent::Annotation { marks: Vec::new() })
    }

    pub fn layer_type(&self) -> LayerType {
        self.content.layer_type()
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }
}
