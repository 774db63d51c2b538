use gridkit_core::Point;
use serde::{Deserialize, Serialize};

/// Shape of an annotation mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Arrow,
    Rectangle,
    Ellipse,
    Freehand,
    Text,
}

/// A vector mark drawn over a panel, in normalized panel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    pub kind: AnnotationKind,
    pub points: Vec<Point>,
    pub color: String,
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Annotation {
    pub fn new(id: impl Into<String>, kind: AnnotationKind, points: Vec<Point>) -> Self {
        Self {
            id: id.into(),
            kind,
            points,
            color: "#ff3b30".to_string(),
            stroke_width: 2.0,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}
