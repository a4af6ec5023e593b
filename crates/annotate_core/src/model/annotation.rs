//! Annotation domain model.
//!
//! # Responsibility
//! - Define the record that annotators store and the coordinator buffers.
//! - Provide geometry validation for shapes attached to an annotation.
//!
//! # Invariants
//! - `id` is the identity used for replace/remove matching; content
//!   equality never makes two annotations "the same" annotation.
//! - A clone keeps the `id`, so it stands for the same annotation.
//! - `src` is the identifying URL of the item the annotation belongs to.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one annotation instance.
pub type AnnotationId = Uuid;

/// Geometry family of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Rect,
    Polygon,
    Point,
}

/// Coordinate units used by a shape's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    /// Absolute pixels on the rendered item.
    #[default]
    Pixel,
    /// Fractions of item width/height in `0.0..=1.0`.
    Fraction,
}

/// One vertex of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Concrete geometry for a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Polygon {
        points: Vec<Point>,
    },
    Point {
        x: f64,
        y: f64,
    },
}

/// Marked region of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Serialized as `type` to match the annotation wire shape.
    #[serde(rename = "type")]
    pub shape_type: ShapeType,
    pub geometry: Geometry,
    #[serde(default)]
    pub units: Units,
}

impl Shape {
    /// Axis-aligned rectangle in pixel units.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            shape_type: ShapeType::Rect,
            geometry: Geometry::Rect {
                x,
                y,
                width,
                height,
            },
            units: Units::Pixel,
        }
    }

    /// Closed polygon in pixel units.
    pub fn polygon(points: Vec<Point>) -> Self {
        Self {
            shape_type: ShapeType::Polygon,
            geometry: Geometry::Polygon { points },
            units: Units::Pixel,
        }
    }

    /// Single point marker in pixel units.
    pub fn point(x: f64, y: f64) -> Self {
        Self {
            shape_type: ShapeType::Point,
            geometry: Geometry::Point { x, y },
            units: Units::Pixel,
        }
    }

    /// Returns a copy of this shape expressed in `units`.
    ///
    /// Only the unit tag changes; callers convert coordinates themselves.
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Validates geometry invariants for this shape.
    ///
    /// # Errors
    /// - `TypeMismatch` when `shape_type` disagrees with `geometry`.
    /// - `NonFiniteCoordinate` for NaN/infinite values.
    /// - `NegativeExtent` for rectangles with negative width/height.
    /// - `TooFewPoints` for polygons with fewer than three vertices.
    /// - `OutOfUnitRange` for fraction-unit coordinates outside `0.0..=1.0`.
    pub fn validate(&self) -> Result<(), ShapeValidationError> {
        let coordinates: Vec<f64> = match (&self.shape_type, &self.geometry) {
            (
                ShapeType::Rect,
                Geometry::Rect {
                    x,
                    y,
                    width,
                    height,
                },
            ) => {
                if *width < 0.0 || *height < 0.0 {
                    return Err(ShapeValidationError::NegativeExtent);
                }
                vec![*x, *y, *x + *width, *y + *height]
            }
            (ShapeType::Polygon, Geometry::Polygon { points }) => {
                if points.len() < 3 {
                    return Err(ShapeValidationError::TooFewPoints(points.len()));
                }
                points.iter().flat_map(|p| [p.x, p.y]).collect()
            }
            (ShapeType::Point, Geometry::Point { x, y }) => vec![*x, *y],
            _ => return Err(ShapeValidationError::TypeMismatch(self.shape_type)),
        };

        if coordinates.iter().any(|value| !value.is_finite()) {
            return Err(ShapeValidationError::NonFiniteCoordinate);
        }
        if self.units == Units::Fraction
            && coordinates
                .iter()
                .any(|value| !(0.0..=1.0).contains(value))
        {
            return Err(ShapeValidationError::OutOfUnitRange);
        }
        Ok(())
    }
}

/// Shape validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeValidationError {
    TypeMismatch(ShapeType),
    NonFiniteCoordinate,
    NegativeExtent,
    TooFewPoints(usize),
    OutOfUnitRange,
}

impl Display for ShapeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch(shape_type) => {
                write!(f, "geometry does not match shape type {shape_type:?}")
            }
            Self::NonFiniteCoordinate => write!(f, "shape coordinates must be finite"),
            Self::NegativeExtent => write!(f, "rectangle width/height must not be negative"),
            Self::TooFewPoints(count) => {
                write!(f, "polygon needs at least 3 points, got {count}")
            }
            Self::OutOfUnitRange => {
                write!(f, "fraction coordinates must lie within 0.0..=1.0")
            }
        }
    }
}

impl Error for ShapeValidationError {}

/// One marked region/comment on an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Identity used for replace/remove matching.
    pub id: AnnotationId,
    /// Identifying URL of the annotated item.
    pub src: String,
    /// URL of the host document the item is embedded in, when known.
    #[serde(default)]
    pub context: Option<String>,
    /// Comment body.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    /// Whether annotators may offer editing for this annotation.
    #[serde(default = "default_editable")]
    pub editable: bool,
}

fn default_editable() -> bool {
    true
}

impl Annotation {
    /// Creates a new annotation with a generated identity.
    pub fn new(src: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), src, text)
    }

    /// Creates an annotation with a caller-provided identity.
    ///
    /// Used when an annotation already has an identity elsewhere, e.g. when
    /// it is loaded back from a host-side store.
    pub fn with_id(id: AnnotationId, src: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            src: src.into(),
            context: None,
            text: text.into(),
            shapes: Vec::new(),
            editable: true,
        }
    }

    /// Builder helper appending one shape.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Whether `other` is the same annotation (identity, not content).
    pub fn is_same(&self, other: &Annotation) -> bool {
        self.id == other.id
    }

    /// Validates all attached shapes.
    pub fn validate(&self) -> Result<(), ShapeValidationError> {
        self.shapes.iter().try_for_each(Shape::validate)
    }
}
