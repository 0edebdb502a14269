//! Objects - Handles, Type Tags and Modes
//!
//! Describes the pieces of the host scene the engine reasons about.
//!
//! # Features
//!
//! - **ObjectId**: Stable handle for a scene object (its name).
//! - **ObjectType**: Type tag, with the watched types enumerated explicitly.
//! - **ObjectCategory**: Named group of types for bulk toggling.
//! - **ObjectSnapshot**: One object's state as read from the host.
//! - **InteractionMode**: Which editing mode the host is in.

use crate::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable handle of a scene object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Create a handle from an object name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Object name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ObjectId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Object type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    /// Polygon mesh
    Mesh,
    /// Curve
    Curve,
    /// NURBS surface
    Surface,
    /// Metaball
    Meta,
    /// Armature
    Armature,
    /// Lattice
    Lattice,
    /// Empty
    Empty,
    /// Any type the add-on never watches (camera, light, ...)
    #[serde(other)]
    Other,
}

impl ObjectType {
    /// Every type that can be enabled for auto-apply, in panel order
    pub const WATCHED: [ObjectType; 7] = [
        ObjectType::Mesh,
        ObjectType::Curve,
        ObjectType::Surface,
        ObjectType::Meta,
        ObjectType::Armature,
        ObjectType::Lattice,
        ObjectType::Empty,
    ];

    /// Host type tag (e.g. `MESH`)
    pub fn tag(&self) -> &'static str {
        match self {
            ObjectType::Mesh => "MESH",
            ObjectType::Curve => "CURVE",
            ObjectType::Surface => "SURFACE",
            ObjectType::Meta => "META",
            ObjectType::Armature => "ARMATURE",
            ObjectType::Lattice => "LATTICE",
            ObjectType::Empty => "EMPTY",
            ObjectType::Other => "OTHER",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ObjectType::Mesh => "Mesh",
            ObjectType::Curve => "Curve",
            ObjectType::Surface => "Surface",
            ObjectType::Meta => "Metaball",
            ObjectType::Armature => "Armature",
            ObjectType::Lattice => "Lattice",
            ObjectType::Empty => "Empty",
            ObjectType::Other => "Other",
        }
    }

    /// Tooltip text
    pub fn description(&self) -> &'static str {
        match self {
            ObjectType::Mesh => "Polygonal objects",
            ObjectType::Curve => "Curves",
            ObjectType::Surface => "Surfaces",
            ObjectType::Meta => "Meta objects",
            ObjectType::Armature => "Armatures",
            ObjectType::Lattice => "Lattices",
            ObjectType::Empty => "Empty objects",
            ObjectType::Other => "Types that are never auto-applied",
        }
    }

    /// Whether the type can be enabled at all
    pub fn is_watched(&self) -> bool {
        !matches!(self, ObjectType::Other)
    }

    /// Parse a host tag; unknown tags map to [`ObjectType::Other`]
    pub fn from_tag(tag: &str) -> Self {
        Self::WATCHED
            .into_iter()
            .find(|t| t.tag().eq_ignore_ascii_case(tag))
            .unwrap_or(ObjectType::Other)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ObjectType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

/// Named group of object types toggled together from the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectCategory {
    /// Category name shown in the panel
    pub name: &'static str,
    /// Member types
    pub types: &'static [ObjectType],
}

impl ObjectCategory {
    /// The "Objects" category
    pub const OBJECTS: ObjectCategory = ObjectCategory {
        name: "Objects",
        types: &[
            ObjectType::Mesh,
            ObjectType::Curve,
            ObjectType::Surface,
            ObjectType::Meta,
            ObjectType::Empty,
            ObjectType::Armature,
            ObjectType::Lattice,
        ],
    };

    /// All known categories
    pub const ALL: [ObjectCategory; 1] = [ObjectCategory::OBJECTS];

    /// Look up a category by name
    pub fn by_name(name: &str) -> Option<ObjectCategory> {
        Self::ALL.into_iter().find(|c| c.name == name)
    }
}

/// One object's state as read from the host
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSnapshot {
    /// Object handle
    pub id: ObjectId,
    /// Type tag
    pub object_type: ObjectType,
    /// Current local scale
    pub scale: Vec3,
}

impl ObjectSnapshot {
    /// Create a snapshot
    pub fn new(id: impl Into<ObjectId>, object_type: ObjectType, scale: Vec3) -> Self {
        Self {
            id: id.into(),
            object_type,
            scale,
        }
    }
}

/// Host interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Object mode, the only mode the engine works in
    #[default]
    Object,
    /// Mesh/curve edit mode
    Edit,
    /// Sculpt mode
    Sculpt,
    /// Pose mode
    Pose,
    /// Any painting mode
    Paint,
    /// Anything else
    Other,
}

impl InteractionMode {
    /// Check for object mode
    pub fn is_object(&self) -> bool {
        matches!(self, InteractionMode::Object)
    }
}
