//! Flyweight pattern: shared, immutable map elements handed out by a registry.
//!
//! Every kind of [`MapElement`] is built once with fixed sample attributes and
//! then shared through an `Rc` for as long as the registry holds it. Callers
//! only supply the extrinsic state (the coordinates) when drawing.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::DemoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapElementKind {
    Tree,
    Building,
    Road,
    Lake,
    Car,
    River,
}

impl MapElementKind {
    pub const ALL: [MapElementKind; 6] = [
        MapElementKind::Tree,
        MapElementKind::Building,
        MapElementKind::Road,
        MapElementKind::Lake,
        MapElementKind::Car,
        MapElementKind::River,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MapElementKind::Tree => "Tree",
            MapElementKind::Building => "Building",
            MapElementKind::Road => "Road",
            MapElementKind::Lake => "Lake",
            MapElementKind::Car => "Car",
            MapElementKind::River => "River",
        }
    }
}

impl fmt::Display for MapElementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapElementKind {
    type Err = DemoError;

    /// Names are matched exactly; a near miss carries a suggestion.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapElementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DemoError::unknown_kind(s, suggest_kind(s)))
    }
}

/// Intrinsic state of a map element. Instances never change after creation.
#[derive(Debug, Clone, PartialEq)]
pub enum MapElement {
    Tree {
        tree_type: String,
        color: String,
        texture: String,
    },
    Building {
        building_type: String,
        color: String,
        floors: u32,
    },
    Road {
        road_type: String,
        material: String,
    },
    Lake {
        lake_type: String,
        color: String,
        size: f64,
    },
    Car {
        brand: String,
        color: String,
    },
    River {
        name: String,
        color: String,
        width: f64,
    },
}

impl MapElement {
    /// The fixed sample instance the registry builds for `kind`.
    pub fn sample(kind: MapElementKind) -> Self {
        match kind {
            MapElementKind::Tree => MapElement::Tree {
                tree_type: "Pine".to_string(),
                color: "Green".to_string(),
                texture: "PineTexture".to_string(),
            },
            MapElementKind::Building => MapElement::Building {
                building_type: "Skyscraper".to_string(),
                color: "Gray".to_string(),
                floors: 50,
            },
            MapElementKind::Road => MapElement::Road {
                road_type: "Asphalt".to_string(),
                material: "Asphalt".to_string(),
            },
            MapElementKind::Lake => MapElement::Lake {
                lake_type: "Mountain".to_string(),
                color: "Blue".to_string(),
                size: 1.5,
            },
            MapElementKind::Car => MapElement::Car {
                brand: "Tesla".to_string(),
                color: "Red".to_string(),
            },
            MapElementKind::River => MapElement::River {
                name: "Amazon".to_string(),
                color: "Brown".to_string(),
                width: 10.0,
            },
        }
    }

    pub fn kind(&self) -> MapElementKind {
        match self {
            MapElement::Tree { .. } => MapElementKind::Tree,
            MapElement::Building { .. } => MapElementKind::Building,
            MapElement::Road { .. } => MapElementKind::Road,
            MapElement::Lake { .. } => MapElementKind::Lake,
            MapElement::Car { .. } => MapElementKind::Car,
            MapElement::River { .. } => MapElementKind::River,
        }
    }

    /// Describes the element drawn at `(x, y)`.
    pub fn draw(&self, x: i32, y: i32) -> String {
        match self {
            MapElement::Tree {
                tree_type, texture, ..
            } => format!("Drawing Tree of type {tree_type} at ({x}, {y}) with texture {texture}"),
            MapElement::Building {
                building_type,
                floors,
                ..
            } => format!(
                "Drawing Building of type {building_type} at ({x}, {y}) with {floors} floors."
            ),
            MapElement::Road {
                road_type,
                material,
            } => format!("Drawing Road of type {road_type} at ({x}, {y}) with material {material}"),
            MapElement::Lake {
                lake_type,
                color,
                size,
            } => format!(
                "Drawing Lake of type {lake_type} at ({x}, {y}) with size {size} and color {color}"
            ),
            MapElement::Car { brand, color } => {
                format!("Drawing Car of brand {brand} at ({x}, {y}) with color {color}")
            }
            MapElement::River { name, color, width } => format!(
                "Drawing River named {name} at ({x}, {y}) with width {width} and color {color}"
            ),
        }
    }
}

/// Owns at most one shared [`MapElement`] per kind.
#[derive(Debug, Default)]
pub struct FlyweightRegistry {
    elements: HashMap<MapElementKind, Rc<MapElement>>,
    created: usize,
}

impl FlyweightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared element for `kind`, building it on first request.
    ///
    /// An unrecognized name yields `None` and leaves the registry untouched.
    /// Use [`FlyweightRegistry::element`] when absence should be an error.
    pub fn get_flyweight(&mut self, kind: &str) -> Option<Rc<MapElement>> {
        match kind.parse::<MapElementKind>() {
            Ok(kind) => Some(self.get_or_create(kind)),
            Err(_) => {
                debug!(kind, "no flyweight for unrecognized kind");
                None
            }
        }
    }

    pub fn element(&mut self, kind: &str) -> Result<Rc<MapElement>, DemoError> {
        let kind = kind.parse::<MapElementKind>()?;
        Ok(self.get_or_create(kind))
    }

    pub fn get_or_create(&mut self, kind: MapElementKind) -> Rc<MapElement> {
        if let Some(existing) = self.elements.get(&kind) {
            trace!(%kind, "reusing flyweight");
            return Rc::clone(existing);
        }

        let element = Rc::new(MapElement::sample(kind));
        self.created += 1;
        debug!(%kind, created = self.created, "created flyweight");
        self.elements.insert(kind, Rc::clone(&element));
        element
    }

    pub fn contains(&self, kind: MapElementKind) -> bool {
        self.elements.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Total number of elements built since the registry was created.
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Releases every element; later lookups build fresh instances.
    pub fn clear(&mut self) {
        debug!(released = self.elements.len(), "clearing flyweight registry");
        self.elements.clear();
    }
}

fn suggest_kind(name: &str) -> Option<String> {
    const MAX_DISTANCE: usize = 2;

    MapElementKind::ALL
        .into_iter()
        .map(|kind| (kind, levenshtein_distance(name, kind.as_str())))
        .filter(|&(_, distance)| distance <= MAX_DISTANCE)
        .min_by_key(|&(_, distance)| distance)
        .map(|(kind, _)| kind.as_str().to_string())
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }

    previous[b.len()]
}
