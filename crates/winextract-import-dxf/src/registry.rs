use std::collections::HashMap;
use winextract_core::model::{Attrib, Dimension, Entity, Insert, Line, LwPolyline};

/// Builds an empty entity of some variant, ready to be parsed.
pub type Constructor = fn() -> Entity;

/// Maps DXF entity type names to constructors. Names without a
/// constructor are skipped by the parser.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    constructors: HashMap<String, Constructor>,
}

impl EntityRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn register(&mut self, type_name: &str, constructor: Constructor) {
        self.constructors
            .insert(type_name.trim().to_ascii_uppercase(), constructor);
    }

    pub fn create(&self, type_name: &str) -> Option<Entity> {
        self.constructors
            .get(&type_name.trim().to_ascii_uppercase())
            .map(|constructor| constructor())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors
            .contains_key(&type_name.trim().to_ascii_uppercase())
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("LINE", || Entity::Line(Line::default()));
        registry.register("LWPOLYLINE", || Entity::LwPolyline(LwPolyline::default()));
        registry.register("INSERT", || Entity::Insert(Insert::default()));
        registry.register("ATTRIB", || Entity::Attrib(Attrib::default()));
        registry.register("DIMENSION", || Entity::Dimension(Dimension::default()));
        registry
    }
}
