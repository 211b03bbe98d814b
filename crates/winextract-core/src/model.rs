use crate::geom::{BBox, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fields shared by every entity variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EntityCommon {
    pub layer: String,
    pub handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Line {
    pub common: EntityCommon,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LwPolyline {
    pub common: EntityCommon,
    pub vertices: Vec<Point>,
    pub closed: bool,
}

/// A key/text attribute attached to an insert, e.g. `楼号` -> building id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Attrib {
    pub common: EntityCommon,
    pub tag: String,
    pub text: String,
    pub location: Point,
    pub height: f64,
}

/// Placement of a named block. Holds the block name only; the block
/// itself lives in [`Document::blocks`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub common: EntityCommon,
    pub block_name: String,
    pub insertion: Point,
    pub scale: Point,
    pub rotation: f64,
    pub attributes: Vec<Attrib>,
}

impl Default for Insert {
    fn default() -> Self {
        Self {
            common: EntityCommon::default(),
            block_name: String::new(),
            insertion: Point::default(),
            scale: Point::new(1.0, 1.0, 1.0),
            rotation: 0.0,
            attributes: Vec::new(),
        }
    }
}

impl Insert {
    /// Attribute text stored under `key`. A tag repeated on the same
    /// insert resolves to its last occurrence.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|a| a.tag == key)
            .map(|a| a.text.as_str())
    }

    pub fn is_block(&self, name: &str) -> bool {
        self.block_name.eq_ignore_ascii_case(name)
    }
}

/// Linear dimension annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Dimension {
    pub common: EntityCommon,
    /// Low three bits of group 70; 0 is a rotated/linear dimension.
    pub kind: u8,
    pub style_name: String,
    pub measurement: f64,
    pub text: String,
    /// Dimension line angle in degrees.
    pub angle: f64,
    pub def_point: Point,
    pub text_mid: Point,
    pub measure_start: Point,
    pub measure_end: Point,
}

impl Dimension {
    pub fn is_linear(&self) -> bool {
        self.kind == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Line(Line),
    LwPolyline(LwPolyline),
    Insert(Insert),
    Attrib(Attrib),
    Dimension(Dimension),
}

impl Entity {
    pub fn type_name(&self) -> &'static str {
        match self {
            Entity::Line(_) => "LINE",
            Entity::LwPolyline(_) => "LWPOLYLINE",
            Entity::Insert(_) => "INSERT",
            Entity::Attrib(_) => "ATTRIB",
            Entity::Dimension(_) => "DIMENSION",
        }
    }

    pub fn common(&self) -> &EntityCommon {
        match self {
            Entity::Line(e) => &e.common,
            Entity::LwPolyline(e) => &e.common,
            Entity::Insert(e) => &e.common,
            Entity::Attrib(e) => &e.common,
            Entity::Dimension(e) => &e.common,
        }
    }

    pub fn layer(&self) -> &str {
        &self.common().layer
    }

    /// Bounding box in the entity's own coordinate space.
    ///
    /// Inserts and attributes report their insertion point; dimensions
    /// report their perfect rectangle without extension padding. A
    /// polyline without vertices has no box.
    pub fn bbox(&self) -> Option<BBox> {
        match self {
            Entity::Line(line) => Some(BBox::new(line.start, line.end)),
            Entity::LwPolyline(poly) => BBox::bounding(poly.vertices.iter().copied()),
            Entity::Insert(insert) => Some(BBox::point(insert.insertion)),
            Entity::Attrib(attrib) => Some(BBox::point(attrib.location)),
            Entity::Dimension(dim) => Some(dim.perfect_rectangle(0.0)),
        }
    }

    pub fn as_insert(&self) -> Option<&Insert> {
        match self {
            Entity::Insert(insert) => Some(insert),
            _ => None,
        }
    }

    pub fn as_dimension(&self) -> Option<&Dimension> {
        match self {
            Entity::Dimension(dim) => Some(dim),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Block {
    pub name: String,
    /// Drawing order.
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimStyle {
    pub name: String,
    /// Displayed decimal places (DIMDEC).
    pub precision: i32,
    /// Extension beyond the dimension line (DIMEXE).
    pub extension: f64,
    /// Overall dimension scale (DIMSCALE).
    pub scale: f64,
}

impl Default for DimStyle {
    fn default() -> Self {
        Self {
            name: String::new(),
            precision: 0,
            extension: 0.0,
            scale: 1.0,
        }
    }
}

/// Parsed drawing: blocks and dimension styles keyed by upper-cased
/// name, plus the top-level entities in drawing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Document {
    pub blocks: BTreeMap<String, Block>,
    pub dim_styles: BTreeMap<String, DimStyle>,
    pub entities: Vec<Entity>,
}

impl Document {
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(&name.to_uppercase())
    }

    pub fn dim_style(&self, name: &str) -> Option<&DimStyle> {
        self.dim_styles.get(&name.to_uppercase())
    }

    pub fn insert_block(&mut self, mut block: Block) {
        block.name = block.name.to_uppercase();
        self.blocks.insert(block.name.clone(), block);
    }

    pub fn insert_dim_style(&mut self, mut style: DimStyle) {
        style.name = style.name.to_uppercase();
        self.dim_styles.insert(style.name.clone(), style);
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.entities.iter().filter_map(Entity::as_dimension)
    }

    pub fn inserts(&self) -> impl Iterator<Item = &Insert> {
        self.entities.iter().filter_map(Entity::as_insert)
    }
}
