use crate::geom::{BBox, Point};
use crate::model::{Document, Entity, Insert};

/// Local-to-parent affine map of an insert: per-axis scale, then rotation
/// about Z by `rotation` degrees, then translation by `insertion`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub insertion: Point,
    pub scale: Point,
    pub rotation: f64,
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            insertion: Point::default(),
            scale: Point::new(1.0, 1.0, 1.0),
            rotation: 0.0,
        }
    }
}

impl From<&Insert> for Placement {
    fn from(insert: &Insert) -> Self {
        Self {
            insertion: insert.insertion,
            scale: insert.scale,
            rotation: insert.rotation,
        }
    }
}

impl Insert {
    pub fn placement(&self) -> Placement {
        Placement::from(self)
    }
}

pub fn transform_point(p: Point, placement: &Placement) -> Point {
    let (sin, cos) = placement.rotation.to_radians().sin_cos();

    let sx = p.x * placement.scale.x;
    let sy = p.y * placement.scale.y;
    let sz = p.z * placement.scale.z;

    let rx = sx * cos - sy * sin;
    let ry = sx * sin + sy * cos;

    Point::new(
        rx + placement.insertion.x,
        ry + placement.insertion.y,
        sz + placement.insertion.z,
    )
}

/// Maps all eight corners and returns their axis-aligned bound, since a
/// rotated box is no longer axis-aligned.
pub fn transform_bbox(local: &BBox, placement: &Placement) -> BBox {
    let corners = local.corners();
    let mut out = BBox::point(transform_point(corners[0], placement));
    for corner in &corners[1..] {
        out.include_point(transform_point(*corner, placement));
    }
    out
}

/// Placement of a nested block expressed in the parent's parent space.
///
/// Rotations add and scales multiply per axis; the child's insertion point
/// goes through the parent's transform. Composition is exact whenever the
/// parent scales X and Y uniformly (or the child rotation is a multiple of
/// 180 degrees), which holds for the drawings this targets.
pub fn combine_inserts(parent: &Placement, child: &Placement) -> Placement {
    Placement {
        insertion: transform_point(child.insertion, parent),
        scale: Point::new(
            parent.scale.x * child.scale.x,
            parent.scale.y * child.scale.y,
            parent.scale.z * child.scale.z,
        ),
        rotation: parent.rotation + child.rotation,
    }
}

/// World boxes of every non-insert entity on `layer` reachable from
/// `entity`, descending through inserts and their blocks.
///
/// `parent` is the accumulated placement of the enclosing inserts, `None`
/// at the top level. Inserts whose block is missing contribute nothing.
pub fn collect_layer_boxes(
    doc: &Document,
    layer: &str,
    entity: &Entity,
    parent: Option<&Placement>,
) -> Vec<BBox> {
    let mut boxes = Vec::new();
    walk_layer(doc, layer, entity, parent, &mut boxes);
    boxes
}

fn walk_layer(
    doc: &Document,
    layer: &str,
    entity: &Entity,
    parent: Option<&Placement>,
    out: &mut Vec<BBox>,
) {
    let insert = match entity {
        Entity::Insert(insert) => insert,
        leaf => {
            if leaf.layer() == layer {
                if let Some(local) = leaf.bbox() {
                    out.push(match parent {
                        Some(placement) => transform_bbox(&local, placement),
                        None => local,
                    });
                }
            }
            return;
        }
    };

    let Some(block) = doc.block(&insert.block_name) else {
        log::warn!("insert references unknown block {:?}", insert.block_name);
        return;
    };

    let placement = match parent {
        Some(parent) => combine_inserts(parent, &insert.placement()),
        None => insert.placement(),
    };
    for sub in &block.entities {
        walk_layer(doc, layer, sub, Some(&placement), out);
    }
}

/// World box of a frame-style insert: the union of the direct children of
/// its block, mapped through the insert's own placement only.
///
/// Nested inserts inside the block count as their insertion point; the
/// walk does not descend further. A missing or empty block yields the
/// insertion point.
pub fn world_bbox_of(doc: &Document, insert: &Insert) -> BBox {
    let local = doc
        .block(&insert.block_name)
        .and_then(|block| {
            block
                .entities
                .iter()
                .filter_map(Entity::bbox)
                .reduce(|acc, b| acc.union(&b))
        })
        .map(|b| {
            // Local bounds are taken flat on Z, as the frames are planar.
            BBox::new(Point::xy(b.min.x, b.min.y), Point::xy(b.max.x, b.max.y))
        });

    match local {
        Some(local) => transform_bbox(&local, &insert.placement()),
        None => BBox::point(insert.insertion),
    }
}
