use crate::registry::EntityRegistry;
use crate::scanner::Scanner;
use crate::tag::Tag;
use std::io::BufRead;
use winextract_core::geom::Point;
use winextract_core::model::{Attrib, Dimension, Entity, EntityCommon, Insert, Line, LwPolyline};

/// Parse routine of one entity variant.
///
/// Called with the scanner on the entity's code-0 type tag. Returns with
/// the scanner on the next code-0 tag, which is left for the caller.
/// Group codes a variant does not know are ignored.
pub trait ParseTags {
    fn parse<R: BufRead>(&mut self, scanner: &mut Scanner<R>, registry: &EntityRegistry);
}

/// Feeds the current tag and every following one up to the next code-0
/// tag to `f`.
fn for_each_tag<R: BufRead>(scanner: &mut Scanner<R>, mut f: impl FnMut(&Tag)) {
    loop {
        f(scanner.last_tag());
        if !scanner.advance() || scanner.last_tag().code == 0 {
            break;
        }
    }
}

fn common_tag(common: &mut EntityCommon, tag: &Tag) {
    match tag.code {
        5 => common.handle = Some(tag.as_str().to_string()),
        8 => common.layer = tag.as_str().to_string(),
        _ => {}
    }
}

impl ParseTags for Line {
    fn parse<R: BufRead>(&mut self, scanner: &mut Scanner<R>, _registry: &EntityRegistry) {
        for_each_tag(scanner, |tag| match tag.code {
            10 => self.start.x = tag.as_f64(),
            20 => self.start.y = tag.as_f64(),
            30 => self.start.z = tag.as_f64(),
            11 => self.end.x = tag.as_f64(),
            21 => self.end.y = tag.as_f64(),
            31 => self.end.z = tag.as_f64(),
            _ => common_tag(&mut self.common, tag),
        });
    }
}

impl ParseTags for LwPolyline {
    fn parse<R: BufRead>(&mut self, scanner: &mut Scanner<R>, _registry: &EntityRegistry) {
        let mut x = 0.0;
        for_each_tag(scanner, |tag| match tag.code {
            // Each vertex is a 10/20 pair; the Y closes it.
            10 => x = tag.as_f64(),
            20 => self.vertices.push(Point::xy(x, tag.as_f64())),
            70 => self.closed = tag.as_i32() & 1 == 1,
            _ => common_tag(&mut self.common, tag),
        });
    }
}

impl ParseTags for Attrib {
    fn parse<R: BufRead>(&mut self, scanner: &mut Scanner<R>, _registry: &EntityRegistry) {
        for_each_tag(scanner, |tag| match tag.code {
            1 => self.text = tag.as_str().to_string(),
            2 => self.tag = tag.as_str().to_string(),
            10 => self.location.x = tag.as_f64(),
            20 => self.location.y = tag.as_f64(),
            30 => self.location.z = tag.as_f64(),
            40 => self.height = tag.as_f64(),
            _ => common_tag(&mut self.common, tag),
        });
    }
}

impl ParseTags for Dimension {
    fn parse<R: BufRead>(&mut self, scanner: &mut Scanner<R>, _registry: &EntityRegistry) {
        for_each_tag(scanner, |tag| match tag.code {
            1 => self.text = tag.as_str().to_string(),
            3 => self.style_name = tag.as_str().to_uppercase(),
            42 => self.measurement = tag.as_f64(),
            50 => self.angle = tag.as_f64(),
            70 => self.kind = (tag.as_i32() & 0x07) as u8,
            10 => self.def_point.x = tag.as_f64(),
            20 => self.def_point.y = tag.as_f64(),
            11 => self.text_mid.x = tag.as_f64(),
            21 => self.text_mid.y = tag.as_f64(),
            13 => self.measure_start.x = tag.as_f64(),
            23 => self.measure_start.y = tag.as_f64(),
            14 => self.measure_end.x = tag.as_f64(),
            24 => self.measure_end.y = tag.as_f64(),
            _ => common_tag(&mut self.common, tag),
        });
    }
}

impl ParseTags for Insert {
    fn parse<R: BufRead>(&mut self, scanner: &mut Scanner<R>, registry: &EntityRegistry) {
        let mut has_attributes = false;
        for_each_tag(scanner, |tag| match tag.code {
            2 => self.block_name = tag.as_str().to_string(),
            10 => self.insertion.x = tag.as_f64(),
            20 => self.insertion.y = tag.as_f64(),
            30 => self.insertion.z = tag.as_f64(),
            41 => self.scale.x = tag.as_f64(),
            42 => self.scale.y = tag.as_f64(),
            43 => self.scale.z = tag.as_f64(),
            50 => self.rotation = tag.as_f64(),
            66 => has_attributes = tag.as_i32() == 1,
            _ => common_tag(&mut self.common, tag),
        });

        if has_attributes {
            parse_attributes(self, scanner, registry);
        }
    }
}

impl ParseTags for Entity {
    fn parse<R: BufRead>(&mut self, scanner: &mut Scanner<R>, registry: &EntityRegistry) {
        match self {
            Entity::Line(e) => e.parse(scanner, registry),
            Entity::LwPolyline(e) => e.parse(scanner, registry),
            Entity::Insert(e) => e.parse(scanner, registry),
            Entity::Attrib(e) => e.parse(scanner, registry),
            Entity::Dimension(e) => e.parse(scanner, registry),
        }
    }
}

/// Collects attribute entities up to and including the SEQEND tag.
/// Other entity types in between are stepped over.
fn parse_attributes<R: BufRead>(
    insert: &mut Insert,
    scanner: &mut Scanner<R>,
    registry: &EntityRegistry,
) {
    loop {
        let tag = scanner.last_tag().clone();
        if tag.code == 0 {
            if tag.is_marker("SEQEND") {
                scanner.advance();
                return;
            }
            if tag.is_marker("ENDSEC") || tag.is_marker("ENDBLK") {
                log::warn!(
                    "attribute list of insert {:?} ended by {} without SEQEND",
                    insert.block_name,
                    tag.as_str()
                );
                return;
            }
            if let Some(Entity::Attrib(mut attrib)) = registry.create(&tag.value) {
                attrib.parse(scanner, registry);
                insert.attributes.push(attrib);
                if scanner.is_done() {
                    return;
                }
                continue;
            }
        }
        if !scanner.advance() {
            return;
        }
    }
}
