use crate::error::Result;
use crate::parse::ParseTags;
use crate::registry::EntityRegistry;
use crate::scanner::Scanner;
use std::io::BufRead;
use winextract_core::model::{Block, DimStyle, Document};

/// Section-level state machine turning a tag stream into a [`Document`].
///
/// Only TABLES (DIMSTYLE entries), BLOCKS and ENTITIES are read; other
/// sections and tables are stepped over.
pub struct DocumentParser<'r> {
    registry: &'r EntityRegistry,
}

impl<'r> DocumentParser<'r> {
    pub fn new(registry: &'r EntityRegistry) -> Self {
        Self { registry }
    }

    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Document> {
        let mut scanner = Scanner::new(reader);
        let mut doc = Document::default();

        while scanner.advance() {
            if !scanner.last_tag().is_marker("SECTION") {
                continue;
            }
            if !scanner.advance() {
                break;
            }
            let name = scanner.last_tag().as_str().to_uppercase();
            log::debug!("section {name} at line {}", scanner.line());
            match name.as_str() {
                "TABLES" => self.parse_tables(&mut scanner, &mut doc),
                "BLOCKS" => self.parse_blocks(&mut scanner, &mut doc),
                "ENTITIES" => self.parse_entities(&mut scanner, &mut doc),
                _ => {}
            }
        }

        if let Some(err) = scanner.take_err() {
            return Err(err.into());
        }
        log::debug!(
            "parsed {} block(s), {} dimension style(s), {} top-level entit(ies)",
            doc.blocks.len(),
            doc.dim_styles.len(),
            doc.entities.len()
        );
        Ok(doc)
    }

    /// Leaves the scanner on ENDSEC.
    fn parse_tables<R: BufRead>(&self, scanner: &mut Scanner<R>, doc: &mut Document) {
        while scanner.advance() {
            let tag = scanner.last_tag();
            if tag.is_marker("ENDSEC") {
                return;
            }
            if !tag.is_marker("TABLE") {
                continue;
            }
            if !scanner.advance() {
                return;
            }
            if scanner.last_tag().as_str().eq_ignore_ascii_case("DIMSTYLE") {
                parse_dim_styles(scanner, doc);
                if scanner.last_tag().is_marker("ENDSEC") {
                    return;
                }
            }
        }
    }

    /// Leaves the scanner on ENDSEC.
    fn parse_blocks<R: BufRead>(&self, scanner: &mut Scanner<R>, doc: &mut Document) {
        let mut current: Option<Block> = None;

        while scanner.advance() {
            loop {
                let tag = scanner.last_tag();
                if tag.code != 0 {
                    break;
                }
                if tag.is_marker("ENDSEC") {
                    finish_block(doc, current.take());
                    return;
                }
                if tag.is_marker("ENDBLK") {
                    finish_block(doc, current.take());
                    break;
                }
                if tag.is_marker("BLOCK") {
                    finish_block(doc, current.take());
                    let name = read_block_name(scanner);
                    current = Some(Block {
                        name,
                        entities: Vec::new(),
                    });
                    // The name scan may have stopped on the next code-0 tag.
                    if scanner.last_tag().code == 0 && !scanner.is_done() {
                        continue;
                    }
                    break;
                }

                let Some(block) = current.as_mut() else {
                    break;
                };
                let Some(mut entity) = self.registry.create(&tag.value) else {
                    log::trace!("skip {} in block {:?}", tag.as_str(), block.name);
                    break;
                };
                entity.parse(scanner, self.registry);
                block.entities.push(entity);
                if scanner.is_done() {
                    break;
                }
            }
        }

        finish_block(doc, current);
    }

    /// Leaves the scanner on ENDSEC.
    fn parse_entities<R: BufRead>(&self, scanner: &mut Scanner<R>, doc: &mut Document) {
        loop {
            let tag = scanner.last_tag();
            if tag.is_marker("ENDSEC") {
                return;
            }
            if tag.code == 0 {
                match self.registry.create(&tag.value) {
                    Some(mut entity) => {
                        entity.parse(scanner, self.registry);
                        doc.entities.push(entity);
                        if scanner.is_done() {
                            return;
                        }
                        continue;
                    }
                    None => log::trace!("skip entity {}", tag.as_str()),
                }
            }
            if !scanner.advance() {
                return;
            }
        }
    }
}

/// Reads up to the block's name tag (code 2). Stops early on a code-0 tag.
fn read_block_name<R: BufRead>(scanner: &mut Scanner<R>) -> String {
    while scanner.advance() {
        let tag = scanner.last_tag();
        if tag.code == 2 {
            return tag.as_str().to_string();
        }
        if tag.code == 0 {
            break;
        }
    }
    String::new()
}

fn finish_block(doc: &mut Document, block: Option<Block>) {
    let Some(block) = block else {
        return;
    };
    if block.name.is_empty() {
        log::warn!("dropping unnamed block with {} entit(ies)", block.entities.len());
        return;
    }
    log::debug!("block {} with {} entit(ies)", block.name, block.entities.len());
    doc.insert_block(block);
}

/// Reads DIMSTYLE entries starting from the table-name tag. Leaves the
/// scanner on ENDTAB (or ENDSEC for a truncated table).
fn parse_dim_styles<R: BufRead>(scanner: &mut Scanner<R>, doc: &mut Document) {
    loop {
        let tag = scanner.last_tag();
        if tag.is_marker("ENDTAB") || tag.is_marker("ENDSEC") {
            return;
        }
        if tag.is_marker("DIMSTYLE") {
            let mut style = DimStyle::default();
            while scanner.advance() {
                let t = scanner.last_tag();
                match t.code {
                    0 => break,
                    2 => style.name = t.as_str().to_string(),
                    271 => style.precision = t.as_i32(),
                    44 => style.extension = t.as_f64(),
                    40 => style.scale = t.as_f64(),
                    _ => {}
                }
            }
            if !style.name.is_empty() {
                doc.insert_dim_style(style);
            }
            if scanner.is_done() {
                return;
            }
            // Already on the next code-0 tag.
            continue;
        }
        if !scanner.advance() {
            return;
        }
    }
}
