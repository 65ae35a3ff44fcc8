//! services/app/src/adapters/extract.rs
//!
//! This module contains the adapter that turns uploaded documents into plain text.
//! It implements the `DocumentExtractor` port from the `core` crate.
//!
//! Office documents are zip archives of XML parts. Parts are read with `quick-xml`,
//! matching elements and attributes by local name so namespace prefixes don't matter.

use std::{
    collections::HashMap,
    io::{Cursor, Read},
};

use async_trait::async_trait;
use quick_xml::{events::Event, Reader};
use study_aid_core::{
    domain::{DocumentKind, UploadedFile},
    ports::{DocumentExtractor, PortError, PortResult},
};
use tracing::info;
use zip::ZipArchive;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone, Default)]
pub struct FileExtractor;

impl FileExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractor for FileExtractor {
    async fn extract_text(&self, file: &UploadedFile) -> PortResult<String> {
        let kind = file
            .kind()
            .ok_or_else(|| PortError::UnsupportedInput(file.file_name.clone()))?;
        info!("Extracting text from {} as {:?}.", file.file_name, kind);

        match kind {
            DocumentKind::PlainText => Ok(String::from_utf8_lossy(&file.bytes).into_owned()),
            DocumentKind::Pdf => {
                let bytes = file.bytes.clone();
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await
                    .map_err(|e| PortError::Unexpected(format!("PDF extraction task failed: {}", e)))?
                    .map_err(|e| PortError::MalformedResponse(format!("Could not read PDF: {}", e)))
            }
            DocumentKind::Spreadsheet => spreadsheet_text(&file.bytes),
            DocumentKind::SlideDeck => slide_deck_text(&file.bytes),
        }
    }
}

//=========================================================================================
// Spreadsheets (.xlsx)
//=========================================================================================

/// The widest sheet Excel allows (`XFD`).
const MAX_COLUMNS: usize = 16_384;

/// `Sheet: <name>` followed by one tab-joined line per row, for every sheet in
/// workbook order.
pub fn spreadsheet_text(bytes: &[u8]) -> PortResult<String> {
    let mut archive = open_archive(bytes)?;
    let workbook = read_part(&mut archive, "xl/workbook.xml")?;
    let shared = match read_part(&mut archive, "xl/sharedStrings.xml") {
        Ok(xml) => shared_strings(&xml)?,
        Err(_) => Vec::new(),
    };
    let targets = match read_part(&mut archive, "xl/_rels/workbook.xml.rels") {
        Ok(xml) => relationship_targets(&xml)?,
        Err(_) => HashMap::new(),
    };

    let mut text = String::new();
    for (index, (name, rel_id)) in workbook_sheets(&workbook)?.into_iter().enumerate() {
        let part = match rel_id.and_then(|id| targets.get(&id)) {
            Some(target) => format!("xl/{}", target.trim_start_matches("/xl/")),
            None => format!("xl/worksheets/sheet{}.xml", index + 1),
        };
        let sheet = read_part(&mut archive, &part)?;

        text.push_str(&format!("Sheet: {}\n\n", name));
        for row in sheet_rows(&sheet, &shared)? {
            text.push_str(&row.join("\t"));
            text.push('\n');
        }
        text.push('\n');
    }
    Ok(text)
}

/// Sheet names with their relationship ids, in workbook order.
fn workbook_sheets(xml: &str) -> PortResult<Vec<(String, Option<String>)>> {
    let mut sheets = Vec::new();
    walk(xml, |node| {
        if let XmlNode::Open { name, attrs, .. } = node {
            if name == b"sheet" {
                let sheet_name = attr(&attrs, b"name").unwrap_or_default();
                sheets.push((sheet_name, attr(&attrs, b"id")));
            }
        }
        Ok(())
    })?;
    Ok(sheets)
}

fn relationship_targets(xml: &str) -> PortResult<HashMap<String, String>> {
    let mut targets = HashMap::new();
    walk(xml, |node| {
        if let XmlNode::Open { name, attrs, .. } = node {
            if name == b"Relationship" {
                if let (Some(id), Some(target)) = (attr(&attrs, b"Id"), attr(&attrs, b"Target")) {
                    targets.insert(id, target);
                }
            }
        }
        Ok(())
    })?;
    Ok(targets)
}

/// One string per `<si>`; rich-text runs are concatenated, phonetic hints skipped.
fn shared_strings(xml: &str) -> PortResult<Vec<String>> {
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut phonetic_depth = 0usize;

    walk(xml, |node| {
        match node {
            XmlNode::Open { name, empty, .. } => match name.as_slice() {
                b"si" if empty => strings.push(String::new()),
                b"si" => current = Some(String::new()),
                b"t" => in_text = !empty,
                b"rPh" if !empty => phonetic_depth += 1,
                _ => {}
            },
            XmlNode::Close(name) => match name.as_slice() {
                b"si" => strings.extend(current.take()),
                b"t" => in_text = false,
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                _ => {}
            },
            XmlNode::Text(text) => {
                if let (true, 0, Some(current)) = (in_text, phonetic_depth, current.as_mut()) {
                    current.push_str(&text);
                }
            }
        }
        Ok(())
    })?;
    Ok(strings)
}

/// The cell being read inside a `<row>`.
#[derive(Default)]
struct CellState {
    column: Option<usize>,
    cell_type: Option<String>,
    value: String,
    capturing: bool,
}

/// Cell values row by row. Gaps between referenced columns become empty cells.
fn sheet_rows(xml: &str, shared: &[String]) -> PortResult<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row: Option<Vec<String>> = None;
    let mut cell: Option<CellState> = None;

    walk(xml, |node| {
        match node {
            XmlNode::Open { name, attrs, empty } => match name.as_slice() {
                b"row" if !empty => row = Some(Vec::new()),
                b"c" if !empty => {
                    let column = match attr(&attrs, b"r") {
                        Some(reference) => column_index(&reference)?,
                        None => None,
                    };
                    cell = Some(CellState {
                        column,
                        cell_type: attr(&attrs, b"t"),
                        ..CellState::default()
                    });
                }
                b"v" | b"t" if !empty => {
                    if let Some(cell) = cell.as_mut() {
                        cell.capturing = true;
                    }
                }
                _ => {}
            },
            XmlNode::Text(text) => {
                if let Some(cell) = cell.as_mut().filter(|cell| cell.capturing) {
                    cell.value.push_str(&text);
                }
            }
            XmlNode::Close(name) => match name.as_slice() {
                b"v" | b"t" => {
                    if let Some(cell) = cell.as_mut() {
                        cell.capturing = false;
                    }
                }
                b"c" => {
                    if let (Some(done), Some(cells)) = (cell.take(), row.as_mut()) {
                        if let Some(column) = done.column {
                            while cells.len() < column {
                                cells.push(String::new());
                            }
                        }
                        cells.push(cell_value(done, shared));
                    }
                }
                b"row" => {
                    if let Some(mut cells) = row.take() {
                        while cells.last().is_some_and(|cell| cell.is_empty()) {
                            cells.pop();
                        }
                        if !cells.is_empty() {
                            rows.push(cells);
                        }
                    }
                }
                _ => {}
            },
        }
        Ok(())
    })?;
    Ok(rows)
}

fn cell_value(cell: CellState, shared: &[String]) -> String {
    match cell.cell_type.as_deref() {
        Some("s") => cell
            .value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| shared.get(index).cloned())
            .unwrap_or_default(),
        _ => cell.value,
    }
}

/// Zero-based column of a cell reference such as `B7`. `None` when the reference
/// carries no column letters; an error when the column is past `XFD`.
fn column_index(reference: &str) -> PortResult<Option<usize>> {
    let letters: &str = reference
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or("");
    if letters.is_empty() {
        return Ok(None);
    }

    let out_of_range = || PortError::MalformedResponse(format!("Cell reference {} is out of range", reference));
    let mut column = 0usize;
    for letter in letters.bytes() {
        let digit = usize::from(letter.to_ascii_uppercase() - b'A') + 1;
        column = column
            .checked_mul(26)
            .and_then(|value| value.checked_add(digit))
            .filter(|value| *value <= MAX_COLUMNS)
            .ok_or_else(out_of_range)?;
    }
    Ok(Some(column - 1))
}

//=========================================================================================
// Slide decks (.pptx)
//=========================================================================================

/// `--- Slide N ---` followed by the slide's text runs, for every slide in order.
pub fn slide_deck_text(bytes: &[u8]) -> PortResult<String> {
    let mut archive = open_archive(bytes)?;
    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_by_key(|(number, _)| *number);

    let mut text = String::new();
    for (position, (_, part)) in slides.iter().enumerate() {
        let xml = read_part(&mut archive, part)?;
        text.push_str(&format!("--- Slide {} ---\n", position + 1));
        for run in slide_runs(&xml)? {
            text.push_str(&run);
            text.push(' ');
        }
        text.push_str("\n\n");
    }
    Ok(text)
}

/// The text of every `<a:t>` run, in document order.
fn slide_runs(xml: &str) -> PortResult<Vec<String>> {
    let mut runs = Vec::new();
    let mut current: Option<String> = None;
    walk(xml, |node| {
        match node {
            XmlNode::Open { name, empty, .. } if name == b"t" => {
                if empty {
                    runs.push(String::new());
                } else {
                    current = Some(String::new());
                }
            }
            XmlNode::Text(text) => {
                if let Some(current) = current.as_mut() {
                    current.push_str(&text);
                }
            }
            XmlNode::Close(name) if name == b"t" => runs.extend(current.take()),
            _ => {}
        }
        Ok(())
    })?;
    Ok(runs)
}

//=========================================================================================
// Helpers
//=========================================================================================

/// An XML event reduced to what the extractors need. Names are local (no prefix).
enum XmlNode {
    Open {
        name: Vec<u8>,
        attrs: Vec<(Vec<u8>, String)>,
        empty: bool,
    },
    Close(Vec<u8>),
    Text(String),
}

/// Streams `xml` through `on_node`. Malformed XML is a `MalformedResponse`.
fn walk(xml: &str, mut on_node: impl FnMut(XmlNode) -> PortResult<()>) -> PortResult<()> {
    let malformed = |e: quick_xml::Error| PortError::MalformedResponse(format!("Invalid XML: {}", e));
    let mut reader = Reader::from_str(xml);

    loop {
        let node = match reader.read_event().map_err(malformed)? {
            Event::Start(start) => open_node(&start, false)?,
            Event::Empty(start) => open_node(&start, true)?,
            Event::End(end) => XmlNode::Close(end.local_name().as_ref().to_vec()),
            Event::Text(text) => XmlNode::Text(text.unescape().map_err(malformed)?.into_owned()),
            Event::CData(data) => {
                XmlNode::Text(String::from_utf8_lossy(&data.into_inner()).into_owned())
            }
            Event::Eof => return Ok(()),
            _ => continue,
        };
        on_node(node)?;
    }
}

fn open_node(start: &quick_xml::events::BytesStart<'_>, empty: bool) -> PortResult<XmlNode> {
    let mut attrs = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute
            .map_err(|e| PortError::MalformedResponse(format!("Invalid XML attribute: {}", e)))?;
        let value = attribute
            .unescape_value()
            .map_err(|e| PortError::MalformedResponse(format!("Invalid XML attribute: {}", e)))?
            .into_owned();
        attrs.push((attribute.key.local_name().as_ref().to_vec(), value));
    }
    Ok(XmlNode::Open {
        name: start.local_name().as_ref().to_vec(),
        attrs,
        empty,
    })
}

fn attr(attrs: &[(Vec<u8>, String)], name: &[u8]) -> Option<String> {
    attrs
        .iter()
        .find(|(key, _)| key.as_slice() == name)
        .map(|(_, value)| value.clone())
}

fn open_archive(bytes: &[u8]) -> PortResult<ZipArchive<Cursor<&[u8]>>> {
    ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| PortError::MalformedResponse(format!("Not a valid Office document: {}", e)))
}

fn read_part(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> PortResult<String> {
    let mut part = archive
        .by_name(name)
        .map_err(|e| PortError::MalformedResponse(format!("Missing {}: {}", name, e)))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| PortError::MalformedResponse(format!("Unreadable {}: {}", name, e)))?;
    Ok(xml)
}
