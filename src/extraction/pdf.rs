//! PDF text, metadata and page-range extraction on top of `lopdf`.
//!
//! Text comes straight from page content streams. Each text-showing operator
//! yields one [`PageTextItem`] whose vertical position is the text matrix
//! translation mapped through the current transformation matrix, which is
//! enough to tell visual lines apart.

use std::collections::BTreeMap;

use lopdf::{
    content::{Content, Operation},
    Dictionary, Document, Object, ObjectId,
};
use serde::Serialize;

use crate::{
    errors::{AppError, AppResult},
    extraction::normalize::normalize_whitespace,
};

/// Kerning adjustment (thousandths of text space) treated as a word gap.
const TJ_SPACE_THRESHOLD: f64 = -250.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PageTextItem {
    pub text: String,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PdfMetadata {
    pub page_count: usize,
    pub info: BTreeMap<String, String>,
}

/// Best-effort metadata: failures are carried as a value, never raised.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PdfMetadataResult {
    Found(PdfMetadata),
    Failed { error: String },
}

/// Extracts the text of every page, rebuilding line breaks from the vertical
/// position of each fragment and normalizing whitespace afterwards.
pub fn extract_pdf_text(bytes: &[u8]) -> AppResult<String> {
    let doc = load(bytes)?;
    let pages = doc.get_pages();
    log::debug!("Extracting text from {} PDF page(s)", pages.len());

    let mut text = String::new();
    for (&page_number, &page_id) in pages.iter() {
        let items = page_text_items(&doc, page_number, page_id)?;
        text.push_str(&join_lines(&items));
        text.push_str("\n\n");
    }

    Ok(normalize_whitespace(&text))
}

/// Extracts `[start_page, end_page]` inclusive. The range is clamped to the
/// document; fragments are joined with single spaces and left unnormalized.
pub fn extract_pdf_page_range(
    bytes: &[u8],
    start_page: i64,
    end_page: Option<i64>,
) -> AppResult<String> {
    let doc = load(bytes)?;
    let pages = doc.get_pages();
    let (start, end) = clamp_page_range(start_page, end_page, pages.len());

    let mut text = String::new();
    if start > end {
        return Ok(text);
    }

    for (&page_number, &page_id) in pages.range(start..=end) {
        let items = page_text_items(&doc, page_number, page_id)?;
        let joined: Vec<&str> = items.iter().map(|item| item.text.as_str()).collect();
        text.push_str(&joined.join(" "));
        text.push_str("\n\n");
    }

    Ok(text)
}

pub fn extract_pdf_metadata(bytes: &[u8]) -> PdfMetadataResult {
    match read_metadata(bytes) {
        Ok(metadata) => PdfMetadataResult::Found(metadata),
        Err(err) => {
            log::warn!("PDF metadata unavailable: {}", err);
            PdfMetadataResult::Failed {
                error: err.to_string(),
            }
        }
    }
}

fn load(bytes: &[u8]) -> AppResult<Document> {
    Document::load_mem(bytes)
        .map_err(|e| AppError::ExtractionError(format!("Failed to load PDF: {}", e)))
}

/// Returns the 1-based inclusive page range to read. An empty range comes
/// back as `start > end`.
fn clamp_page_range(start_page: i64, end_page: Option<i64>, page_count: usize) -> (u32, u32) {
    let last = page_count as i64;
    let start = start_page.max(1);
    let end = match end_page {
        Some(end) if end <= last => end,
        _ => last,
    };

    let start = u32::try_from(start).unwrap_or(u32::MAX);
    let end = u32::try_from(end.max(0)).unwrap_or(0);
    (start, end)
}

/// Appends fragments in extraction order, breaking the line whenever the
/// vertical position changes from the previous fragment.
fn join_lines(items: &[PageTextItem]) -> String {
    let mut out = String::new();
    let mut last_y: Option<f64> = None;

    for item in items {
        if let Some(y) = last_y {
            if y != item.y {
                out.push('\n');
            }
        }
        out.push_str(&item.text);
        last_y = Some(item.y);
    }

    out
}

fn read_metadata(bytes: &[u8]) -> AppResult<PdfMetadata> {
    let doc = load(bytes)?;
    let page_count = doc.get_pages().len();

    let mut info = BTreeMap::new();
    if let Some(dict) = info_dictionary(&doc)? {
        for (key, value) in dict.iter() {
            if let Some(text) = object_to_string(&doc, value) {
                info.insert(String::from_utf8_lossy(key).into_owned(), text);
            }
        }
    }

    Ok(PdfMetadata { page_count, info })
}

fn info_dictionary(doc: &Document) -> AppResult<Option<&Dictionary>> {
    let Ok(info) = doc.trailer.get(b"Info") else {
        return Ok(None);
    };

    match info {
        Object::Reference(id) => Ok(Some(doc.get_dictionary(*id)?)),
        Object::Dictionary(dict) => Ok(Some(dict)),
        _ => Err(AppError::ExtractionError(
            "Info entry is not a dictionary".to_string(),
        )),
    }
}

fn object_to_string(doc: &Document, value: &Object) -> Option<String> {
    match value {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes, None)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Integer(i) => Some(i.to_string()),
        Object::Real(r) => Some(r.to_string()),
        Object::Boolean(b) => Some(b.to_string()),
        Object::Reference(id) => doc
            .get_object(*id)
            .ok()
            .and_then(|resolved| match resolved {
                Object::Reference(_) => None,
                other => object_to_string(doc, other),
            }),
        _ => None,
    }
}

/// Graphics state saved by `q` and restored by `Q`. The selected font is part
/// of it, so its encoding travels with the CTM.
#[derive(Clone, Debug)]
struct GraphicsState {
    ctm: [f64; 6],
    encoding: Option<String>,
}

/// Text state tracked while walking a content stream. Only the parts that
/// move the vertical position or change how strings decode matter here.
struct TextState {
    graphics: GraphicsState,
    graphics_stack: Vec<GraphicsState>,
    text_matrix: [f64; 6],
    line_matrix: [f64; 6],
    leading: f64,
}

const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Form XObjects nested deeper than this are skipped.
const MAX_FORM_DEPTH: usize = 8;

impl TextState {
    fn new() -> Self {
        Self {
            graphics: GraphicsState {
                ctm: IDENTITY,
                encoding: None,
            },
            graphics_stack: Vec::new(),
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            leading: 0.0,
        }
    }

    fn save(&mut self) {
        self.graphics_stack.push(self.graphics.clone());
    }

    fn restore(&mut self) {
        if let Some(graphics) = self.graphics_stack.pop() {
            self.graphics = graphics;
        }
    }

    fn begin_text(&mut self) {
        self.text_matrix = IDENTITY;
        self.line_matrix = IDENTITY;
    }

    fn set_text_matrix(&mut self, m: [f64; 6]) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        let m = multiply([1.0, 0.0, 0.0, 1.0, tx, ty], self.line_matrix);
        self.set_text_matrix(m);
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn y(&self) -> f64 {
        let device = multiply(self.text_matrix, self.graphics.ctm);
        device[5]
    }
}

/// `a × b` for PDF's row-vector affine matrices `[a b c d e f]`.
fn multiply(a: [f64; 6], b: [f64; 6]) -> [f64; 6] {
    [
        a[0] * b[0] + a[1] * b[2],
        a[0] * b[1] + a[1] * b[3],
        a[2] * b[0] + a[3] * b[2],
        a[2] * b[1] + a[3] * b[3],
        a[4] * b[0] + a[5] * b[2] + b[4],
        a[4] * b[1] + a[5] * b[3] + b[5],
    ]
}

/// Fonts and form XObjects reachable by name from a content stream.
#[derive(Clone, Debug, Default)]
struct Resources {
    encodings: BTreeMap<Vec<u8>, String>,
    forms: BTreeMap<Vec<u8>, ObjectId>,
}

impl Resources {
    fn for_page(doc: &Document, page_id: ObjectId) -> Self {
        let encodings = doc
            .get_page_fonts(page_id)
            .into_iter()
            .map(|(name, font)| (name, font_encoding(doc, font)))
            .collect();

        let mut resources = Resources {
            encodings,
            forms: BTreeMap::new(),
        };

        // The page's own dictionary first, then whatever it inherits.
        let (direct, inherited) = doc.get_page_resources(page_id);
        let dicts = direct
            .into_iter()
            .chain(inherited.into_iter().filter_map(|id| doc.get_dictionary(id).ok()));
        for dict in dicts {
            for (name, id) in form_entries(doc, dict) {
                resources.forms.entry(name).or_insert(id);
            }
        }

        resources
    }

    /// Resources seen inside a form: its own entries on top of the caller's.
    fn for_form(&self, doc: &Document, form: &Dictionary) -> Self {
        let mut resources = self.clone();
        let Some(own) = form.get(b"Resources").ok().and_then(|r| resolve_dict(doc, r)) else {
            return resources;
        };

        if let Some(fonts) = own.get(b"Font").ok().and_then(|f| resolve_dict(doc, f)) {
            for (name, font) in fonts.iter() {
                if let Some(font) = resolve_dict(doc, font) {
                    resources
                        .encodings
                        .insert(name.clone(), font_encoding(doc, font));
                }
            }
        }
        resources.forms.extend(form_entries(doc, own));
        resources
    }
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn form_entries(doc: &Document, resources: &Dictionary) -> Vec<(Vec<u8>, ObjectId)> {
    let Some(xobjects) = resources.get(b"XObject").ok().and_then(|x| resolve_dict(doc, x)) else {
        return Vec::new();
    };

    xobjects
        .iter()
        .filter_map(|(name, value)| value.as_reference().ok().map(|id| (name.clone(), id)))
        .collect()
}

/// Name of the byte encoding of a simple font. A `/Differences` dictionary
/// contributes only its base encoding.
fn font_encoding(doc: &Document, font: &Dictionary) -> String {
    match font.get(b"Encoding") {
        Ok(Object::Name(name)) => String::from_utf8_lossy(name).into_owned(),
        Ok(other) => resolve_dict(doc, other)
            .and_then(|dict| dict.get(b"BaseEncoding").and_then(Object::as_name_str).ok())
            .unwrap_or("StandardEncoding")
            .to_string(),
        Err(_) => font.get_font_encoding().to_string(),
    }
}

fn page_text_items(doc: &Document, page_number: u32, page_id: ObjectId) -> AppResult<Vec<PageTextItem>> {
    let raw = doc.get_page_content(page_id).map_err(|e| {
        AppError::ExtractionError(format!("Failed to read page {}: {}", page_number, e))
    })?;
    let content = Content::decode(&raw).map_err(|e| {
        AppError::ExtractionError(format!("Failed to decode page {}: {}", page_number, e))
    })?;

    let mut walker = ContentWalker {
        doc,
        state: TextState::new(),
        items: Vec::new(),
        open_forms: Vec::new(),
    };
    walker.walk(&content.operations, &Resources::for_page(doc, page_id));

    Ok(walker.items)
}

struct ContentWalker<'a> {
    doc: &'a Document,
    state: TextState,
    items: Vec<PageTextItem>,
    open_forms: Vec<ObjectId>,
}

impl ContentWalker<'_> {
    fn walk(&mut self, operations: &[Operation], resources: &Resources) {
        for op in operations {
            let operands = &op.operands;
            let state = &mut self.state;
            match op.operator.as_str() {
                "q" => state.save(),
                "Q" => state.restore(),
                "cm" => {
                    if let Some(m) = matrix_operand(operands) {
                        state.graphics.ctm = multiply(m, state.graphics.ctm);
                    }
                }
                "BT" => state.begin_text(),
                "Tf" => {
                    state.graphics.encoding = operands
                        .first()
                        .and_then(|name| name.as_name().ok())
                        .and_then(|name| resources.encodings.get(name).cloned());
                }
                "Tm" => {
                    if let Some(m) = matrix_operand(operands) {
                        state.set_text_matrix(m);
                    }
                }
                "Td" => {
                    if let &[tx, ty] = numbers(operands).as_slice() {
                        state.move_line(tx, ty);
                    }
                }
                "TD" => {
                    if let &[tx, ty] = numbers(operands).as_slice() {
                        state.leading = -ty;
                        state.move_line(tx, ty);
                    }
                }
                "TL" => {
                    if let &[leading] = numbers(operands).as_slice() {
                        state.leading = leading;
                    }
                }
                "T*" => state.next_line(),
                "Tj" | "TJ" => self.push_item(operands.first()),
                "'" => {
                    state.next_line();
                    self.push_item(operands.first());
                }
                "\"" => {
                    state.next_line();
                    self.push_item(operands.get(2));
                }
                "Do" => {
                    let form = operands
                        .first()
                        .and_then(|name| name.as_name().ok())
                        .and_then(|name| resources.forms.get(name).copied());
                    if let Some(id) = form {
                        self.walk_form(id, resources);
                    }
                }
                _ => {}
            }
        }
    }

    /// Runs a form XObject as if its stream were inlined inside `q … Q`,
    /// with the form's `/Matrix` applied first.
    fn walk_form(&mut self, id: ObjectId, resources: &Resources) {
        if self.open_forms.contains(&id) || self.open_forms.len() >= MAX_FORM_DEPTH {
            log::debug!("Skipping nested form XObject {:?}", id);
            return;
        }

        let doc = self.doc;
        let Ok(stream) = doc.get_object(id).and_then(Object::as_stream) else {
            return;
        };
        if stream.dict.get(b"Subtype").and_then(Object::as_name).ok() != Some(b"Form".as_slice()) {
            return;
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let content = match Content::decode(&data) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping undecodable form XObject {:?}: {}", id, e);
                return;
            }
        };
        let form_resources = resources.for_form(doc, &stream.dict);

        let depth = self.state.graphics_stack.len();
        self.state.save();
        if let Some(matrix) = stream.dict.get(b"Matrix").ok().and_then(|m| m.as_array().ok()) {
            if let Some(m) = matrix_operand(matrix) {
                self.state.graphics.ctm = multiply(m, self.state.graphics.ctm);
            }
        }

        self.open_forms.push(id);
        self.walk(&content.operations, &form_resources);
        self.open_forms.pop();

        // Unbalanced `q` inside the form must not leak out of it.
        self.state.graphics_stack.truncate(depth + 1);
        self.state.restore();
    }

    fn push_item(&mut self, operand: Option<&Object>) {
        let Some(operand) = operand else { return };
        let text = operand_text(operand, self.state.graphics.encoding.as_deref());
        if !text.is_empty() {
            self.items.push(PageTextItem {
                text,
                y: self.state.y(),
            });
        }
    }
}

fn operand_text(operand: &Object, encoding: Option<&str>) -> String {
    match operand {
        Object::String(bytes, _) => decode_pdf_string(bytes, encoding),
        Object::Array(parts) => {
            let mut text = String::new();
            for part in parts {
                match part {
                    Object::String(bytes, _) => text.push_str(&decode_pdf_string(bytes, encoding)),
                    other => {
                        if number(other).is_some_and(|n| n <= TJ_SPACE_THRESHOLD) {
                            text.push(' ');
                        }
                    }
                }
            }
            text
        }
        _ => String::new(),
    }
}

/// Decodes a string operand. A UTF-16BE byte order mark wins; otherwise the
/// selected font's simple encoding is used when lopdf knows it, and strings
/// with no usable font encoding are read as UTF-8, then Latin-1.
fn decode_pdf_string(bytes: &[u8], encoding: Option<&str>) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match encoding {
        Some(
            name @ ("StandardEncoding" | "WinAnsiEncoding" | "MacRomanEncoding"
            | "MacExpertEncoding"),
        ) => Document::decode_text(Some(name), bytes),
        _ => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => bytes.iter().map(|&b| b as char).collect(),
        },
    }
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

fn numbers(operands: &[Object]) -> Vec<f64> {
    operands.iter().filter_map(number).collect()
}

fn matrix_operand(operands: &[Object]) -> Option<[f64; 6]> {
    match *numbers(operands).as_slice() {
        [a, b, c, d, e, f] => Some([a, b, c, d, e, f]),
        _ => None,
    }
}
