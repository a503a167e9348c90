//! PDF inventory report.
//!
//! A4 pages in the built-in Helvetica faces: a header with the company and
//! title, a footer with the page number and generation time, a summary table
//! of every unit in the inventory, then one section per unit with its
//! intervention history. The layout is first built as a list of [`Block`]s
//! and then drawn, so pagination and wrapping can be checked without a PDF.

use super::equipment::{Equipment, Intervention};
use super::formatter::{now_stamp, or_placeholder};
use super::messages::Message;
use crate::msg_bail_anyhow;
use anyhow::Result;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const HEADER_Y: f32 = PAGE_HEIGHT - 12.0;
const FOOTER_Y: f32 = 10.0;
const BODY_TOP: f32 = PAGE_HEIGHT - 28.0;
const BODY_BOTTOM: f32 = 22.0;
const LINE_HEIGHT: f32 = 5.0;
const INDENT: f32 = 6.0;

/// Characters per line at body size; Helvetica averages about half an em.
pub const WRAP_WIDTH: usize = 92;

/// x offsets of the summary table columns, with their character budgets.
const SUMMARY_COLUMNS: [(f32, usize); 4] = [(0.0, 16), (34.0, 28), (92.0, 30), (150.0, 18)];

pub struct ReportEntry {
    pub record: Equipment,
    pub history: Vec<Intervention>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    TableHeader([String; 4]),
    TableRow([String; 4]),
    Field(String, String),
    Text(String),
    Indented(String),
    Spacer,
    PageBreak,
}

/// Folds accented letters to ASCII; the built-in PDF fonts only cover a
/// Latin-1 style encoding and would garble the rest.
pub fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'Á' | 'À' | 'Ä' | 'Â' => 'A',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            'ñ' => 'n',
            'Ñ' => 'N',
            'ç' => 'c',
            'Ç' => 'C',
            '\t' => ' ',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap; words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..width).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            if line.is_empty() {
                line = word;
            } else if line.chars().count() + 1 + word.chars().count() <= width {
                line.push(' ');
                line.push_str(&word);
            } else {
                lines.push(std::mem::replace(&mut line, word));
            }
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('~');
        clipped
    }
}

pub struct InventoryReport {
    company: String,
    title: String,
    generated_at: String,
}

impl InventoryReport {
    pub fn new(company: &str) -> Self {
        Self {
            company: company.to_string(),
            title: "Inventory equipment report".to_string(),
            generated_at: now_stamp(),
        }
    }

    pub fn blocks(&self, entries: &[ReportEntry]) -> Vec<Block> {
        let mut blocks = vec![
            Block::Title(self.title.clone()),
            Block::Spacer,
            Block::Heading(format!("Summary ({} units)", entries.len())),
            Block::TableHeader(["OT".into(), "Name".into(), "PN / SN".into(), "Status".into()]),
        ];
        for entry in entries {
            let r = &entry.record;
            blocks.push(Block::TableRow([
                r.order_number.clone(),
                r.name.clone(),
                format!("{} / {}", r.part_number, r.serial_number),
                r.current_status(),
            ]));
        }

        for entry in entries {
            let r = &entry.record;
            blocks.push(Block::PageBreak);
            blocks.push(Block::Heading(format!("OT {}", r.order_number)));
            blocks.push(Block::Field("Equipment name".into(), r.name.clone()));
            blocks.push(Block::Field("PN / SN".into(), format!("{} / {}", r.part_number, r.serial_number)));
            blocks.push(Block::Field("Entered".into(), or_placeholder(&r.entry_date, "N/A")));
            blocks.push(Block::Field("Current status".into(), r.current_status()));
            blocks.push(Block::Spacer);
            blocks.push(Block::Heading("Intervention history".into()));
            if entry.history.is_empty() {
                blocks.push(Block::Indented("No interventions.".into()));
            }
            // Oldest first reads as a narrative
            for intervention in entry.history.iter().rev() {
                let stamp = or_placeholder(&intervention.timestamp, "legacy");
                for (i, line) in wrap(&format!("({}) {}", stamp, intervention.text), WRAP_WIDTH - 4).into_iter().enumerate() {
                    blocks.push(Block::Indented(if i == 0 { format!("- {}", line) } else { format!("  {}", line) }));
                }
            }
        }

        blocks
    }

    /// Renders the report; an empty inventory is refused.
    pub fn write(&self, entries: &[ReportEntry], path: &Path) -> Result<PathBuf> {
        if entries.is_empty() {
            msg_bail_anyhow!(Message::NothingToReport);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let title = pdf_safe(&self.title);
        let (doc, page, layer) = PdfDocument::new(title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let first = doc.get_page(page).get_layer(layer);

        let mut pen = Pen {
            doc,
            regular,
            bold,
            layer: first,
            y: BODY_TOP,
            page_no: 1,
            report: self,
        };
        pen.decorate();

        for block in self.blocks(entries) {
            pen.draw(&block);
        }

        let Pen { doc, page_no, .. } = pen;
        doc.save(&mut BufWriter::new(File::create(path)?))?;
        tracing::info!(path = %path.display(), units = entries.len(), pages = page_no, "inventory report written");
        Ok(path.to_path_buf())
    }
}

struct Pen<'r> {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    layer: PdfLayerReference,
    y: f32,
    page_no: usize,
    report: &'r InventoryReport,
}

impl Pen<'_> {
    fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(pdf_safe(text), size, Mm(x), Mm(y), font);
    }

    fn decorate(&self) {
        let header = format!("{}  |  {}", self.report.company, self.report.title);
        self.text(&header, 9.0, MARGIN, HEADER_Y, true);
        let footer = format!("Page {}  -  generated {}", self.page_no, self.report.generated_at);
        self.text(&footer, 8.0, MARGIN, FOOTER_Y, false);
    }

    fn new_page(&mut self) {
        self.page_no += 1;
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {}", self.page_no));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = BODY_TOP;
        self.decorate();
    }

    fn advance(&mut self, height: f32) {
        if self.y - height < BODY_BOTTOM {
            self.new_page();
        }
        self.y -= height;
    }

    fn draw(&mut self, block: &Block) {
        match block {
            Block::Title(title) => {
                self.advance(LINE_HEIGHT * 2.0);
                self.text(title, 16.0, MARGIN, self.y, true);
            }
            Block::Heading(heading) => {
                self.advance(LINE_HEIGHT * 1.5);
                self.text(heading, 12.0, MARGIN, self.y, true);
            }
            Block::TableHeader(cells) => self.row(cells, true),
            Block::TableRow(cells) => self.row(cells, false),
            Block::Field(label, value) => {
                let label = format!("{}: ", label);
                let lines = wrap(value, WRAP_WIDTH.saturating_sub(label.len()));
                for (i, line) in lines.iter().enumerate() {
                    self.advance(LINE_HEIGHT);
                    if i == 0 {
                        self.text(&label, 10.0, MARGIN, self.y, true);
                    }
                    self.text(line, 10.0, MARGIN + 36.0, self.y, false);
                }
            }
            Block::Text(text) => {
                for line in wrap(text, WRAP_WIDTH) {
                    self.advance(LINE_HEIGHT);
                    self.text(&line, 10.0, MARGIN, self.y, false);
                }
            }
            Block::Indented(text) => {
                self.advance(LINE_HEIGHT);
                self.text(text, 10.0, MARGIN + INDENT, self.y, false);
            }
            Block::Spacer => self.y -= LINE_HEIGHT,
            Block::PageBreak => self.new_page(),
        }
    }

    fn row(&mut self, cells: &[String; 4], header: bool) {
        self.advance(LINE_HEIGHT);
        for ((x, width), cell) in SUMMARY_COLUMNS.iter().zip(cells) {
            self.text(&clip(cell, *width), 9.0, MARGIN + x, self.y, header);
        }
    }
}
