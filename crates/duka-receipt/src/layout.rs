//! # Page Layout
//!
//! Places every receipt line on a page before anything is drawn.
//!
//! ## Coordinates
//! ```text
//!  (0,0) ──────────────────────── x (mm) ──────────────► 210
//!    │   ┌──────────────────────────────────────────────┐
//!    │   │        top margin (20)                       │
//!    │   │   ┌──────────────────────────────────────┐   │
//!    y   │ 15│ Item                 Qty  Unit  Total│15 │
//!  (mm)  │   │ Orthopedic Knee        2  2,500 5,000│   │
//!    │   │   │ Brace                   ▲      ▲    ▲│   │
//!    │   │   │                         └ right-aligned │
//!    ▼   │   └──────────────────────────────────────┘   │
//!   297  │        bottom margin (20)                    │
//!        └──────────────────────────────────────────────┘
//! ```
//! `y` grows downward and is the top of each text line. The PDF writer
//! flips it when drawing.
//!
//! ## Page Breaks
//! A row (all wrapped name lines plus its numbers) is never split. If it
//! would cross the bottom margin it moves to a new page that starts at the
//! top margin with the column header repeated.

use serde::{Deserialize, Serialize};

use crate::receipt::{Receipt, ReceiptRow};

/// Millimetres per typographic point.
pub const PT_TO_MM: f32 = 0.352_778;

/// Courier advance width as a fraction of the font size.
const MONO_ADVANCE_EM: f32 = 0.6;

const BODY_PT: f32 = 10.0;
const ISSUER_PT: f32 = 14.0;
const ADDRESS_PT: f32 = 9.0;
const TITLE_PT: f32 = 12.0;
const TOTAL_PT: f32 = 11.0;
const FOOTER_PT: f32 = 9.0;

/// Page size, margins and column positions, all in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    #[serde(default = "default_page_width")]
    pub page_width_mm: f32,

    #[serde(default = "default_page_height")]
    pub page_height_mm: f32,

    #[serde(default = "default_vertical_margin")]
    pub top_margin_mm: f32,

    #[serde(default = "default_vertical_margin")]
    pub bottom_margin_mm: f32,

    #[serde(default = "default_horizontal_margin")]
    pub left_margin_mm: f32,

    #[serde(default = "default_horizontal_margin")]
    pub right_margin_mm: f32,

    /// Line advance for 10 pt body text; other sizes scale from it.
    #[serde(default = "default_line_height")]
    pub line_height_mm: f32,

    /// Right edge of the quantity column.
    #[serde(default = "default_qty_column")]
    pub qty_column_mm: f32,

    /// Right edge of the unit price column.
    #[serde(default = "default_unit_column")]
    pub unit_column_mm: f32,

    /// Space kept free above the header on the first page (the logo).
    #[serde(skip)]
    pub reserved_top_mm: f32,
}

fn default_page_width() -> f32 {
    210.0
}
fn default_page_height() -> f32 {
    297.0
}
fn default_vertical_margin() -> f32 {
    20.0
}
fn default_horizontal_margin() -> f32 {
    15.0
}
fn default_line_height() -> f32 {
    5.5
}
fn default_qty_column() -> f32 {
    125.0
}
fn default_unit_column() -> f32 {
    160.0
}

impl Default for PageGeometry {
    /// A4 portrait.
    fn default() -> Self {
        PageGeometry {
            page_width_mm: default_page_width(),
            page_height_mm: default_page_height(),
            top_margin_mm: default_vertical_margin(),
            bottom_margin_mm: default_vertical_margin(),
            left_margin_mm: default_horizontal_margin(),
            right_margin_mm: default_horizontal_margin(),
            line_height_mm: default_line_height(),
            qty_column_mm: default_qty_column(),
            unit_column_mm: default_unit_column(),
            reserved_top_mm: 0.0,
        }
    }
}

impl PageGeometry {
    /// Right edge of the line total column.
    pub fn total_column_mm(&self) -> f32 {
        self.page_width_mm - self.right_margin_mm
    }

    /// Lowest `y` a line may extend to.
    pub fn content_bottom_mm(&self) -> f32 {
        self.page_height_mm - self.bottom_margin_mm
    }

    fn advance(&self, size_pt: f32) -> f32 {
        self.line_height_mm * size_pt / BODY_PT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// One positioned run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub text: String,
    /// Left edge.
    pub x_mm: f32,
    /// Top of the line, measured down from the top of the page.
    pub y_mm: f32,
    pub size_pt: f32,
    pub weight: FontWeight,
}

/// Everything placed on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// 1-based page number.
    pub number: usize,
    pub elements: Vec<TextElement>,
}

impl PageLayout {
    /// Top of the first line on the page.
    pub fn first_y(&self) -> Option<f32> {
        self.elements
            .iter()
            .map(|e| e.y_mm)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Bottom of the last line on the page.
    pub fn bottom_y(&self, geometry: &PageGeometry) -> Option<f32> {
        self.elements
            .iter()
            .map(|e| e.y_mm + geometry.advance(e.size_pt))
            .max_by(|a, b| a.total_cmp(b))
    }

    /// Whether any element's text equals `text`.
    pub fn contains_text(&self, text: &str) -> bool {
        self.elements.iter().any(|e| e.text == text)
    }
}

/// Width of `text` set in Courier at `size_pt`.
pub fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * MONO_ADVANCE_EM * size_pt * PT_TO_MM
}

// =============================================================================
// Line Building
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Left(f32),
    Right(f32),
}

#[derive(Debug, Clone)]
struct Run {
    text: String,
    anchor: Anchor,
}

#[derive(Debug, Clone)]
struct Line {
    runs: Vec<Run>,
    size_pt: f32,
    weight: FontWeight,
}

impl Line {
    fn left(text: impl Into<String>, x: f32, size_pt: f32, weight: FontWeight) -> Self {
        Line {
            runs: vec![Run {
                text: text.into(),
                anchor: Anchor::Left(x),
            }],
            size_pt,
            weight,
        }
    }

    fn right(mut self, text: impl Into<String>, right_edge: f32) -> Self {
        self.runs.push(Run {
            text: text.into(),
            anchor: Anchor::Right(right_edge),
        });
        self
    }
}

fn column_header(g: &PageGeometry) -> Vec<Line> {
    vec![
        Line::left("Item", g.left_margin_mm, BODY_PT, FontWeight::Bold)
            .right("Qty", g.qty_column_mm)
            .right("Unit", g.unit_column_mm)
            .right("Total", g.total_column_mm()),
        rule(g),
    ]
}

fn rule(g: &PageGeometry) -> Line {
    let width = g.total_column_mm() - g.left_margin_mm;
    let count = (width / text_width_mm("-", BODY_PT)).floor() as usize;
    Line::left("-".repeat(count), g.left_margin_mm, BODY_PT, FontWeight::Regular)
}

fn row_lines(row: &ReceiptRow, g: &PageGeometry) -> Vec<Line> {
    row.name_lines
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let line = Line::left(name.as_str(), g.left_margin_mm, BODY_PT, FontWeight::Regular);
            if i == 0 {
                line.right(row.quantity.to_string(), g.qty_column_mm)
                    .right(row.unit_price.as_str(), g.unit_column_mm)
                    .right(row.line_total.as_str(), g.total_column_mm())
            } else {
                line
            }
        })
        .collect()
}

// =============================================================================
// Paginator
// =============================================================================

struct Paginator<'g> {
    geometry: &'g PageGeometry,
    pages: Vec<PageLayout>,
    current: PageLayout,
    cursor: f32,
}

impl<'g> Paginator<'g> {
    fn new(geometry: &'g PageGeometry) -> Self {
        Paginator {
            geometry,
            pages: Vec::new(),
            current: PageLayout {
                number: 1,
                elements: Vec::new(),
            },
            cursor: geometry.top_margin_mm + geometry.reserved_top_mm,
        }
    }

    fn height(&self, lines: &[Line]) -> f32 {
        lines.iter().map(|l| self.geometry.advance(l.size_pt)).sum()
    }

    fn fits(&self, lines: &[Line]) -> bool {
        self.cursor + self.height(lines) <= self.geometry.content_bottom_mm()
    }

    fn break_page(&mut self) {
        let number = self.current.number + 1;
        let finished = std::mem::replace(
            &mut self.current,
            PageLayout {
                number,
                elements: Vec::new(),
            },
        );
        self.pages.push(finished);
        self.cursor = self.geometry.top_margin_mm;
    }

    /// Places lines as one unit, breaking first if they do not fit.
    fn place(&mut self, lines: Vec<Line>) {
        if !self.fits(&lines) && !self.current.elements.is_empty() {
            self.break_page();
        }
        for line in lines {
            for run in line.runs {
                let x_mm = match run.anchor {
                    Anchor::Left(x) => x,
                    Anchor::Right(edge) => edge - text_width_mm(&run.text, line.size_pt),
                };
                self.current.elements.push(TextElement {
                    text: run.text,
                    x_mm,
                    y_mm: self.cursor,
                    size_pt: line.size_pt,
                    weight: line.weight,
                });
            }
            self.cursor += self.geometry.advance(line.size_pt);
        }
    }

    /// Half a body line of vertical space, dropped at the top of a page.
    fn gap(&mut self) {
        if !self.current.elements.is_empty() {
            self.cursor += self.geometry.line_height_mm / 2.0;
        }
    }

    fn finish(mut self) -> Vec<PageLayout> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Lays out a receipt across as many pages as it needs.
pub fn paginate(receipt: &Receipt, geometry: &PageGeometry) -> Vec<PageLayout> {
    let g = geometry;
    let mut p = Paginator::new(g);

    p.place(vec![Line::left(&receipt.issuer.name, g.left_margin_mm, ISSUER_PT, FontWeight::Bold)]);
    for address in &receipt.issuer.address {
        p.place(vec![Line::left(address, g.left_margin_mm, ADDRESS_PT, FontWeight::Regular)]);
    }
    p.gap();
    p.place(vec![Line::left(&receipt.title, g.left_margin_mm, TITLE_PT, FontWeight::Bold)]);
    p.gap();
    for (label, value) in receipt.metadata() {
        let text = format!("{:<10}{}", format!("{}:", label), value);
        p.place(vec![Line::left(text, g.left_margin_mm, BODY_PT, FontWeight::Regular)]);
    }
    p.gap();

    p.place(column_header(g));
    for row in &receipt.rows {
        let lines = row_lines(row, g);
        if !p.fits(&lines) {
            p.break_page();
            p.place(column_header(g));
        }
        p.place(lines);
    }

    p.place(vec![
        rule(g),
        Line::left("TOTAL", g.left_margin_mm, TOTAL_PT, FontWeight::Bold)
            .right(receipt.grand_total.as_str(), g.total_column_mm()),
    ]);
    p.gap();
    p.place(vec![Line::left(&receipt.footer, g.left_margin_mm, FOOTER_PT, FontWeight::Regular)]);

    p.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::Issuer;
    use crate::test_support::sale_with;
    use duka_core::CurrencyFormat;

    fn receipt(rows: usize) -> Receipt {
        let names: Vec<String> = (0..rows)
            .map(|i| format!("Elastic Compression Stocking Size {} Extra Long Variant", i))
            .collect();
        let items: Vec<(&str, i64, i64)> = names.iter().map(|n| (n.as_str(), 1250, 2)).collect();
        let sale = sale_with(&items);
        let issuer = Issuer {
            name: "Duka Orthopedics".to_string(),
            address: vec!["Moi Avenue".to_string(), "Nairobi".to_string()],
        };
        Receipt::from_sale(&sale, &issuer, &CurrencyFormat::default())
    }

    #[test]
    fn test_short_receipt_fits_one_page() {
        let geometry = PageGeometry::default();
        let pages = paginate(&receipt(2), &geometry);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].first_y(), Some(geometry.top_margin_mm));
        assert!(pages[0].contains_text("SALES RECEIPT"));
        assert!(pages[0].contains_text("Thank you for your business!"));
        assert!(pages[0].contains_text("KES 5,000"));
    }

    #[test]
    fn test_long_receipt_spans_pages_and_continues_at_top_margin() {
        let geometry = PageGeometry::default();
        let pages = paginate(&receipt(60), &geometry);

        assert!(pages.len() > 1);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
            assert!(page.bottom_y(&geometry).unwrap() <= geometry.content_bottom_mm() + 0.001);
        }
        for page in &pages[1..] {
            assert_eq!(page.first_y(), Some(geometry.top_margin_mm));
            assert!(page.contains_text("Item"));
        }
        assert!(pages.last().unwrap().contains_text("Thank you for your business!"));
    }

    #[test]
    fn test_wrapped_row_is_never_split() {
        let geometry = PageGeometry::default();
        let pages = paginate(&receipt(60), &geometry);

        let mut rows = 0;
        for page in &pages {
            let starts = page.elements.iter().filter(|e| e.text.starts_with("Elastic")).count();
            let ends = page.elements.iter().filter(|e| e.text.ends_with("Variant")).count();
            assert_eq!(starts, ends, "page {} splits a row", page.number);
            rows += starts;
        }
        assert_eq!(rows, 60);
    }

    #[test]
    fn test_numbers_are_right_aligned() {
        let geometry = PageGeometry::default();
        let pages = paginate(&receipt(1), &geometry);

        let total = pages[0]
            .elements
            .iter()
            .find(|e| e.text == "2,500")
            .unwrap();
        let right_edge = total.x_mm + text_width_mm(&total.text, total.size_pt);
        assert!((right_edge - geometry.total_column_mm()).abs() < 0.001);
    }

    #[test]
    fn test_reserved_top_pushes_first_page_only() {
        let geometry = PageGeometry {
            reserved_top_mm: 25.0,
            ..PageGeometry::default()
        };
        let pages = paginate(&receipt(60), &geometry);

        assert_eq!(pages[0].first_y(), Some(45.0));
        assert_eq!(pages[1].first_y(), Some(20.0));
    }

    #[test]
    fn test_geometry_from_partial_toml() {
        let geometry: PageGeometry = toml::from_str("top_margin_mm = 30.0").unwrap();
        assert_eq!(geometry.top_margin_mm, 30.0);
        assert_eq!(geometry.left_margin_mm, 15.0);
        assert_eq!(geometry.page_height_mm, 297.0);
    }
}
