//! Minimal PDF writer.
//!
//! Emits PDF 1.4 documents with vector content streams and the
//! built-in Helvetica font, which is all the annotated-floorplan
//! overlay needs. Page content is built through [`ContentStream`],
//! a thin builder over PDF graphics operators working in page-space
//! coordinates (Y down, origin top-left); the writer flips to PDF's
//! Y-up device space when the page is added.

use std::fmt::Write as _;

/// One page awaiting assembly.
struct Page {
    width: f64,
    height: f64,
    content: String,
}

/// PDF graphics operator builder.
///
/// Coordinates passed in are page-space (Y down); the stream applies
/// the flip itself so callers never see device space.
pub struct ContentStream {
    height: f64,
    ops: String,
}

impl ContentStream {
    fn new(height: f64) -> Self {
        Self {
            height,
            ops: String::new(),
        }
    }

    fn flip(&self, y: f64) -> f64 {
        self.height - y
    }

    /// Set the stroke color from a `#rrggbb` string. Malformed colors
    /// fall back to black.
    pub fn stroke_color(&mut self, hex: &str) -> &mut Self {
        let (r, g, b) = parse_hex_color(hex);
        let _ = writeln!(self.ops, "{r:.3} {g:.3} {b:.3} RG");
        self
    }

    /// Set the fill color from a `#rrggbb` string.
    pub fn fill_color(&mut self, hex: &str) -> &mut Self {
        let (r, g, b) = parse_hex_color(hex);
        let _ = writeln!(self.ops, "{r:.3} {g:.3} {b:.3} rg");
        self
    }

    /// Set the stroke width.
    pub fn line_width(&mut self, width: f64) -> &mut Self {
        let _ = writeln!(self.ops, "{width:.2} w");
        self
    }

    /// Stroke a rectangle given by its top-left corner and size.
    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let _ = writeln!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} re S",
            x,
            self.flip(y + height),
            width,
            height
        );
        self
    }

    /// Fill a rectangle given by its top-left corner and size.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let _ = writeln!(
            self.ops,
            "{:.2} {:.2} {:.2} {:.2} re f",
            x,
            self.flip(y + height),
            width,
            height
        );
        self
    }

    /// Stroke a line segment.
    pub fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> &mut Self {
        let _ = writeln!(
            self.ops,
            "{:.2} {:.2} m {:.2} {:.2} l S",
            x0,
            self.flip(y0),
            x1,
            self.flip(y1)
        );
        self
    }

    /// Stroke an open polyline through the given points.
    pub fn polyline(&mut self, points: &[(f64, f64)]) -> &mut Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };
        let _ = write!(self.ops, "{:.2} {:.2} m", first.0, self.flip(first.1));
        for p in rest {
            let _ = write!(self.ops, " {:.2} {:.2} l", p.0, self.flip(p.1));
        }
        let _ = writeln!(self.ops, " S");
        self
    }

    /// Fill a closed polygon through the given points.
    pub fn fill_polygon(&mut self, points: &[(f64, f64)]) -> &mut Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };
        let _ = write!(self.ops, "{:.2} {:.2} m", first.0, self.flip(first.1));
        for p in rest {
            let _ = write!(self.ops, " {:.2} {:.2} l", p.0, self.flip(p.1));
        }
        let _ = writeln!(self.ops, " f");
        self
    }

    /// Draw text with its baseline at the given page point.
    pub fn text(&mut self, x: f64, y: f64, size: f64, content: &str) -> &mut Self {
        let _ = writeln!(
            self.ops,
            "BT /F1 {:.1} Tf {:.2} {:.2} Td ({}) Tj ET",
            size,
            x,
            self.flip(y),
            escape_pdf_string(content)
        );
        self
    }
}

/// Approximate width of Helvetica text, for label centering.
pub fn text_width(content: &str, size: f64) -> f64 {
    // Average glyph advance of ~0.5 em is close enough for layout
    content.chars().count() as f64 * size * 0.5
}

fn parse_hex_color(hex: &str) -> (f64, f64, f64) {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    // Length is in bytes; a multibyte color string must not reach the
    // channel slicing below
    if hex.len() != 6 || !hex.is_ascii() {
        return (0.0, 0.0, 0.0);
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map(|v| v as f64 / 255.0)
            .unwrap_or(0.0)
    };
    (channel(0..2), channel(2..4), channel(4..6))
}

fn escape_pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            '\n' | '\r' => out.push(' '),
            c if c.is_ascii() => out.push(c),
            // Helvetica with the standard encoding cannot represent
            // arbitrary unicode
            _ => out.push('?'),
        }
    }
    out
}

/// A multi-page PDF document under assembly.
#[derive(Default)]
pub struct PdfDocument {
    pages: Vec<Page>,
}

impl PdfDocument {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Add a page of the given size and draw it through the closure.
    pub fn add_page<F>(&mut self, width: f64, height: f64, draw: F)
    where
        F: FnOnce(&mut ContentStream),
    {
        let mut stream = ContentStream::new(height);
        draw(&mut stream);
        self.pages.push(Page {
            width,
            height,
            content: stream.ops,
        });
    }

    /// Serialize to PDF bytes.
    ///
    /// Object layout: 1 catalog, 2 page tree, 3 font, then a page
    /// object and a content object per page.
    pub fn render(&self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        out.extend_from_slice(b"%PDF-1.4\n");

        let page_object_ids: Vec<usize> =
            (0..self.pages.len()).map(|i| 4 + i * 2).collect();
        let kids = page_object_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");

        let push_object = |out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: String| {
            offsets.push(out.len());
            out.extend_from_slice(body.as_bytes());
        };

        push_object(
            &mut out,
            &mut offsets,
            "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_string(),
        );
        push_object(
            &mut out,
            &mut offsets,
            format!(
                "2 0 obj\n<< /Type /Pages /Kids [{kids}] /Count {} >>\nendobj\n",
                self.pages.len()
            ),
        );
        push_object(
            &mut out,
            &mut offsets,
            "3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n"
                .to_string(),
        );

        for (i, page) in self.pages.iter().enumerate() {
            let page_id = 4 + i * 2;
            let content_id = page_id + 1;
            push_object(
                &mut out,
                &mut offsets,
                format!(
                    "{page_id} 0 obj\n<< /Type /Page /Parent 2 0 R \
                     /MediaBox [0 0 {:.2} {:.2}] \
                     /Resources << /Font << /F1 3 0 R >> >> \
                     /Contents {content_id} 0 R >>\nendobj\n",
                    page.width, page.height
                ),
            );
            push_object(
                &mut out,
                &mut offsets,
                format!(
                    "{content_id} 0 obj\n<< /Length {} >>\nstream\n{}endstream\nendobj\n",
                    page.content.len(),
                    page.content
                ),
            );
        }

        let xref_offset = out.len();
        let object_count = offsets.len() + 1;
        let mut xref = format!("xref\n0 {object_count}\n0000000000 65535 f \n");
        for offset in &offsets {
            let _ = writeln!(xref, "{offset:010} 00000 n ");
        }
        out.extend_from_slice(xref.as_bytes());
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {object_count} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
            )
            .as_bytes(),
        );
        out
    }
}
