//! Minimal single-page PDF writer.
//!
//! Only what a text summary needs: one US-Letter page, the standard
//! Helvetica and Helvetica-Bold fonts (no embedding) and left-aligned lines.
//! Text is encoded as WinAnsi, so Latin-1 characters such as `ó` render
//! correctly; anything outside Latin-1 is replaced by `?`.

use std::fmt::Write as _;

/// US-Letter width in points.
pub const PAGE_WIDTH: f32 = 612.0;
/// US-Letter height in points.
pub const PAGE_HEIGHT: f32 = 792.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// A page being filled with text.
#[derive(Debug, Default)]
pub struct Page {
    content: Vec<u8>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `text` with its baseline starting at `(x, y)`, origin bottom-left.
    pub fn text(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str) {
        let mut op = String::new();
        let _ = write!(
            op,
            "BT /{} {size} Tf {x} {y} Td (",
            font.resource()
        );
        self.content.extend_from_slice(op.as_bytes());
        self.content.extend(encode_text(text));
        self.content.extend_from_slice(b") Tj ET\n");
    }

    /// Serializes the page as a complete PDF document.
    pub fn finish(self) -> Vec<u8> {
        let objects: Vec<Vec<u8>> = vec![
            b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
            b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>"
            )
            .into_bytes(),
            font_object("Helvetica"),
            font_object("Helvetica-Bold"),
            stream_object(&self.content),
        ];

        let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_at = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            let _ = write!(xref, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

fn font_object(base: &str) -> Vec<u8> {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>")
        .into_bytes()
}

fn stream_object(content: &[u8]) -> Vec<u8> {
    let mut out = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
    out.extend_from_slice(content);
    out.extend_from_slice(b"\nendstream");
    out
}

/// Escapes a string literal and maps it to single-byte WinAnsi codes.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            '\n' | '\r' | '\t' => out.push(b' '),
            c if (c as u32) < 0x20 => {}
            c => out.push(u8::try_from(u32::from(c)).unwrap_or(b'?')),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn escapes_delimiters_and_maps_latin1() {
        assert_eq!(encode_text("a(b)\\"), b"a\\(b\\)\\\\".to_vec());
        assert_eq!(encode_text("Córdobas"), b"C\xF3rdobas".to_vec());
        assert_eq!(encode_text("€"), b"?".to_vec());
    }

    #[test]
    fn finish_produces_well_formed_document() {
        let mut page = Page::new();
        page.text(50.0, 742.0, Font::Bold, 16.0, "ARQUEO");
        let bytes = page.finish();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(contains(&bytes, b"(ARQUEO) Tj"));
        assert!(contains(&bytes, b"/BaseFont /Helvetica-Bold"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let mut page = Page::new();
        page.text(50.0, 700.0, Font::Regular, 12.0, "hola");
        let bytes = page.finish();

        let marker = bytes
            .windows(10)
            .rposition(|w| w == b"startxref\n")
            .unwrap();
        let startxref: usize = std::str::from_utf8(&bytes[marker + 10..])
            .unwrap()
            .lines()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!(bytes[startxref..].starts_with(b"xref"));

        let entries: Vec<usize> = std::str::from_utf8(&bytes[startxref..])
            .unwrap()
            .lines()
            .skip(3)
            .take(6)
            .map(|l| l[..10].parse().unwrap())
            .collect();
        for (i, offset) in entries.into_iter().enumerate() {
            let header = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(header.as_bytes()));
        }
    }
}
