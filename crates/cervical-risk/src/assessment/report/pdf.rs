//! Minimal PDF 1.4 writer: uncompressed content streams, base-14 Helvetica fonts.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    /// Advance width of `text` at `size`, from the standard font metrics.
    pub(crate) fn text_width(self, text: &str, size: f64) -> f64 {
        let units: u32 = encode_text(text)
            .iter()
            .map(|byte| match self {
                Font::HelveticaBold => bold_width(*byte),
                Font::Helvetica => regular_width(*byte),
            })
            .sum();
        f64::from(units) * size / 1000.0
    }
}

#[derive(Debug, Clone)]
struct TextRun {
    font: Font,
    size: f64,
    x: f64,
    y: f64,
    text: Vec<u8>,
}

/// Collects positioned text runs per page and serializes them into a PDF file.
#[derive(Debug, Clone)]
pub(crate) struct PdfWriter {
    width: f64,
    height: f64,
    pages: Vec<Vec<TextRun>>,
}

impl PdfWriter {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pages: vec![Vec::new()],
        }
    }

    pub(crate) fn text(&mut self, page: usize, font: Font, size: f64, x: f64, y: f64, text: &str) {
        while self.pages.len() <= page {
            self.pages.push(Vec::new());
        }
        self.pages[page].push(TextRun {
            font,
            size,
            x,
            y,
            text: encode_text(text),
        });
    }

    pub(crate) fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        let page_count = self.pages.len();
        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let kids = (0..page_count)
            .map(|index| format!("{} 0 R", page_object(index)))
            .collect::<Vec<_>>()
            .join(" ");

        push_object(
            &mut out,
            &mut offsets,
            b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        );
        push_object(
            &mut out,
            &mut offsets,
            format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>").into_bytes(),
        );
        for base in ["Helvetica", "Helvetica-Bold"] {
            push_object(
                &mut out,
                &mut offsets,
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>"
                )
                .into_bytes(),
            );
        }

        for (index, runs) in self.pages.iter().enumerate() {
            let page = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                number(self.width),
                number(self.height),
                page_object(index) + 1
            );
            push_object(&mut out, &mut offsets, page.into_bytes());

            let content = content_stream(runs);
            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(&content);
            stream.extend_from_slice(b"\nendstream");
            push_object(&mut out, &mut offsets, stream);
        }

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
        for offset in &offsets {
            let _ = write!(xref, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            offsets.len() + 1
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

/// Object number of the page dictionary for a zero-based page index.
fn page_object(index: usize) -> usize {
    5 + index * 2
}

fn push_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: Vec<u8>) {
    offsets.push(out.len());
    out.extend_from_slice(format!("{} 0 obj\n", offsets.len()).as_bytes());
    out.extend_from_slice(&body);
    out.extend_from_slice(b"\nendobj\n");
}

fn content_stream(runs: &[TextRun]) -> Vec<u8> {
    let mut content = Vec::new();
    for run in runs {
        content.extend_from_slice(
            format!(
                "BT /{} {} Tf {} {} Td (",
                run.font.resource(),
                number(run.size),
                number(run.x),
                number(run.y)
            )
            .as_bytes(),
        );
        for byte in &run.text {
            if matches!(byte, b'(' | b')' | b'\\') {
                content.push(b'\\');
            }
            content.push(*byte);
        }
        content.extend_from_slice(b") Tj ET\n");
    }
    content
}

/// Map text onto single-byte WinAnsi codes.
pub(crate) fn encode_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '≤' => bytes.extend_from_slice(b"<="),
            '≥' => bytes.extend_from_slice(b">="),
            ' '..='~' => bytes.push(c as u8),
            '\u{a0}'..='\u{ff}' => bytes.push(c as u32 as u8),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}

fn number(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn regular_width(byte: u8) -> u32 {
    match byte {
        b' ' | b',' | b'.' | b'/' | b':' | b';' | b'!' | b'[' | b']' | b'\\' | b'I' => 278,
        b'i' | b'j' | b'l' => 222,
        b'f' | b't' => 278,
        b'r' | b'(' | b')' | b'-' | b'`' => 333,
        b'm' => 833,
        b'w' => 722,
        b'M' => 833,
        b'W' => 944,
        b'A' | b'B' | b'D' | b'H' | b'N' | b'R' | b'U' | b'C' => 722,
        b'G' | b'O' | b'Q' => 778,
        b'E' | b'K' | b'P' | b'S' | b'V' | b'X' | b'Y' => 667,
        b'F' | b'T' | b'Z' => 611,
        b'L' => 556,
        b'J' | b'c' | b'k' | b's' | b'v' | b'x' | b'y' | b'z' => 500,
        b'@' => 1015,
        b'%' => 889,
        b'&' => 667,
        b'<' | b'=' | b'>' | b'+' | b'~' => 584,
        b'*' => 389,
        b'{' | b'}' => 334,
        b'|' => 260,
        b'"' => 355,
        b'\'' => 191,
        _ => 556,
    }
}

fn bold_width(byte: u8) -> u32 {
    match byte {
        b' ' | b',' | b'.' | b'/' | b'\\' | b'I' | b'i' | b'j' | b'l' => 278,
        b'!' | b'(' | b')' | b'-' | b':' | b';' | b'[' | b']' | b'`' | b'f' | b't' => 333,
        b'r' | b'*' | b'{' | b'}' => 389,
        b'z' => 500,
        b'm' | b'%' => 889,
        b'w' => 778,
        b'M' => 833,
        b'W' => 944,
        b'A' | b'B' | b'C' | b'D' | b'H' | b'K' | b'N' | b'R' | b'U' | b'&' => 722,
        b'G' | b'O' | b'Q' => 778,
        b'E' | b'P' | b'S' | b'V' | b'X' | b'Y' => 667,
        b'F' | b'L' | b'T' | b'Z' | b'?' => 611,
        b'b' | b'd' | b'g' | b'h' | b'n' | b'o' | b'p' | b'q' | b'u' => 611,
        b'<' | b'=' | b'>' | b'+' | b'^' | b'~' => 584,
        b'@' => 975,
        b'|' => 280,
        b'"' => 474,
        b'\'' => 238,
        _ => 556,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_out_of_range_characters() {
        assert_eq!(encode_text("≤2"), b"<=2".to_vec());
        assert_eq!(encode_text("Détails"), b"D\xe9tails".to_vec());
        assert_eq!(encode_text("नाम"), b"???".to_vec());
    }

    #[test]
    fn escapes_string_delimiters() {
        let mut writer = PdfWriter::new(100.0, 100.0);
        writer.text(0, Font::Helvetica, 10.0, 10.0, 10.0, "a (b) \\c");
        let bytes = writer.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(a \\(b\\) \\\\c) Tj"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let mut writer = PdfWriter::new(595.28, 841.89);
        writer.text(0, Font::HelveticaBold, 14.0, 10.0, 800.0, "Title");
        writer.text(1, Font::Helvetica, 10.0, 60.0, 791.89, "Second page");
        assert_eq!(writer.page_count(), 2);
        let bytes = writer.finish();
        let text = String::from_utf8_lossy(&bytes).into_owned();

        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/MediaBox [0 0 595.28 841.89]"));

        let xref_start = text.find("xref\n").expect("xref present");
        let entries: Vec<usize> = text[xref_start..]
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().expect("offset"))
            .collect();
        assert_eq!(entries.len(), 8);
        for (index, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", index + 1);
            assert!(bytes[*offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(number(60.0), "60");
        assert_eq!(number(841.89), "841.89");
        assert_eq!(number(297.5), "297.5");
    }
}
