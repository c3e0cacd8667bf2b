//! SVG writing operations.

use std::io::Write;

use anyhow::{Context, Result};

/// String-based SVG writer; charts are assembled in memory and shown afterwards.
pub(crate) struct SvgWriter {
    buffer: Vec<u8>
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl Write for SvgWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}

impl SvgWriter {
    pub(crate) fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Write the opening <svg> tag and a full-size background rectangle.
    pub(crate) fn write_header(&mut self, width: f64, height: f64, background: &str) -> Result<()> {
        writeln!(self, r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"##)?;
        writeln!(self, r##"<rect width="100%" height="100%" fill="{background}"/>"##)?;
        Ok(())
    }

    /// Write a <style> block inside <defs>.
    pub(crate) fn write_styles(&mut self, css: &str) -> Result<()> {
        writeln!(self, "<defs>\n<style>\n{css}\n</style>\n</defs>")?;
        Ok(())
    }

    /// Write a text element; `text` is escaped.
    pub(crate) fn write_text(&mut self, x: f64, y: f64, class: &str, anchor: &str, text: &str) -> Result<()> {
        writeln!(self, r#"<text class="{class}" x="{x:.1}" y="{y:.1}" text-anchor="{anchor}">{}</text>"#, escape_xml(text))?;
        Ok(())
    }

    /// Write the closing </svg> tag.
    pub(crate) fn write_footer(&mut self) -> Result<()> {
        writeln!(self, "</svg>")?;
        Ok(())
    }

    /// Get the SVG string.
    pub(crate) fn into_string(self) -> Result<String> {
        String::from_utf8(self.buffer)
            .context("[svg] SVG output is not valid UTF-8")
    }
}

/// Escape text for use in SVG element content and attribute values.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_is_wrapped_and_text_escaped() {
        let mut writer = SvgWriter::new();
        writer.write_header(100.0, 50.0, "#0d1117").unwrap();
        writer.write_text(10.0, 20.0, "label", "start", "Medicare & Medicaid").unwrap();
        writer.write_footer().unwrap();

        let svg = writer.into_string().unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Medicare &amp; Medicaid"));
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape_xml(r#"<a href="x">O'Brien</a>"#),
            "&lt;a href=&quot;x&quot;&gt;O&#39;Brien&lt;/a&gt;");
    }
}
