//! Chart rendering. Each chart is assembled in memory as SVG and written out
//! as a standalone dark-theme HTML page.

mod color;
mod dashboard;
mod frame;
mod regional;
mod scatter;

use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use tracing::info;

use crate::common;

pub use dashboard::dashboard_chart;
pub use regional::regional_chart;
pub use scatter::scatter_chart;

pub(crate) const BACKGROUND: &str = "#0d1117";

/// Stylesheet shared by every chart.
pub(crate) const BASE_CSS: &str = "\
text { font-family: Arial, sans-serif; fill: #ffffff; }
.title { font-size: 20px; font-weight: bold; }
.subtitle { font-size: 12px; fill: #aaaaaa; }
.panel-title { font-size: 14px; font-weight: bold; }
.axis-title { font-size: 12px; }
.tick { font-size: 10px; fill: #cccccc; }
.label { font-size: 11px; }
.small { font-size: 8px; font-weight: bold; }
.note { font-size: 10px; fill: rgba(255,255,255,0.7); }
.grid { stroke: rgba(255,255,255,0.1); stroke-width: 1; }
.county { stroke: #ffffff; stroke-width: 0.5; }
.county:hover { stroke-width: 1.5; }";

/// One rendered chart.
#[derive(Debug, Clone)]
pub struct Chart {
    /// File stem of the page, e.g. "dashboard".
    pub slug: String,
    pub title: String,
    pub svg: String,
    /// HTML placed above the SVG (form controls and their script); may be empty.
    pub controls: String,
}

impl Chart {
    /// Full HTML page for the chart.
    pub fn to_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
             <style>body {{ background: {BACKGROUND}; color: #ffffff; font-family: Arial, sans-serif; margin: 0; padding: 12px; }}\n\
             select {{ background: #1a1a2e; color: #ffffff; border: 1px solid #444444; padding: 4px; font-size: 11px; }}</style>\n\
             </head>\n<body>\n{controls}\n{svg}\n</body>\n</html>\n",
            title = common::escape_xml(&self.title),
            controls = self.controls,
            svg = self.svg,
        )
    }

    /// Write `<dir>/<slug>.html` and return its path.
    pub fn show(&self, dir: &Path) -> Result<PathBuf> {
        common::ensure_dir_exists(dir)?;
        let path = dir.join(format!("{}.html", self.slug));
        fs::write(&path, self.to_html())
            .with_context(|| format!("Failed to write chart {}", path.display()))?;

        info!("[chart] wrote {} to {}", self.title, path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_writes_an_html_page_named_by_slug() {
        let dir = tempfile::tempdir().unwrap();
        let chart = Chart {
            slug: "demo".to_string(),
            title: "Need & Income".to_string(),
            svg: "<svg></svg>".to_string(),
            controls: String::new(),
        };

        let path = chart.show(&dir.path().join("charts")).unwrap();
        assert_eq!(path.file_name().unwrap(), "demo.html");

        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("<title>Need &amp; Income</title>"));
        assert!(html.contains("<svg></svg>"));
        assert!(html.contains(BACKGROUND));
    }
}
