//! Renders one grading record as a paginated A4 PDF report.
//!
//! Section order is fixed: title, date, total score, grade tier, the four
//! category scores with wrapped comments, the numbered error list, and the
//! overall comment. Note: the base-14 fonts carry no CJK glyphs; proper
//! Chinese output needs an embedded CJK font.

use std::mem;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::{info, warn};

use redpen_core::{GradeTier, GradingRecord, RedpenError};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MM_TO_PT: f32 = 72.0 / 25.4;

/// Vertical cursor position past which a new page is started.
const PAGE_BREAK_MM: f32 = 270.0;
const TOP_MARGIN_MM: f32 = 20.0;

/// Comment column widths, in characters (the original wraps at 160 mm and
/// 170 mm; full-width characters at 10 pt are ~3.5 mm wide).
const WRAP_COMMENT: usize = 45;
const WRAP_OVERALL: usize = 48;

/// Export `record` as a PDF under `out_dir`; returns the written path.
///
/// The filename embeds the record's timestamp:
/// `作文批改_YYYYMMDD_HHMMSS.pdf`.
pub fn export_to_pdf(record: &GradingRecord, out_dir: &Path) -> Result<PathBuf, RedpenError> {
    let filename = format!("作文批改_{}.pdf", record.timestamp.format("%Y%m%d_%H%M%S"));
    let path = out_dir.join(filename);

    match write_report(record, &path) {
        Ok(pages) => {
            info!(path = %path.display(), pages, "Report exported");
            Ok(path)
        }
        Err(e) => {
            warn!(error = %e, "Report export failed");
            Err(RedpenError::PdfExport)
        }
    }
}

fn write_report(record: &GradingRecord, path: &Path) -> Result<usize> {
    let mut writer = ReportWriter::new();
    layout_report(&mut writer, record);
    let pages = writer.finish();
    let page_count = pages.len();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().context("content stream encode failed")?,
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            (PAGE_WIDTH_MM * MM_TO_PT).into(),
            (PAGE_HEIGHT_MM * MM_TO_PT).into(),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    doc.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(page_count)
}

fn layout_report(w: &mut ReportWriter, record: &GradingRecord) {
    let result = &record.payload;

    w.centered_text(20.0, "AI 作文批改結果");
    w.advance(15.0);

    let date = record
        .timestamp
        .format("%Y年%-m月%-d日 %H:%M")
        .to_string();
    w.centered_text(10.0, &date);
    w.advance(15.0);

    w.text(20.0, 16.0, &format!("總分：{} 分", result.total_score));
    w.advance(10.0);

    // The tier is re-derived from the score so the report can never
    // disagree with the rest of the tool
    let tier = GradeTier::from_score(result.total_score);
    w.text(20.0, 14.0, &format!("評級：{tier}"));
    w.advance(15.0);

    w.text(20.0, 14.0, "分項評分");
    w.advance(10.0);

    for item in &result.detailed_scores {
        w.page_break_if_past(PAGE_BREAK_MM);
        w.text(25.0, 10.0, &format!("{}: {}/100", item.category, item.score));
        w.advance(5.0);
        for line in wrap_chars(&item.comment, WRAP_COMMENT) {
            w.page_break_if_past(PAGE_BREAK_MM);
            w.text(30.0, 10.0, &line);
            w.advance(5.0);
        }
        w.advance(3.0);
    }

    if !result.errors.is_empty() {
        w.advance(5.0);
        w.page_break_if_past(PAGE_BREAK_MM);
        w.text(20.0, 14.0, "錯別字與病句");
        w.advance(10.0);

        for (index, error) in result.errors.iter().enumerate() {
            w.page_break_if_past(265.0);
            w.text(
                25.0,
                10.0,
                &format!("{}. {} → {}", index + 1, error.original, error.correction),
            );
            w.advance(5.0);
            for line in wrap_chars(&error.explanation, WRAP_COMMENT) {
                w.page_break_if_past(PAGE_BREAK_MM);
                w.text(30.0, 10.0, &line);
                w.advance(5.0);
            }
            w.advance(2.0);
        }
    }

    if !result.overall_comment.is_empty() {
        w.advance(5.0);
        // earlier break so the heading is never orphaned at the page foot
        w.page_break_if_past(250.0);
        w.text(20.0, 14.0, "總評");
        w.advance(10.0);

        for line in wrap_chars(&result.overall_comment, WRAP_OVERALL) {
            w.page_break_if_past(PAGE_BREAK_MM);
            w.text(20.0, 10.0, &line);
            w.advance(5.0);
        }
    }
}

/// Accumulates text operations page by page, tracking a top-down vertical
/// cursor in millimetres.
struct ReportWriter {
    operations: Vec<Operation>,
    pages: Vec<Vec<Operation>>,
    y_mm: f32,
}

impl ReportWriter {
    fn new() -> Self {
        Self {
            operations: Vec::new(),
            pages: Vec::new(),
            y_mm: TOP_MARGIN_MM,
        }
    }

    fn text(&mut self, x_mm: f32, size_pt: f32, text: &str) {
        let x_pt = x_mm * MM_TO_PT;
        let y_pt = (PAGE_HEIGHT_MM - self.y_mm) * MM_TO_PT;
        self.operations.push(Operation::new("BT", vec![]));
        self.operations
            .push(Operation::new("Tf", vec!["F1".into(), size_pt.into()]));
        self.operations
            .push(Operation::new("Td", vec![x_pt.into(), y_pt.into()]));
        self.operations
            .push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.operations.push(Operation::new("ET", vec![]));
    }

    /// Roughly centered placement; full-width glyphs dominate the reports,
    /// so width is estimated from the character count.
    fn centered_text(&mut self, size_pt: f32, text: &str) {
        let glyph_mm = size_pt * 0.3527;
        let width_mm = text.chars().count() as f32 * glyph_mm;
        let x_mm = ((PAGE_WIDTH_MM - width_mm) / 2.0).max(0.0);
        self.text(x_mm, size_pt, text);
    }

    fn advance(&mut self, dy_mm: f32) {
        self.y_mm += dy_mm;
    }

    fn page_break_if_past(&mut self, threshold_mm: f32) {
        if self.y_mm > threshold_mm {
            self.pages.push(mem::take(&mut self.operations));
            self.y_mm = TOP_MARGIN_MM;
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.pages.push(self.operations);
        self.pages
    }
}

/// Wrap on character count; the reports are CJK text without word breaks.
fn wrap_chars(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
