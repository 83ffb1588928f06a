//! Snapshot export: rendered slides → PNG artifacts.
//!
//! # Architecture
//!
//! Capture is behind the [`Capture`] trait so orchestration is testable
//! without a rasterizer; the production backend is
//! [`RasterCapturer`](capture::RasterCapturer). Batch operations process
//! slides strictly sequentially, one capture completing before the next
//! begins — unbounded concurrent captures are how exports exhaust
//! rendering resources, and output numbering depends on input order.
//!
//! Failure policy differs by path: the single-slide export propagates its
//! error to the caller; a batch skips the failed slide and keeps going;
//! archive generation with zero successful captures is itself an error
//! and no partial archive is produced.

mod capture;
mod status;

use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::model::{Document, FontOption, Theme, font_by_id, theme_by_id};
use crate::render::{ComposedSlide, compose_slide};

pub use capture::RasterCapturer;
pub use status::{ExportControl, ExportStatus, SUCCESS_LINGER};

/// Fixed pixel-density multiplier for all raster output.
pub const PIXEL_RATIO: f32 = 2.0;

/// Converts one composed slide into PNG bytes.
pub trait Capture {
    fn capture(&mut self, slide: &ComposedSlide) -> Result<Vec<u8>>;
}

/// Batch progress, reported after each slide completes or is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

/// One successfully captured slide in a batch.
#[derive(Debug, Clone)]
pub struct ExportedSlide {
    pub index: usize,
    pub filename: String,
    pub png: Vec<u8>,
}

/// Outcome of a batch export.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Captured slides in strictly ascending slide order.
    pub exported: Vec<ExportedSlide>,
    /// Indices of slides whose capture failed and was skipped.
    pub skipped: Vec<usize>,
    pub total: usize,
}

/// Output filename for a slide: `{title}-slide-{1-based index}.png`.
pub fn slide_filename(stem: &str, index: usize) -> String {
    format!("{}-slide-{}.png", stem, index + 1)
}

/// The document-to-artifact pipeline: theme and font resolution plus
/// export orchestration for one document.
pub struct Pipeline {
    theme: &'static Theme,
    font: &'static FontOption,
    file_stem: String,
    base_dir: Option<PathBuf>,
}

impl Pipeline {
    /// Resolve the document's theme and font (with fallbacks) and derive
    /// the output naming stem from its title.
    pub fn for_document(doc: &Document) -> Self {
        let theme = theme_by_id(&doc.theme_id);
        let font = if doc.font_id.is_empty() {
            font_by_id(theme.default_font)
        } else {
            font_by_id(&doc.font_id)
        };
        Self {
            theme,
            font,
            file_stem: doc.file_stem(),
            base_dir: None,
        }
    }

    /// Directory against which relative image references resolve.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }

    /// Compose a single slide of the deck (parse, fit, lay out, SVG).
    pub fn compose(&self, deck: &Deck<'_>, index: usize) -> Result<ComposedSlide> {
        let text = deck
            .slides()
            .get(index)
            .ok_or_else(|| Error::Capture(format!("no slide at index {index}")))?;
        compose_slide(
            text,
            index,
            deck.len(),
            self.theme,
            self.font,
            self.base_dir.as_deref(),
        )
    }

    /// Export one slide as PNG bytes.
    ///
    /// This is the copy/download path: a capture failure propagates so the
    /// UI can show a blocking message and revert its control to idle.
    pub fn export_slide<C: Capture>(
        &self,
        capturer: &mut C,
        deck: &Deck<'_>,
        index: usize,
    ) -> Result<Vec<u8>> {
        let composed = self.compose(deck, index)?;
        capturer.capture(&composed)
    }

    /// Export every slide, strictly sequentially and in deck order.
    ///
    /// A failed slide is skipped and the remaining slides are still
    /// attempted; the caller decides what to do with `skipped`. Progress
    /// is reported after every slide, including skipped ones.
    pub fn export_deck<C: Capture>(
        &self,
        capturer: &mut C,
        deck: &Deck<'_>,
        mut on_progress: impl FnMut(Progress),
    ) -> BatchOutcome {
        let total = deck.len();
        let mut outcome = BatchOutcome {
            total,
            ..BatchOutcome::default()
        };

        for (index, _) in deck.iter() {
            match self
                .compose(deck, index)
                .and_then(|composed| capturer.capture(&composed))
            {
                Ok(png) => outcome.exported.push(ExportedSlide {
                    index,
                    filename: slide_filename(&self.file_stem, index),
                    png,
                }),
                Err(_) => outcome.skipped.push(index),
            }
            on_progress(Progress {
                completed: index + 1,
                total,
            });
        }
        outcome
    }

    /// Export every slide as individual PNG files under `dir`.
    pub fn export_deck_to_dir<C: Capture>(
        &self,
        capturer: &mut C,
        deck: &Deck<'_>,
        dir: &Path,
        on_progress: impl FnMut(Progress),
    ) -> Result<BatchOutcome> {
        std::fs::create_dir_all(dir)?;
        let outcome = self.export_deck(capturer, deck, on_progress);
        for slide in &outcome.exported {
            std::fs::write(dir.join(&slide.filename), &slide.png)?;
        }
        Ok(outcome)
    }

    /// Export the whole deck into one zip archive.
    ///
    /// Entries live under a folder named from the sanitized title. If no
    /// slide captures successfully the archive is an error and nothing is
    /// written beyond what the writer already consumed — no partial
    /// archive is offered.
    pub fn export_archive<C: Capture, W: Write + Seek>(
        &self,
        capturer: &mut C,
        deck: &Deck<'_>,
        writer: &mut W,
        on_progress: impl FnMut(Progress),
    ) -> Result<BatchOutcome> {
        let outcome = self.export_deck(capturer, deck, on_progress);
        if outcome.exported.is_empty() {
            return Err(Error::Archive("no slides captured".to_string()));
        }

        let mut zip = ZipWriter::new(writer);
        // PNG is already compressed; store entries as-is.
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for slide in &outcome.exported {
            zip.start_file(format!("{}/{}", self.file_stem, slide.filename), stored)?;
            zip.write_all(&slide.png)?;
        }
        zip.finish()?;
        Ok(outcome)
    }

    /// Export the whole deck into a zip archive file at `path`.
    ///
    /// On failure the file is removed again, so a partial archive is
    /// never left on disk.
    pub fn export_archive_to_file<C: Capture>(
        &self,
        capturer: &mut C,
        deck: &Deck<'_>,
        path: &Path,
        on_progress: impl FnMut(Progress),
    ) -> Result<BatchOutcome> {
        let mut file = std::fs::File::create(path)?;
        match self.export_archive(capturer, deck, &mut file, on_progress) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                drop(file);
                let _ = std::fs::remove_file(path);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;

    /// Capturer that records what it saw and fails on request.
    struct FakeCapturer {
        captured: Vec<usize>,
        fail_on: Vec<usize>,
    }

    impl FakeCapturer {
        fn new() -> Self {
            Self {
                captured: Vec::new(),
                fail_on: Vec::new(),
            }
        }

        fn failing_on(fail_on: Vec<usize>) -> Self {
            Self {
                captured: Vec::new(),
                fail_on,
            }
        }
    }

    impl Capture for FakeCapturer {
        fn capture(&mut self, slide: &ComposedSlide) -> Result<Vec<u8>> {
            if self.fail_on.contains(&slide.index) {
                return Err(Error::Capture("boom".to_string()));
            }
            self.captured.push(slide.index);
            Ok(vec![slide.index as u8])
        }
    }

    fn doc(markdown: &str) -> Document {
        let mut doc = Document::new(markdown);
        doc.title = "My Deck".to_string();
        doc
    }

    #[test]
    fn batch_names_ascend_with_position() {
        let doc = doc("one\n\n---\n\ntwo\n\n---\n\nthree");
        let deck = Deck::from_markdown(doc.markdown());
        let pipeline = Pipeline::for_document(&doc);
        let mut cap = FakeCapturer::new();

        let outcome = pipeline.export_deck(&mut cap, &deck, |_| {});
        let names: Vec<_> = outcome.exported.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "My-Deck-slide-1.png",
                "My-Deck-slide-2.png",
                "My-Deck-slide-3.png"
            ]
        );
        assert_eq!(cap.captured, vec![0, 1, 2]);
    }

    #[test]
    fn batch_skips_failures_and_continues() {
        let doc = doc("a\n\n---\n\nb\n\n---\n\nc\n\n---\n\nd");
        let deck = Deck::from_markdown(doc.markdown());
        let pipeline = Pipeline::for_document(&doc);
        let mut cap = FakeCapturer::failing_on(vec![1]);

        let outcome = pipeline.export_deck(&mut cap, &deck, |_| {});
        assert_eq!(outcome.skipped, vec![1]);
        assert_eq!(outcome.exported.len(), 3);
        assert_eq!(cap.captured, vec![0, 2, 3]);
    }

    #[test]
    fn progress_counts_every_slide() {
        let doc = doc("a\n\n---\n\nb");
        let deck = Deck::from_markdown(doc.markdown());
        let pipeline = Pipeline::for_document(&doc);
        let mut seen = Vec::new();

        pipeline.export_deck(&mut FakeCapturer::new(), &deck, |p| seen.push(p));
        assert_eq!(
            seen,
            vec![
                Progress {
                    completed: 1,
                    total: 2
                },
                Progress {
                    completed: 2,
                    total: 2
                },
            ]
        );
    }

    #[test]
    fn single_slide_failure_propagates() {
        let doc = doc("only");
        let deck = Deck::from_markdown(doc.markdown());
        let pipeline = Pipeline::for_document(&doc);
        let mut cap = FakeCapturer::failing_on(vec![0]);

        let err = pipeline.export_slide(&mut cap, &deck, 0).unwrap_err();
        assert!(matches!(err, Error::Capture(_)));
    }

    #[test]
    fn archive_with_no_captures_is_an_error() {
        let doc = doc("a\n\n---\n\nb");
        let deck = Deck::from_markdown(doc.markdown());
        let pipeline = Pipeline::for_document(&doc);
        let mut cap = FakeCapturer::failing_on(vec![0, 1]);

        let mut buf = std::io::Cursor::new(Vec::new());
        let err = pipeline
            .export_archive(&mut cap, &deck, &mut buf, |_| {})
            .unwrap_err();
        assert!(matches!(err, Error::Archive(_)));
    }

    #[test]
    fn failed_archive_leaves_no_file_behind() {
        let doc = doc("a\n\n---\n\nb");
        let deck = Deck::from_markdown(doc.markdown());
        let pipeline = Pipeline::for_document(&doc);
        let mut cap = FakeCapturer::failing_on(vec![0, 1]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.zip");
        let err = pipeline
            .export_archive_to_file(&mut cap, &deck, &path, |_| {})
            .unwrap_err();
        assert!(matches!(err, Error::Archive(_)));
        assert!(!path.exists());
    }

    #[test]
    fn archive_entries_live_under_title_folder() {
        let doc = doc("a\n\n---\n\nb");
        let deck = Deck::from_markdown(doc.markdown());
        let pipeline = Pipeline::for_document(&doc);

        let mut buf = std::io::Cursor::new(Vec::new());
        pipeline
            .export_archive(&mut FakeCapturer::new(), &deck, &mut buf, |_| {})
            .unwrap();

        let mut archive = zip::ZipArchive::new(buf).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "My-Deck/My-Deck-slide-1.png",
                "My-Deck/My-Deck-slide-2.png"
            ]
        );
    }
}
