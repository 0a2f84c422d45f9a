//! The two-stage RFP pipeline: `extract_text` then `extract_structured_data`.
//!
//! Each document gets a fresh [`PipelineContext`]. Stage outputs are merged
//! into it, so after a full run it holds the source, the extracted text and
//! the record side by side.

mod context;
mod stage;

pub use context::{MergeInto, PipelineContext};
pub use stage::{
    ExtractTextInput, ExtractTextOutput, ExtractTextStage, Stage, StructuredDataInput,
    StructuredDataOutput, StructuredDataStage,
};

use std::path::PathBuf;
use std::time::Instant;

use rfpx_llm::CompletionModel;
use tracing::{info, info_span, warn};

use crate::error::{Result, RfpxError};
use crate::extraction::ExtractionEngine;
use crate::models::config::RfpxConfig;
use crate::models::document::DocumentSource;
use crate::models::record::ExtractionRecord;
use crate::text::TextExtractors;

/// Outcome of one document in a batch.
#[derive(Debug)]
pub struct BatchItem {
    /// Path or name of the document.
    pub label: String,
    /// Path on disk, if the document came from one.
    pub file_path: Option<PathBuf>,
    /// The record, or the error that stopped this document.
    pub result: Result<ExtractionRecord>,
    pub processing_time_ms: u64,
}

/// A document left out of a combined run.
#[derive(Debug)]
pub struct SkippedDocument {
    pub label: String,
    pub error: RfpxError,
}

/// Outcome of a combined run over several documents.
#[derive(Debug)]
pub struct CombinedRun {
    /// Context holding the concatenated text and the single record.
    pub context: PipelineContext,
    /// Documents whose text went into the combined input.
    pub included: Vec<String>,
    /// Documents that were skipped, with the reason.
    pub skipped: Vec<SkippedDocument>,
}

impl CombinedRun {
    /// The record extracted from the combined text.
    pub fn record(&self) -> Option<&ExtractionRecord> {
        self.context.rfp_data.as_ref()
    }
}

/// Runs documents through text extraction and structured extraction.
pub struct RfpPipeline<M> {
    extract_text: ExtractTextStage,
    extract_structured_data: StructuredDataStage<M>,
}

impl<M: CompletionModel> RfpPipeline<M> {
    pub fn new(extractors: TextExtractors, engine: ExtractionEngine<M>) -> Self {
        Self {
            extract_text: ExtractTextStage::new(extractors),
            extract_structured_data: StructuredDataStage::new(engine),
        }
    }

    /// Build a pipeline with the default extractors and the configured engine.
    pub fn from_config(model: M, config: &RfpxConfig) -> Self {
        Self::new(
            TextExtractors::with_html_config(&config.html),
            ExtractionEngine::from_config(model, &config.extraction),
        )
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> [&'static str; 2] {
        [self.extract_text.name(), self.extract_structured_data.name()]
    }

    /// The structured extraction engine.
    pub fn engine(&self) -> &ExtractionEngine<M> {
        self.extract_structured_data.engine()
    }

    /// Run stage one only.
    pub fn extract_text(&self, source: impl Into<DocumentSource>) -> Result<ExtractTextOutput> {
        self.extract_text.run(ExtractTextInput {
            source: source.into(),
        })
    }

    /// Run both stages over one document.
    pub fn run(&self, source: impl Into<DocumentSource>) -> Result<PipelineContext> {
        let source = source.into();
        let mut context = PipelineContext {
            file_path: source.file_path().map(PathBuf::from),
            ..Default::default()
        };

        context.merge(self.extract_text.run(ExtractTextInput { source })?);
        self.run_structured(context)
    }

    /// Run stage two over text that was extracted elsewhere.
    pub fn run_text(&self, text: impl Into<String>) -> Result<PipelineContext> {
        self.run_structured(PipelineContext::from_text(text))
    }

    /// Run one document and return only the record.
    pub fn process(&self, source: impl Into<DocumentSource>) -> Result<ExtractionRecord> {
        self.run(source)?
            .into_record()
            .ok_or_else(|| RfpxError::Config("pipeline finished without a record".to_string()))
    }

    fn run_structured(&self, mut context: PipelineContext) -> Result<PipelineContext> {
        let input = context.structured_data_input().ok_or_else(|| {
            RfpxError::Config("structured extraction needs extracted text".to_string())
        })?;
        context.merge(self.extract_structured_data.run(input)?);
        Ok(context)
    }

    /// Process documents one by one; a failure is recorded and the batch goes on.
    pub fn run_batch<I, S>(&self, sources: I) -> Vec<BatchItem>
    where
        I: IntoIterator<Item = S>,
        S: Into<DocumentSource>,
    {
        self.run_batch_with(sources, |_| {})
    }

    /// Like [`run_batch`](Self::run_batch), calling `on_item` after each document.
    pub fn run_batch_with<I, S, F>(&self, sources: I, mut on_item: F) -> Vec<BatchItem>
    where
        I: IntoIterator<Item = S>,
        S: Into<DocumentSource>,
        F: FnMut(&BatchItem),
    {
        let mut items = Vec::new();

        for source in sources {
            let source = source.into();
            let label = source.label();
            let file_path = source.file_path().map(PathBuf::from);
            let _span = info_span!("document", name = %label).entered();

            let start = Instant::now();
            let result = self.process(source);
            let processing_time_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(record) => {
                    let (filled, total) = record.coverage();
                    info!("Processed {} ({}/{} fields)", label, filled, total);
                }
                Err(e) => warn!("Failed to process {}: {}", label, e),
            }

            let item = BatchItem {
                label,
                file_path,
                result,
                processing_time_ms,
            };
            on_item(&item);
            items.push(item);
        }

        items
    }

    /// Extract text from every document, concatenate it, and run stage two once.
    ///
    /// Each document's text is followed by a newline. Documents whose text
    /// cannot be extracted are skipped with a warning. Only a failure of the
    /// single model call fails the run.
    pub fn run_combined<I, S>(&self, sources: I) -> Result<CombinedRun>
    where
        I: IntoIterator<Item = S>,
        S: Into<DocumentSource>,
    {
        let mut combined = String::new();
        let mut included = Vec::new();
        let mut skipped = Vec::new();

        for source in sources {
            let source = source.into();
            let label = source.label();

            match self.extract_text(source) {
                Ok(output) => {
                    combined.push_str(&output.extracted_text);
                    combined.push('\n');
                    included.push(label);
                }
                Err(error) => {
                    warn!("Skipping {}: {}", label, error);
                    skipped.push(SkippedDocument { label, error });
                }
            }
        }

        info!(
            "Combined {} documents ({} skipped) into {} chars",
            included.len(),
            skipped.len(),
            combined.chars().count()
        );

        let context = self.run_text(combined)?;
        Ok(CombinedRun {
            context,
            included,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{DocumentType, RawDocument};
    use crate::schema;
    use pretty_assertions::assert_eq;
    use rfpx_llm::FixedReplyBackend;

    fn html(name: &str, body: &str) -> RawDocument {
        RawDocument::new(name, DocumentType::Html, body.as_bytes().to_vec())
    }

    fn pipeline(reply: &str) -> RfpPipeline<FixedReplyBackend> {
        RfpPipeline::new(
            TextExtractors::default(),
            ExtractionEngine::new(FixedReplyBackend::new(reply)),
        )
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(
            pipeline("{}").stage_names(),
            ["extract_text", "extract_structured_data"]
        );
    }

    #[test]
    fn test_run_fills_context() {
        let pipeline = pipeline(r#"{"Due Date": "2024-05-01"}"#);
        let context = pipeline
            .run(html("bid.html", "<p>Due Date: 2024-05-01</p>"))
            .unwrap();

        assert_eq!(context.document_name.as_deref(), Some("bid.html"));
        assert_eq!(context.document_type, Some(DocumentType::Html));
        assert_eq!(context.extracted_text.as_deref(), Some("Due Date: 2024-05-01"));
        assert_eq!(
            context.rfp_data.unwrap().get("Due Date"),
            Some("2024-05-01")
        );
    }

    #[test]
    fn test_run_from_path_records_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notice.HTM");
        std::fs::write(&path, "<h1>Title: Radios</h1>").unwrap();

        let context = pipeline(r#"{"Title": "Radios"}"#).run(path.clone()).unwrap();
        assert_eq!(context.file_path, Some(path));
        assert_eq!(context.extracted_text.as_deref(), Some("Title: Radios"));
    }

    #[test]
    fn test_unsupported_extension_fails_before_model() {
        let pipeline = pipeline("{}");
        let err = pipeline.run(PathBuf::from("/nonexistent/file.docx")).unwrap_err();
        assert!(matches!(err, RfpxError::UnsupportedFormat(ext) if ext == "docx"));
        assert_eq!(pipeline.engine().model().calls(), 0);
    }

    #[test]
    fn test_run_text_skips_stage_one() {
        let pipeline = pipeline(r#"{"Bid Number": "7"}"#);
        let context = pipeline.run_text("Bid Number: 7").unwrap();
        assert!(context.file_path.is_none());
        assert_eq!(context.into_record().unwrap().get("Bid Number"), Some("7"));
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let pipeline = pipeline(r#"{"Title": "Lamps"}"#);
        let sources: Vec<DocumentSource> = vec![
            html("a.html", "<p>first</p>").into(),
            RawDocument::new("broken.pdf", DocumentType::Pdf, b"not a pdf".to_vec()).into(),
            PathBuf::from("/nonexistent/c.txt").into(),
            html("d.html", "<p>last</p>").into(),
        ];

        let mut seen = 0;
        let items = pipeline.run_batch_with(sources, |_| seen += 1);

        assert_eq!(seen, 4);
        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["a.html", "broken.pdf", "/nonexistent/c.txt", "d.html"]);
        assert!(items[0].result.is_ok());
        assert!(matches!(items[1].result, Err(RfpxError::Extraction(_))));
        assert!(matches!(items[2].result, Err(RfpxError::UnsupportedFormat(_))));
        assert_eq!(
            items[3].result.as_ref().unwrap().get("Title"),
            Some("Lamps")
        );
        assert_eq!(pipeline.engine().model().calls(), 2);
    }

    #[test]
    fn test_batch_survives_undecodable_pdf() {
        let pipeline = pipeline(r#"{"Title": "Lamps"}"#);
        let bad_pdf = crate::text::pdf::tests::make_pdf_with_font(&["Title: Lamps"], "F9");
        let sources: Vec<DocumentSource> = vec![
            RawDocument::new("bad.pdf", DocumentType::Pdf, bad_pdf).into(),
            html("good.html", "<p>Title: Lamps</p>").into(),
        ];

        let items = pipeline.run_batch(sources);

        assert_eq!(items.len(), 2);
        assert!(matches!(
            items[0].result,
            Err(RfpxError::Extraction(crate::error::TextError::PdfText(_)))
        ));
        assert_eq!(items[1].result.as_ref().unwrap().get("Title"), Some("Lamps"));
        assert_eq!(pipeline.engine().model().calls(), 1);
    }

    #[test]
    fn test_combined_single_call() {
        let pipeline = pipeline(r#"{"Title": "Lamps", "Product": "LED lamp"}"#);
        let sources: Vec<DocumentSource> = vec![
            html("a.html", "<p>Title: Lamps</p>").into(),
            PathBuf::from("/nonexistent/notes.txt").into(),
            html("b.html", "<p>Product: LED lamp</p>").into(),
        ];

        let run = pipeline.run_combined(sources).unwrap();

        assert_eq!(pipeline.engine().model().calls(), 1);
        assert_eq!(run.included, ["a.html", "b.html"]);
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].label, "/nonexistent/notes.txt");
        assert_eq!(
            run.context.extracted_text.as_deref(),
            Some("Title: Lamps\nProduct: LED lamp\n")
        );
        let record = run.record().unwrap();
        assert_eq!(record.get("Product"), Some("LED lamp"));
        assert_eq!(record.coverage(), (2, schema::FIELD_COUNT));
    }
}
