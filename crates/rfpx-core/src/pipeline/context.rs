//! Accumulated state for one document's trip through the pipeline.

use std::path::PathBuf;

use serde::Serialize;

use super::stage::{ExtractTextOutput, StructuredDataInput, StructuredDataOutput};
use crate::models::document::DocumentType;
use crate::models::record::ExtractionRecord;

/// Values produced so far for one document.
///
/// Stage outputs are merged in; nothing is ever removed. A fresh context is
/// used for every document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rfp_data: Option<ExtractionRecord>,
}

/// A stage output that can be folded into the context.
pub trait MergeInto {
    fn merge_into(self, context: &mut PipelineContext);
}

impl MergeInto for ExtractTextOutput {
    fn merge_into(self, context: &mut PipelineContext) {
        context.document_name = Some(self.document_name);
        context.document_type = Some(self.document_type);
        context.extracted_text = Some(self.extracted_text);
    }
}

impl MergeInto for StructuredDataOutput {
    fn merge_into(self, context: &mut PipelineContext) {
        context.rfp_data = Some(self.rfp_data);
    }
}

impl PipelineContext {
    /// Context seeded with already-extracted text (the direct path into stage two).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            extracted_text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Fold a stage output into the context.
    pub fn merge(&mut self, output: impl MergeInto) {
        output.merge_into(self);
    }

    /// Input for stage two, available once text has been extracted.
    pub fn structured_data_input(&self) -> Option<StructuredDataInput> {
        self.extracted_text.as_ref().map(|text| StructuredDataInput {
            extracted_text: text.clone(),
        })
    }

    /// The extracted record, if stage two has run.
    pub fn into_record(self) -> Option<ExtractionRecord> {
        self.rfp_data
    }
}
