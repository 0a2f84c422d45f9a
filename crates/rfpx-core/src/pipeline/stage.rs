//! The two pipeline stages and their typed inputs and outputs.

use rfpx_llm::CompletionModel;
use tracing::debug;

use crate::error::Result;
use crate::extraction::ExtractionEngine;
use crate::models::document::{DocumentSource, DocumentType};
use crate::models::record::ExtractionRecord;
use crate::text::TextExtractors;

/// A pipeline step with an explicit input and output.
pub trait Stage {
    type Input;
    type Output;

    /// Stable stage name.
    fn name(&self) -> &'static str;

    /// Run the stage.
    fn run(&self, input: Self::Input) -> Result<Self::Output>;
}

/// Input of `extract_text`.
#[derive(Debug, Clone)]
pub struct ExtractTextInput {
    pub source: DocumentSource,
}

/// Output of `extract_text`.
#[derive(Debug, Clone)]
pub struct ExtractTextOutput {
    pub document_name: String,
    pub document_type: DocumentType,
    pub extracted_text: String,
}

/// Stage one: document to plain text.
pub struct ExtractTextStage {
    extractors: TextExtractors,
}

impl ExtractTextStage {
    pub const NAME: &'static str = "extract_text";

    pub fn new(extractors: TextExtractors) -> Self {
        Self { extractors }
    }
}

impl Stage for ExtractTextStage {
    type Input = ExtractTextInput;
    type Output = ExtractTextOutput;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, input: ExtractTextInput) -> Result<ExtractTextOutput> {
        let document = input.source.load()?;
        let extracted_text = self.extractors.extract(&document)?;

        debug!("{}: {} chars from {}", Self::NAME, extracted_text.len(), document.name);

        Ok(ExtractTextOutput {
            document_name: document.name,
            document_type: document.document_type,
            extracted_text,
        })
    }
}

/// Input of `extract_structured_data`.
#[derive(Debug, Clone)]
pub struct StructuredDataInput {
    pub extracted_text: String,
}

/// Output of `extract_structured_data`.
#[derive(Debug, Clone)]
pub struct StructuredDataOutput {
    pub rfp_data: ExtractionRecord,
}

/// Stage two: plain text to a schema-conformant record.
pub struct StructuredDataStage<M> {
    engine: ExtractionEngine<M>,
}

impl<M: CompletionModel> StructuredDataStage<M> {
    pub const NAME: &'static str = "extract_structured_data";

    pub fn new(engine: ExtractionEngine<M>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ExtractionEngine<M> {
        &self.engine
    }
}

impl<M: CompletionModel> Stage for StructuredDataStage<M> {
    type Input = StructuredDataInput;
    type Output = StructuredDataOutput;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, input: StructuredDataInput) -> Result<StructuredDataOutput> {
        let rfp_data = self.engine.extract(&input.extracted_text)?;
        Ok(StructuredDataOutput { rfp_data })
    }
}
