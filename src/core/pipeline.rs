use crate::adapters::xml;
use crate::core::report::transform_document;
use crate::core::{ConfigProvider, Node, Pipeline, Report, Storage};
use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::Result;

/// Reads the input document, resolves it into a report and writes the report.
pub struct TransitPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> TransitPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for TransitPipeline<S, C> {
    fn extract(&self) -> Result<Node> {
        tracing::debug!("Reading document from: {}", self.config.input_path());
        let bytes = self.storage.read_file(self.config.input_path())?;
        xml::parse_bytes(&bytes)
    }

    fn transform(&self, document: Node, diagnostics: &mut Diagnostics) -> Result<Report> {
        transform_document(&document, diagnostics)
    }

    fn load(&self, report: Report) -> Result<String> {
        let output_path = self.config.output_path().to_string();
        self.storage
            .write_file(&output_path, report.render().as_bytes())?;
        Ok(output_path)
    }
}
