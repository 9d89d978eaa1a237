use crate::core::Pipeline;
use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Runs extract, transform and load. Nothing is written unless the whole
    /// report was assembled; a failure is recorded in `diagnostics` before it
    /// is returned.
    pub fn run(&mut self, diagnostics: &mut Diagnostics) -> Result<String> {
        let result = self.run_phases(diagnostics);
        if let Err(e) = &result {
            diagnostics.error(e);
        }
        self.monitor.log_final_stats();
        result
    }

    fn run_phases(&mut self, diagnostics: &mut Diagnostics) -> Result<String> {
        tracing::info!("Starting transit run");

        tracing::info!("Extracting document...");
        let document = self.pipeline.extract()?;
        tracing::debug!("Root element has {} children", document.children.len());
        self.monitor.log_stats("Extract");

        tracing::info!("Transforming document...");
        let report = self.pipeline.transform(document, diagnostics)?;
        tracing::info!("Assembled {} report lines", report.len());
        self.monitor.log_stats("Transform");

        tracing::info!("Loading report...");
        let output_path = self.pipeline.load(report)?;
        tracing::info!("Report saved to: {}", output_path);
        self.monitor.log_stats("Load");

        Ok(output_path)
    }
}
