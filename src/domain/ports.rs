use crate::domain::model::{Node, Report};
use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Node>;
    fn transform(&self, document: Node, diagnostics: &mut Diagnostics) -> Result<Report>;
    fn load(&self, report: Report) -> Result<String>;
}
