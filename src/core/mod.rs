pub mod collector;
pub mod constants;
pub mod dicts;
pub mod etl;
pub mod evaluator;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{ConstantTable, DictionaryTable, Node, NodeKind, Report};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
