pub mod color;
pub mod etl;
pub mod export;
pub mod join;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod template;
pub mod transform;

pub use crate::domain::model::{Dataset, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
