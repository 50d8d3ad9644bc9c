pub mod aggregate;
pub mod etl;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod settlement;
pub mod statement;
pub mod verify;

pub use crate::domain::ports::{ConfigProvider, Pipeline, SheetSource, Storage};
pub use crate::utils::error::Result;
