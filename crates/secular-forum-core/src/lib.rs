pub mod config;
pub mod errors;
pub mod links;
pub mod loader;
pub mod model;
pub mod narrative;
pub mod reader;

pub use config::DataConfig;
pub use errors::{OutlookError, Result};
pub use links::build_river_links;
pub use loader::OutlookLoader;
pub use model::{NarrativeNode, NodeKind, OutlookId, OutlookRecord, RiverLink};
pub use narrative::build_narrative_river;
pub use reader::{parse_outlook_sheet, read_outlook_sheet, OutlookColumn, OutlookSheet};
