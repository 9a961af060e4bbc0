pub mod construction;
pub mod model;

pub use construction::RecordLoader;
pub use model::{FeatureGraph, GraphRecord, RawEdge, RawNode, RawRecord};
