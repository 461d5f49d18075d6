//! Fixed label taxonomy, detector-label mapping and keyword refinement.

mod label;
mod mapper;
mod refine;

pub use label::SchemaLabel;
pub use mapper::{filter_detections, map_coco_to_schema};
pub use refine::refine_schema_label;
