mod color;
mod iou_tracker;
mod matching;
mod rect;
mod track;

pub use color::{ColorAssigner, ColorTag, FixedColor, RandomHue};
pub use iou_tracker::{IouTracker, TrackerConfig};
pub use matching::{AssignmentResult, Candidate, Detection, candidates, greedy_assignment};
pub use rect::{Rect, iou_batch};
pub use track::Track;
