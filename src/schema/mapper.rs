use tracing::warn;

use crate::integration::RawDetection;
use crate::schema::SchemaLabel;
use crate::tracker::Detection;

const ANIMAL_CLASSES: [&str; 10] = [
    "bird", "cat", "dog", "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe",
];

/// Map a COCO detector class onto the taxonomy.
///
/// Returns `None` for anything outside the person/vehicle/animal classes;
/// those detections are dropped rather than surfaced as `Unknown`.
pub fn map_coco_to_schema(coco_class: &str) -> Option<SchemaLabel> {
    let class = coco_class.to_lowercase();
    let label = match class.as_str() {
        "person" => SchemaLabel::Pedestrian,
        "bicycle" => SchemaLabel::Cyclist,
        "motorcycle" => SchemaLabel::Motorcycle,
        "bus" => SchemaLabel::Bus,
        "truck" => SchemaLabel::Truck,
        "car" => SchemaLabel::Vehicle,
        c if ANIMAL_CLASSES.contains(&c) => SchemaLabel::Animal,
        _ => return None,
    };
    Some(label)
}

/// Confidence gate, validation and schema mapping for one frame of raw
/// detections. Malformed detections are logged and skipped.
pub fn filter_detections(raw: Vec<RawDetection>, min_confidence: f32) -> Vec<Detection> {
    raw.into_iter()
        .filter_map(|det| {
            if let Err(e) = det.validate() {
                warn!(class = %det.class, "dropping detection: {e}");
                return None;
            }
            if det.score < min_confidence {
                return None;
            }
            let label = map_coco_to_schema(&det.class)?;
            Some(Detection::new(det.bbox, label, det.score))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Rect;

    #[test]
    fn test_known_classes() {
        assert_eq!(map_coco_to_schema("person"), Some(SchemaLabel::Pedestrian));
        assert_eq!(map_coco_to_schema("Car"), Some(SchemaLabel::Vehicle));
        assert_eq!(map_coco_to_schema("BICYCLE"), Some(SchemaLabel::Cyclist));
        assert_eq!(map_coco_to_schema("giraffe"), Some(SchemaLabel::Animal));
        assert_eq!(map_coco_to_schema("dog"), Some(SchemaLabel::Animal));
    }

    #[test]
    fn test_unmapped_classes_are_dropped() {
        assert_eq!(map_coco_to_schema("potted plant"), None);
        assert_eq!(map_coco_to_schema("traffic light"), None);
        assert_eq!(map_coco_to_schema(""), None);
    }

    #[test]
    fn test_filter_detections() {
        let raw = vec![
            RawDetection::new(Rect::new(0.0, 0.0, 10.0, 10.0), "car", 0.9),
            RawDetection::new(Rect::new(0.0, 0.0, 10.0, 10.0), "car", 0.2),
            RawDetection::new(Rect::new(0.0, 0.0, 10.0, 10.0), "potted plant", 0.9),
            RawDetection::new(Rect::new(f32::NAN, 0.0, 10.0, 10.0), "person", 0.9),
            RawDetection::new(Rect::new(0.0, 0.0, 10.0, 10.0), "person", 1.5),
            RawDetection::new(Rect::new(5.0, 5.0, 10.0, 10.0), "person", 0.5),
        ];
        let filtered = filter_detections(raw, 0.5);
        let labels: Vec<SchemaLabel> = filtered.iter().map(|d| d.label).collect();
        assert_eq!(labels, vec![SchemaLabel::Vehicle, SchemaLabel::Pedestrian]);
    }
}
