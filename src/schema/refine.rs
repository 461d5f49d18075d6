use crate::schema::SchemaLabel;

/// Keyword groups in priority order; the first group with a substring hit wins.
const REFINEMENTS: [(&[&str], SchemaLabel); 4] = [
    (
        &["ambulance", "police", "fire truck", "fire engine"],
        SchemaLabel::EmergencyVehicle,
    ),
    (&["minivan", "van", "moving van"], SchemaLabel::Van),
    (&["golf cart", "golfcart"], SchemaLabel::GolfCart),
    (&["scooter", "moped", "vespa"], SchemaLabel::Scooter),
];

/// Narrow `current` using the secondary classifier's free-text output.
pub fn refine_schema_label(current: SchemaLabel, detail: Option<&str>) -> SchemaLabel {
    let Some(detail) = detail else {
        return current;
    };
    let detail = detail.to_lowercase();

    REFINEMENTS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| detail.contains(k)))
        .map(|&(_, label)| label)
        .unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emergency_vehicle() {
        assert_eq!(
            refine_schema_label(SchemaLabel::Vehicle, Some("ambulance, siren car")),
            SchemaLabel::EmergencyVehicle
        );
        assert_eq!(
            refine_schema_label(SchemaLabel::Truck, Some("Fire Engine")),
            SchemaLabel::EmergencyVehicle
        );
    }

    #[test]
    fn test_no_detail_keeps_label() {
        assert_eq!(refine_schema_label(SchemaLabel::Vehicle, None), SchemaLabel::Vehicle);
    }

    #[test]
    fn test_no_keyword_keeps_label() {
        assert_eq!(
            refine_schema_label(SchemaLabel::Vehicle, Some("sports car")),
            SchemaLabel::Vehicle
        );
    }

    #[test]
    fn test_priority_order() {
        // "police van" hits both the emergency and van groups
        assert_eq!(
            refine_schema_label(SchemaLabel::Vehicle, Some("police van")),
            SchemaLabel::EmergencyVehicle
        );
        assert_eq!(
            refine_schema_label(SchemaLabel::Motorcycle, Some("Vespa")),
            SchemaLabel::Scooter
        );
        assert_eq!(
            refine_schema_label(SchemaLabel::Vehicle, Some("golfcart")),
            SchemaLabel::GolfCart
        );
    }
}
