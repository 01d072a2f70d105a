// 매물 모델/상태 전환 테스트
use chrono::{Duration, Utc};
use dealership_service::inventory::commands::sold_at_transition;
use dealership_service::inventory::model::{is_valid_bike_status, AvailableBike};

#[test]
fn sold_at_is_set_on_first_transition_to_sold() {
    let before = Utc::now();
    let result = sold_at_transition("sold", None);
    let sold_at = result.unwrap();
    assert!(sold_at >= before && sold_at <= Utc::now());
}

#[test]
fn sold_at_is_kept_while_still_sold() {
    let original = Utc::now() - Duration::days(30);
    let result = sold_at_transition("sold", Some(original));
    assert_eq!(result, Some(original));
}

#[test]
fn sold_at_is_cleared_when_leaving_sold() {
    let original = Utc::now() - Duration::days(30);
    assert_eq!(sold_at_transition("available", Some(original)), None);
    assert_eq!(sold_at_transition("reserved", Some(original)), None);
    assert_eq!(sold_at_transition("available", None), None);
}

#[test]
fn bike_status_validation() {
    assert!(is_valid_bike_status("available"));
    assert!(is_valid_bike_status("sold"));
    assert!(is_valid_bike_status("reserved"));
    assert!(is_valid_bike_status("pending"));
    assert!(!is_valid_bike_status("archived"));
    assert!(!is_valid_bike_status(""));
    assert!(!is_valid_bike_status("Available"));
}

#[test]
fn available_bike_display_name() {
    let bike = AvailableBike {
        id: 1,
        brand: "Ducati".to_string(),
        model: "Panigale V2".to_string(),
        price: "₹12,50,000".to_string(),
        status: "available".to_string(),
    };
    assert_eq!(bike.display_name(), "Ducati Panigale V2 - ₹12,50,000");
}
