// 필터/정렬 엔진 테스트
use chrono::Utc;
use dealership_service::filter::{parse_grouped, parse_price, parse_year, BikeFilter, SortKey};
use dealership_service::inventory::model::Bike;

fn bike(id: i64, brand: &str, model: &str, price: &str, reg_year: &str, kms: &str) -> Bike {
    Bike {
        id,
        image: "https://cdn.test/bikes/main.jpg".to_string(),
        images: vec![],
        price: price.to_string(),
        model: model.to_string(),
        brand: brand.to_string(),
        category: vec!["Sports".to_string()],
        reg_year: reg_year.to_string(),
        kms: kms.to_string(),
        reg_state: "KA".to_string(),
        color: None,
        fuel_type: None,
        engine: None,
        description: None,
        features: vec![],
        condition: None,
        owner: None,
        contact: None,
        status: "available".to_string(),
        sold_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample() -> Vec<Bike> {
    vec![
        bike(1, "Ducati", "Panigale V2", "₹12,50,000", "2021", "8,000"),
        bike(2, "Royal Enfield", "Classic 350", "₹1,45,000", "2019", "22,000"),
        bike(3, "Yamaha", "R15 V4", "₹1,20,000", "2022", "5,500"),
        bike(4, "Ducati", "Monster", "₹9,80,000", "2018", "15,000"),
    ]
}

#[test]
fn parse_price_handles_currency_format() {
    assert_eq!(parse_price("₹6,25,000"), 625000);
    assert_eq!(parse_price("Rs 1,45,000"), 145000);
    assert_eq!(parse_price("125000"), 125000);
}

#[test]
fn parse_price_truncates_decimal_part() {
    assert_eq!(parse_price("₹1,45,000.50"), 145000);
    assert_eq!(parse_price("625000.99"), 625000);
}

#[test]
fn parse_price_falls_back_to_zero() {
    assert_eq!(parse_price("N/A"), 0);
    assert_eq!(parse_price(""), 0);
    assert_eq!(parse_price("가격 문의"), 0);
}

#[test]
fn parse_grouped_and_year() {
    assert_eq!(parse_grouped("22,000"), 22000);
    assert_eq!(parse_grouped("5500 km"), 5500);
    assert_eq!(parse_year("2021"), 2021);
    assert_eq!(parse_year("미상"), 0);
}

#[test]
fn search_matches_model_brand_and_combined() {
    let bikes = sample();

    let by_model = BikeFilter {
        search: Some("panigale".to_string()),
        ..Default::default()
    };
    assert_eq!(by_model.apply(&bikes).len(), 1);

    let by_brand = BikeFilter {
        search: Some("ducati".to_string()),
        ..Default::default()
    };
    assert_eq!(by_brand.apply(&bikes).len(), 2);

    // 브랜드와 모델에 걸쳐 있는 검색어
    let combined = BikeFilter {
        search: Some("Ducati Panigale".to_string()),
        ..Default::default()
    };
    let result = combined.apply(&bikes);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, 1);
}

#[test]
fn filters_combine_with_and() {
    let bikes = sample();
    let filter = BikeFilter {
        brand: Some("Ducati".to_string()),
        price_min: Some("₹10,00,000".to_string()),
        ..Default::default()
    };
    let result = filter.apply(&bikes);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, 1);
}

#[test]
fn empty_string_filters_are_ignored() {
    let bikes = sample();
    let filter = BikeFilter {
        search: Some("".to_string()),
        brand: Some("  ".to_string()),
        category: Some("".to_string()),
        ..Default::default()
    };
    assert_eq!(filter.apply(&bikes).len(), bikes.len());
}

#[test]
fn year_range_filters() {
    let bikes = sample();
    let filter = BikeFilter {
        year_min: Some("2019".to_string()),
        year_max: Some("2021".to_string()),
        ..Default::default()
    };
    let result = filter.apply(&bikes);
    let ids: Vec<i64> = result.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn price_low_and_high_are_exact_reversals() {
    let bikes = sample();

    let low = BikeFilter {
        sort: SortKey::PriceLow,
        ..Default::default()
    };
    let high = BikeFilter {
        sort: SortKey::PriceHigh,
        ..Default::default()
    };

    let mut low_ids: Vec<i64> = low.apply(&bikes).iter().map(|b| b.id).collect();
    let high_ids: Vec<i64> = high.apply(&bikes).iter().map(|b| b.id).collect();
    assert_eq!(low_ids, vec![3, 2, 4, 1]);
    low_ids.reverse();
    assert_eq!(low_ids, high_ids);
}

#[test]
fn kms_sort_uses_grouped_numbers() {
    let bikes = sample();
    let filter = BikeFilter {
        sort: SortKey::KmsLow,
        ..Default::default()
    };
    let ids: Vec<i64> = filter.apply(&bikes).iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![3, 1, 4, 2]);
}

#[test]
fn newest_keeps_input_order() {
    let bikes = sample();
    let filter = BikeFilter {
        sort: SortKey::Newest,
        ..Default::default()
    };
    let ids: Vec<i64> = filter.apply(&bikes).iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let mut bikes = sample();
    // 동일 연식 두 건은 입력 순서를 유지해야 한다.
    bikes.push(bike(5, "Honda", "CBR650R", "₹8,50,000", "2021", "12,000"));
    let filter = BikeFilter {
        sort: SortKey::YearNewest,
        ..Default::default()
    };
    let ids: Vec<i64> = filter.apply(&bikes).iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![3, 1, 5, 2, 4]);
}

#[test]
fn unknown_sort_param_falls_back_to_newest() {
    assert_eq!(SortKey::from_param("price-low"), SortKey::PriceLow);
    assert_eq!(SortKey::from_param("whatever"), SortKey::Newest);
    assert_eq!(SortKey::from_param(""), SortKey::Newest);
}

#[test]
fn has_filters_ignores_sort_and_blank_values() {
    assert!(!BikeFilter::default().has_filters());
    assert!(!BikeFilter {
        sort: SortKey::PriceLow,
        ..Default::default()
    }
    .has_filters());
    assert!(!BikeFilter {
        search: Some("  ".to_string()),
        ..Default::default()
    }
    .has_filters());
    assert!(BikeFilter {
        category: Some("Sports".to_string()),
        ..Default::default()
    }
    .has_filters());
    assert!(BikeFilter {
        price_max: Some("₹10,00,000".to_string()),
        ..Default::default()
    }
    .has_filters());
}

#[test]
fn limit_after_filtering_returns_full_page() {
    // 브랜드가 번갈아 섞인 목록에서 필터 후 제한을 적용해야
    // 요청한 건수만큼 채워진다.
    let mut bikes = Vec::new();
    for i in 0..6 {
        let brand = if i % 2 == 0 { "Ducati" } else { "Yamaha" };
        bikes.push(bike(i, brand, "Model", "₹1,00,000", "2020", "10,000"));
    }

    let filter = BikeFilter {
        brand: Some("Ducati".to_string()),
        ..Default::default()
    };
    assert!(filter.has_filters());

    let mut result = filter.apply(&bikes);
    result.truncate(2);
    let ids: Vec<i64> = result.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![0, 2]);
}

#[test]
fn filtered_sublist_preserves_relative_order() {
    let bikes = sample();
    let filter = BikeFilter {
        brand: Some("Ducati".to_string()),
        ..Default::default()
    };
    let ids: Vec<i64> = filter.apply(&bikes).iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 4]);
}
