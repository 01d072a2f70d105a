/// 매물 목록 필터/정렬 엔진
/// 1. 검색어, 카테고리, 브랜드, 등록 지역, 가격/연식 범위 필터 (AND 조합)
/// 2. 정렬 키 적용 (안정 정렬, 동순위는 입력 순서 유지)
// region:    --- Imports
use crate::inventory::model::Bike;
use serde::Deserialize;

// endregion: --- Imports

// region:    --- Price Parser

/// 통화 문자열을 비교 가능한 정수로 변환
/// "₹6,25,000" -> 625000, 파싱 불가능한 값("N/A" 등)은 0으로 처리한다.
/// 소수점 이하는 버린다 ("₹1,45,000.50" -> 145000).
/// 업스트림 데이터가 깨져 있어도 필터가 실패하지 않도록 하는 정책이다.
pub fn parse_price(raw: &str) -> i64 {
    let cleaned: String = raw
        .replace('₹', "")
        .replace("Rs", "")
        .replace(',', "")
        .trim()
        .to_string();
    parse_leading_digits(&cleaned)
}

/// 콤마 구분 정수 문자열 변환 ("12,000" -> 12000)
pub fn parse_grouped(raw: &str) -> i64 {
    let cleaned = raw.replace(',', "");
    parse_leading_digits(cleaned.trim())
}

/// 4자리 연식 문자열 변환, 실패 시 0
pub fn parse_year(raw: &str) -> i64 {
    parse_leading_digits(raw.trim())
}

/// 앞쪽 숫자 구간만 파싱 (뒤에 잡문자가 붙어 있어도 허용)
fn parse_leading_digits(s: &str) -> i64 {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

// endregion: --- Price Parser

// region:    --- Sort Key

/// 정렬 키
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SortKey {
    /// 입력 순서를 그대로 둔다. 업스트림이 created_at DESC로 내려주는 것에
    /// 의존하며, 별도의 날짜 정렬을 수행하지 않는다.
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "year-newest")]
    YearNewest,
    #[serde(rename = "year-oldest")]
    YearOldest,
    #[serde(rename = "price-low")]
    PriceLow,
    #[serde(rename = "price-high")]
    PriceHigh,
    #[serde(rename = "kms-low")]
    KmsLow,
    #[serde(rename = "kms-high")]
    KmsHigh,
}

impl SortKey {
    /// 쿼리 파라미터 문자열에서 변환, 모르는 값은 기본값(newest)
    pub fn from_param(raw: &str) -> Self {
        match raw {
            "year-newest" => SortKey::YearNewest,
            "year-oldest" => SortKey::YearOldest,
            "price-low" => SortKey::PriceLow,
            "price-high" => SortKey::PriceHigh,
            "kms-low" => SortKey::KmsLow,
            "kms-high" => SortKey::KmsHigh,
            _ => SortKey::Newest,
        }
    }
}

// endregion: --- Sort Key

// region:    --- Filter Engine

/// 필터/정렬 파라미터
/// 빈 문자열은 필터 미지정과 동일하게 취급한다.
#[derive(Debug, Clone, Default)]
pub struct BikeFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub reg_state: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub year_min: Option<String>,
    pub year_max: Option<String>,
    pub sort: SortKey,
}

impl BikeFilter {
    /// 인메모리 필터가 하나라도 지정되어 있는지 (정렬 키는 제외)
    /// 건수 제한과 조합될 때 SQL LIMIT을 필터 적용 뒤로 미룰지 결정하는 데 쓰인다.
    pub fn has_filters(&self) -> bool {
        [
            &self.search,
            &self.category,
            &self.brand,
            &self.reg_state,
            &self.price_min,
            &self.price_max,
            &self.year_min,
            &self.year_max,
        ]
        .into_iter()
        .any(|value| non_empty(value).is_some())
    }

    /// 필터와 정렬을 적용한 새 목록 반환. 입력은 변경하지 않는다.
    pub fn apply(&self, bikes: &[Bike]) -> Vec<Bike> {
        let mut filtered: Vec<Bike> = bikes
            .iter()
            .filter(|bike| self.matches(bike))
            .cloned()
            .collect();

        // Vec::sort_by는 안정 정렬이므로 동순위는 입력 순서가 유지된다.
        match self.sort {
            SortKey::Newest => {}
            SortKey::YearNewest => {
                filtered.sort_by(|a, b| parse_year(&b.reg_year).cmp(&parse_year(&a.reg_year)))
            }
            SortKey::YearOldest => {
                filtered.sort_by(|a, b| parse_year(&a.reg_year).cmp(&parse_year(&b.reg_year)))
            }
            SortKey::PriceLow => {
                filtered.sort_by(|a, b| parse_price(&a.price).cmp(&parse_price(&b.price)))
            }
            SortKey::PriceHigh => {
                filtered.sort_by(|a, b| parse_price(&b.price).cmp(&parse_price(&a.price)))
            }
            SortKey::KmsLow => {
                filtered.sort_by(|a, b| parse_grouped(&a.kms).cmp(&parse_grouped(&b.kms)))
            }
            SortKey::KmsHigh => {
                filtered.sort_by(|a, b| parse_grouped(&b.kms).cmp(&parse_grouped(&a.kms)))
            }
        }

        filtered
    }

    /// 지정된 모든 필터를 만족하는지 검사 (AND 조합)
    fn matches(&self, bike: &Bike) -> bool {
        if let Some(category) = non_empty(&self.category) {
            if !bike.category.iter().any(|c| c == category) {
                return false;
            }
        }

        if let Some(query) = non_empty(&self.search) {
            let query = query.to_lowercase();
            let model = bike.model.to_lowercase();
            let brand = bike.brand.to_lowercase();
            // 브랜드와 모델을 이어붙인 문자열에도 매칭해야
            // "Ducati Panigale" 같은 검색어가 동작한다.
            let combined = format!("{} {}", brand, model);
            if !model.contains(&query) && !brand.contains(&query) && !combined.contains(&query) {
                return false;
            }
        }

        if let Some(brand) = non_empty(&self.brand) {
            if bike.brand != brand {
                return false;
            }
        }

        if let Some(state) = non_empty(&self.reg_state) {
            if bike.reg_state != state {
                return false;
            }
        }

        if let Some(min) = non_empty(&self.price_min) {
            if parse_price(&bike.price) < parse_price(min) {
                return false;
            }
        }
        if let Some(max) = non_empty(&self.price_max) {
            if parse_price(&bike.price) > parse_price(max) {
                return false;
            }
        }

        if let Some(min) = non_empty(&self.year_min) {
            if parse_year(&bike.reg_year) < parse_year(min) {
                return false;
            }
        }
        if let Some(max) = non_empty(&self.year_max) {
            if parse_year(&bike.reg_year) > parse_year(max) {
                return false;
            }
        }

        true
    }
}

/// 빈 문자열을 미지정으로 정규화
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

// endregion: --- Filter Engine
