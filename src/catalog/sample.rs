//! Sample catalog for trying the scanner without real inventory data

use chrono::{Duration, NaiveDate};

use super::Product;

/// GS1 prefix assigned to Korea
const COUNTRY_PREFIX: &str = "880";
/// Sample expirations fall this many days after the reference day
const MIN_SHELF_DAYS: i64 = 30;
const MAX_SHELF_DAYS: i64 = 500;

const SAMPLE_PRODUCT_NAMES: [&str; 50] = [
    "농심 신라면", "오뚜기 진라면(매운맛)", "삼양 불닭볶음면", "팔도 비빔면", "짜파게티",
    "햇반", "오뚜기밥", "비비고 왕교자", "동원참치", "스팸 클래식",
    "서울우유", "매일우유", "바나나맛 우유", "덴마크 드링킹요구르트", "액티비아",
    "코카콜라", "칠성사이다", "펩시콜라", "삼다수", "포카리스웨트",
    "참이슬 후레쉬", "처음처럼", "카스", "테라", "하이트",
    "빼빼로", "새우깡", "포카칩", "초코파이", "홈런볼",
    "월드콘", "메로나", "투게더", "붕어싸만코", "빵빠레",
    "맥심 모카골드", "카누 미니 다크", "제주감귤주스", "델몬트 오렌지주스", "옥수수수염차",
    "해표 식용유", "청정원 순창고추장", "백설 설탕", "곰표 밀가루", "몽고간장",
    "페리오 치약", "리스테린", "도브 비누", "질레트 면도기", "깨끗한나라 휴지",
];

/// EAN-13 check digit for the first 12 digits of a code
pub fn ean13_check_digit(first_twelve: &str) -> Option<u32> {
    if first_twelve.len() != 12 {
        return None;
    }

    let mut sum = 0;
    for (index, c) in first_twelve.chars().enumerate() {
        let digit = c.to_digit(10)?;
        sum += if index % 2 == 0 { digit } else { digit * 3 };
    }
    Some((10 - sum % 10) % 10)
}

/// Fifty sample products with unique EAN-13 codes and expirations spread
/// between 30 and 500 days after `today`. Output depends only on `today`.
pub fn sample_products(today: NaiveDate) -> Vec<Product> {
    let span = MAX_SHELF_DAYS - MIN_SHELF_DAYS + 1;

    SAMPLE_PRODUCT_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let item = 100_000_000 + index as u64 * 17_171_717;
            let body = format!("{COUNTRY_PREFIX}{item:09}");
            // body is always twelve ASCII digits
            let check = ean13_check_digit(&body).unwrap_or(0);

            let shelf_days = MIN_SHELF_DAYS + (index as i64 * 37) % span;
            let exp = today + Duration::days(shelf_days);

            Product {
                code: format!("{body}{check}"),
                name: name.to_string(),
                exp: exp.format("%Y-%m-%d").to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FreshnessStatus;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_check_digit_known_codes() {
        // 4006381333931 is a commonly cited valid EAN-13
        assert_eq!(ean13_check_digit("400638133393"), Some(1));
        assert_eq!(ean13_check_digit("880123456789"), Some(3));
    }

    #[test]
    fn test_check_digit_rejects_bad_input() {
        assert_eq!(ean13_check_digit("12345"), None);
        assert_eq!(ean13_check_digit("88012345678X"), None);
    }

    #[test]
    fn test_sample_products_shape() {
        let products = sample_products(today());
        assert_eq!(products.len(), 50);

        let codes: HashSet<_> = products.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes.len(), 50);

        for product in &products {
            assert_eq!(product.code.len(), 13);
            assert!(product.code.starts_with("880"));
            let check = ean13_check_digit(&product.code[..12]).unwrap();
            assert_eq!(product.code[12..].parse::<u32>().unwrap(), check);
        }
    }

    #[test]
    fn test_sample_expirations_in_range() {
        for product in sample_products(today()) {
            let (status, delta) = product.freshness(today());
            let delta = delta.unwrap();
            assert!((MIN_SHELF_DAYS..=MAX_SHELF_DAYS).contains(&delta));
            assert_eq!(status, FreshnessStatus::Normal);
        }
    }

    #[test]
    fn test_sample_is_deterministic() {
        assert_eq!(sample_products(today()), sample_products(today()));
    }
}
