//! Upstream → client schema mapping.

use crate::places::types::{Place, PlaceRecord};

/// Rename upstream fields into the client schema.
///
/// `code` → `slug`, `country_name` → `subtitle`, `name` → `title`.
/// Every record yields exactly one place, in the same order.
pub fn transform(records: &[PlaceRecord]) -> Vec<Place> {
    records.iter().map(Place::from).collect()
}

impl From<&PlaceRecord> for Place {
    fn from(record: &PlaceRecord) -> Self {
        Self {
            slug: record.code.clone(),
            subtitle: record.country_name.clone(),
            title: record.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, name: &str, country: &str) -> PlaceRecord {
        PlaceRecord {
            code: code.into(),
            name: name.into(),
            country_name: country.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_renames_fields() {
        let places = transform(&[record("MOW", "Moscow", "Russia")]);
        assert_eq!(
            places,
            vec![Place {
                slug: "MOW".into(),
                subtitle: "Russia".into(),
                title: "Moscow".into(),
            }]
        );
    }

    #[test]
    fn test_preserves_order_and_length() {
        let input = vec![
            record("LED", "Saint Petersburg", "Russia"),
            record("", "", ""),
            record("BER", "Berlin", "Germany"),
        ];

        let output = transform(&input);
        assert_eq!(output.len(), input.len());
        for (place, record) in output.iter().zip(&input) {
            assert_eq!(place.slug, record.code);
            assert_eq!(place.title, record.name);
            assert_eq!(place.subtitle, record.country_name);
        }
    }

    #[test]
    fn test_is_idempotent() {
        let input = vec![record("MOW", "Moscow", "Russia"), record("PAR", "Paris", "France")];
        assert_eq!(transform(&input), transform(&input));
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(transform(&[]).is_empty());
    }
}
