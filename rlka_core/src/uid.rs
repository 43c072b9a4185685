//! Stable identifiers of collection events.

use crate::schedule::ScheduleKey;

/// Get a unique id for one collection event of a place and street.
///
/// Calendar clients use the id to update events instead of duplicating them on every refresh.
/// Changing this function is a breaking change!
pub fn uid(
    category: &str,
    key: ScheduleKey,
    year: i32,
    start: &str,
    description: Option<&str>,
) -> String {
    let mut source = format!(
        "{}-{}-{}-{year}-{start}",
        category.to_lowercase(),
        key.place,
        key.street
    );
    if let Some(description) = description {
        source.push('-');
        source.push_str(&description.to_lowercase());
    }
    format!("{:x}", md5::compute(source))
}

#[cfg(test)]
mod tests {
    use crate::{schedule::ScheduleKey, uid::uid};

    const KEY: ScheduleKey = ScheduleKey {
        place: 80,
        street: 498,
    };

    #[test]
    fn test_uid_known_digest() {
        assert_eq!(
            uid("Restabfall", KEY, 2024, "20240301", None),
            "a34b1178a178b43f0c729c67f105fe30"
        );
        assert_eq!(
            uid(
                "Restabfall",
                KEY,
                2024,
                "20240301",
                Some("06:00-12:00 Sammelstelle")
            ),
            "09e2ce6c522f8708a6ddc8add936583f"
        );
    }

    #[test]
    fn test_uid_of_unescaped_description() {
        assert_eq!(
            uid("Restabfall", KEY, 2023, "20240301", Some("Hinweis, bitte")),
            "b3adf71c9067f4c523aba36d51c70533"
        );
    }

    #[test]
    fn test_uid_deterministic() {
        let first = uid("Altpapier", KEY, 2024, "20240301", Some("Hinweis"));
        let second = uid("Altpapier", KEY, 2024, "20240301", Some("Hinweis"));
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_uid_varies_with_every_field() {
        let base = uid("Altpapier", KEY, 2024, "20240301", Some("Hinweis"));
        let variants = [
            uid("Bioabfall", KEY, 2024, "20240301", Some("Hinweis")),
            uid("Altpapier", ScheduleKey::new(81, 498), 2024, "20240301", Some("Hinweis")),
            uid("Altpapier", ScheduleKey::new(80, 499), 2024, "20240301", Some("Hinweis")),
            uid("Altpapier", KEY, 2025, "20240301", Some("Hinweis")),
            uid("Altpapier", KEY, 2024, "20240302", Some("Hinweis")),
            uid("Altpapier", KEY, 2024, "20240301", Some("Anderer Hinweis")),
            uid("Altpapier", KEY, 2024, "20240301", None),
        ];
        for variant in variants {
            assert_ne!(variant, base);
        }
    }

    #[test]
    fn test_uid_ignores_case() {
        assert_eq!(
            uid("ALTPAPIER", KEY, 2024, "20240301", Some("HINWEIS")),
            uid("altpapier", KEY, 2024, "20240301", Some("hinweis"))
        );
    }
}
