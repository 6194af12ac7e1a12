//! Snapshot format: a JSON array of catalog items, array order = insertion order.

use serde_json::Value;
use tracing::warn;

use crate::catalog::CatalogItem;
use crate::metrics::WATCHLIST_PERSISTENCE_FAILURES;

use super::WatchlistError;

/// Serialize the full watchlist.
pub fn encode(items: &[CatalogItem]) -> Result<String, WatchlistError> {
    serde_json::to_string(items).map_err(|e| WatchlistError::Encode(e.to_string()))
}

/// Parse a stored snapshot.
///
/// Anything other than a JSON array is corrupt. Entries that are not items
/// (no `id`, or an id that is neither an integer nor a string) are skipped
/// with a warning and the rest of the list is kept.
pub fn decode(raw: &str) -> Result<Vec<CatalogItem>, WatchlistError> {
    let entries: Vec<Value> =
        serde_json::from_str(raw).map_err(|e| WatchlistError::Corrupt(e.to_string()))?;

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<CatalogItem>(entry) {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!("Skipping unreadable watchlist entry at index {}: {}", index, e);
                WATCHLIST_PERSISTENCE_FAILURES
                    .with_label_values(&["entry"])
                    .inc();
            }
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemId;

    #[test]
    fn test_decode_preserves_order_and_fields() {
        let raw = r#"[{"id":157336,"title":"Interstellar"},{"id":27205,"title":"Inception","vote_average":8.4}]"#;
        let items = decode(raw).unwrap();
        assert_eq!(items[0].id, ItemId::Number(157336));
        assert_eq!(items[1].vote_average(), Some(8.4));

        let reencoded: serde_json::Value = serde_json::from_str(&encode(&items).unwrap()).unwrap();
        let original: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(reencoded, original);
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_non_json() {
        assert!(matches!(decode("not json"), Err(WatchlistError::Corrupt(_))));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert!(decode(r#"{"id": 1}"#).is_err());
        assert!(decode("null").is_err());
    }

    #[test]
    fn test_decode_skips_unreadable_entries() {
        let raw = r#"[
            {"id": 27205, "title": "Inception"},
            {"id": 1.0e0, "title": "float id"},
            {"title": "no id"},
            {"id": 18446744073709551615},
            "not an object",
            {"id": "tt0816692", "title": "Interstellar"}
        ]"#;
        let items = decode(raw).unwrap();

        let ids: Vec<_> = items.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec![ItemId::Number(27205), ItemId::from("tt0816692")]);
        assert_eq!(items[1].title(), Some("Interstellar"));
    }
}
