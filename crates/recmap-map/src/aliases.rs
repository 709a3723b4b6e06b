//! Canonical field aliases.
//!
//! The built-in table maps a canonical target key to the alternate source
//! names commonly seen for it. User-supplied aliases from
//! [`AutoMapperConfig::custom_aliases`](crate::config::AutoMapperConfig)
//! merge on top without duplicating entries. Lookups go through a reverse
//! alias-to-canonical map that is rebuilt whenever aliases or
//! case-sensitivity change.

use std::collections::BTreeMap;

use tracing::warn;

/// Total alias entries tracked across all canonicals. Further merges are
/// ignored with a warning.
pub const MAX_ALIAS_ENTRIES: usize = 1000;

const BUILTIN: &[(&str, &[&str])] = &[
    ("address", &["street", "street_address", "address_line_1"]),
    ("category", &["cat", "group", "product_category"]),
    ("city", &["town", "locality"]),
    ("country", &["country_code", "nation"]),
    ("created_at", &["created", "creation_date", "date_created"]),
    ("currency", &["currency_code", "ccy"]),
    ("description", &["desc", "details", "summary", "long_description", "body"]),
    ("email", &["email_address", "e_mail", "mail"]),
    ("id", &["identifier", "key", "uid", "uuid", "external_id"]),
    ("image", &["img", "picture", "photo", "image_url", "thumbnail"]),
    ("name", &["title", "product_name", "item_name", "label", "display_name"]),
    ("phone", &["phone_number", "telephone", "tel", "mobile"]),
    ("price", &["unit_price", "amount", "cost", "sale_price"]),
    ("quantity", &["qty", "stock", "inventory", "stock_level"]),
    ("sku", &["product_code", "item_code", "code", "item_no", "part_number", "article_number"]),
    ("status", &["state", "stage"]),
    ("updated_at", &["updated", "modified", "last_modified", "date_modified"]),
    ("url", &["link", "website", "web_address", "href"]),
    ("weight", &["wt", "mass"]),
    ("zip", &["zipcode", "postal_code", "postcode"]),
];

/// The built-in canonical-to-aliases table.
pub fn builtin_aliases() -> BTreeMap<String, Vec<String>> {
    BUILTIN
        .iter()
        .map(|(canonical, aliases)| {
            (
                (*canonical).to_string(),
                aliases.iter().map(|alias| (*alias).to_string()).collect(),
            )
        })
        .collect()
}

/// Merges user aliases into the built-in table. New aliases are appended
/// to their canonical's list; existing ones are kept once. The merge stops
/// at [`MAX_ALIAS_ENTRIES`] total entries.
pub fn merged_aliases(custom: &BTreeMap<String, Vec<String>>) -> BTreeMap<String, Vec<String>> {
    let mut merged = builtin_aliases();
    let mut total: usize = merged.values().map(Vec::len).sum();
    for (canonical, aliases) in custom {
        let entry = merged.entry(canonical.clone()).or_default();
        for alias in aliases {
            if entry.iter().any(|existing| existing == alias) {
                continue;
            }
            if total >= MAX_ALIAS_ENTRIES {
                warn!(limit = MAX_ALIAS_ENTRIES, "alias table full, ignoring remaining aliases");
                return merged;
            }
            entry.push(alias.clone());
            total += 1;
        }
    }
    merged
}

/// Builds the alias-to-canonical lookup used by the alias strategy. Keys
/// and values are case-folded unless `case_sensitive`.
pub fn reverse_alias_map(
    aliases: &BTreeMap<String, Vec<String>>,
    case_sensitive: bool,
) -> BTreeMap<String, String> {
    let fold = |s: &str| {
        if case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    };
    let mut reverse = BTreeMap::new();
    for (canonical, alias_list) in aliases {
        for alias in alias_list {
            reverse.entry(fold(alias)).or_insert_with(|| fold(canonical));
        }
    }
    reverse
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_reverse_lookup() {
        let reverse = reverse_alias_map(&builtin_aliases(), false);
        assert_eq!(reverse.get("product_code").map(String::as_str), Some("sku"));
        assert_eq!(reverse.get("product_name").map(String::as_str), Some("name"));
    }

    #[test]
    fn merge_adds_without_duplicating() {
        let mut custom = BTreeMap::new();
        custom.insert(
            "sku".to_string(),
            vec!["product_code".to_string(), "artikelnummer".to_string()],
        );
        let merged = merged_aliases(&custom);
        let sku = &merged["sku"];
        assert_eq!(
            sku.iter().filter(|alias| alias.as_str() == "product_code").count(),
            1
        );
        assert!(sku.iter().any(|alias| alias == "artikelnummer"));
    }

    #[test]
    fn merge_respects_entry_cap() {
        let mut custom = BTreeMap::new();
        custom.insert(
            "bulk".to_string(),
            (0..MAX_ALIAS_ENTRIES + 10).map(|i| format!("alias_{i}")).collect(),
        );
        let merged = merged_aliases(&custom);
        let total: usize = merged.values().map(Vec::len).sum();
        assert!(total <= MAX_ALIAS_ENTRIES);
    }

    #[test]
    fn case_sensitive_reverse_keeps_casing() {
        let mut aliases = BTreeMap::new();
        aliases.insert("Name".to_string(), vec!["Title".to_string()]);
        let reverse = reverse_alias_map(&aliases, true);
        assert_eq!(reverse.get("Title").map(String::as_str), Some("Name"));
        assert!(reverse.get("title").is_none());
    }
}
