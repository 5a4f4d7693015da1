//! Cart form parser
//!
//! Decodes the urlencoded forms the cart views accept. The bulk update form
//! carries one `update_item-<id>=<quantity>` field per cart item; other
//! fields (CSRF tokens, submit buttons) are ignored.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::entities::CartItemId;
use crate::error::FormError;

/// Prefix of the bulk update form fields
pub const UPDATE_ITEM_PREFIX: &str = "update_item-";

fn update_item_field() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^update_item-(\S+)$").expect("static regex"))
}

/// Parse a quantity field. Surrounding whitespace is allowed; the sign is
/// left for the caller to judge.
pub fn parse_quantity(field: &str, value: &str) -> Result<i32, FormError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| FormError::InvalidQuantity {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Parse the bulk update form into `(item, quantity)` pairs ordered by item id
pub fn parse_bulk_update(
    fields: &HashMap<String, String>,
) -> Result<Vec<(CartItemId, i32)>, FormError> {
    let mut updates = Vec::new();

    for (name, value) in fields {
        let Some(captures) = update_item_field().captures(name) else {
            continue;
        };

        let id = captures[1]
            .parse::<i64>()
            .map_err(|_| FormError::InvalidItemId(name.clone()))?;
        let quantity = parse_quantity(name, value)?;

        updates.push((CartItemId(id), quantity));
    }

    updates.sort_by_key(|(id, _)| *id);
    Ok(updates)
}
