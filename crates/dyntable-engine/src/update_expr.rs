//! Alias-table builder for dynamic partial updates.
//!
//! Row field names are arbitrary user input and the backend's update language
//! reserves many identifiers, so the update expression is built purely from
//! opaque placeholders: field `i` (in insertion order) becomes the name alias
//! `#fi` bound to the real name and the value slot `:vi` bound to the value.
//! The `fields` container attribute is aliased too. `updated_at` is always
//! bumped alongside the field assignments.

use chrono::{DateTime, Utc};
use dyntable_store::UpdateExpression;
use serde_json::{Map, Value};

const FIELDS_ALIAS: &str = "#fields";
const FIELDS_ATTR: &str = "fields";
const UPDATED_AT_SLOT: &str = ":updated_at";

/// Build the partial-update expression for one row's `fields`.
///
/// The caller guarantees `fields` is non-empty; emptiness is a validation
/// failure upstream.
pub fn build_row_update(fields: &Map<String, Value>, updated_at: DateTime<Utc>) -> UpdateExpression {
    let mut update = UpdateExpression::default();
    let mut assignments = Vec::with_capacity(fields.len() + 1);

    assignments.push(format!("updated_at = {UPDATED_AT_SLOT}"));
    update.values.insert(
        UPDATED_AT_SLOT.to_string(),
        Value::String(updated_at.to_rfc3339()),
    );
    update
        .names
        .insert(FIELDS_ALIAS.to_string(), FIELDS_ATTR.to_string());

    for (index, (name, value)) in fields.iter().enumerate() {
        let name_alias = format!("#f{index}");
        let value_slot = format!(":v{index}");
        assignments.push(format!("{FIELDS_ALIAS}.{name_alias} = {value_slot}"));
        update.names.insert(name_alias, name.clone());
        update.values.insert(value_slot, value.clone());
    }

    update.expression = format!("SET {}", assignments.join(", "));
    update
}
