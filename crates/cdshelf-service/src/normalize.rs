//! Schema step between the raw bulk listing payload and [`DiscRecord`]s.
//!
//! The payload must be an object with a `discs` array. Elements without a
//! usable id are dropped; every other field is read leniently and falls
//! back to its default when missing or of the wrong type.

use cdshelf_core::{DiscRecord, UpstreamError};
use serde_json::{Map, Value};
use tracing::warn;

type Object = Map<String, Value>;

/// Converts a bulk listing payload into discs, keeping upstream order.
pub fn normalize_collection(payload: Value) -> Result<Vec<DiscRecord>, UpstreamError> {
    let mut root = match payload {
        Value::Object(root) => root,
        other => {
            return Err(UpstreamError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                kind(&other)
            )))
        }
    };

    let items = match root.remove("discs") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(UpstreamError::MalformedResponse(format!(
                "field 'discs' must be an array, got {}",
                kind(&other)
            )))
        }
        None => {
            return Err(UpstreamError::MalformedResponse(
                "missing field 'discs'".to_string(),
            ))
        }
    };

    let total = items.len();
    let discs: Vec<DiscRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| normalize_disc(index, item))
        .collect();

    if discs.len() < total {
        warn!(
            kept = discs.len(),
            skipped = total - discs.len(),
            "Dropped collection entries without a usable id"
        );
    }

    Ok(discs)
}

fn normalize_disc(index: usize, item: Value) -> Option<DiscRecord> {
    let obj = match item {
        Value::Object(obj) => obj,
        other => {
            warn!(index, kind = kind(&other), "Skipping collection entry that is not an object");
            return None;
        }
    };

    let Some(id) = disc_id(&obj) else {
        warn!(index, "Skipping collection entry without id");
        return None;
    };

    Some(DiscRecord {
        id,
        title: string(&obj, &["title"]),
        cover: string(&obj, &["cover"]),
        label: string(&obj, &["label"]),
        label_id: label_id(&obj),
        label_cover: string(&obj, &["labelcover", "labelCover"]),
        boost: field(&obj, &["boost"]).and_then(Value::as_f64),
        comment: string(&obj, &["comment"]),
        only_has_gift: field(&obj, &["onlyhavegift", "onlyHasGift"])
            .and_then(Value::as_bool)
            .unwrap_or(false),
        promo_link: Some(string(&obj, &["promolink", "promoLink"])).filter(|s| !s.is_empty()),
    })
}

/// First present, non-null value among `names`.
fn field<'a>(obj: &'a Object, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|value| !value.is_null())
}

fn string(obj: &Object, names: &[&str]) -> String {
    field(obj, names)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Ids are strings upstream but occasionally arrive as numbers.
fn disc_id(obj: &Object) -> Option<String> {
    let id = match field(obj, &["id"])? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!id.is_empty()).then_some(id)
}

fn label_id(obj: &Object) -> u64 {
    match field(obj, &["labelid", "labelId"]) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
