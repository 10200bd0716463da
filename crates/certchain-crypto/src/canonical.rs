//! Canonical JSON used as hash input.
//!
//! Object keys are sorted by their UTF-8 bytes, no insignificant whitespace
//! is emitted, and strings use the RFC 8785 escaping rules. Integers are
//! written in plain decimal. Block content never carries floats; if one shows
//! up it is written in serde_json's shortest round-trip form.

use serde_json::Value;

/// Canonicalize a JSON value into its unique string form.
pub fn canonicalize(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));

            out.push('{');
            for (idx, (k, v)) in pairs.into_iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_string(k, out);
                out.push(':');
                write_value(v, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (idx, v) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_value(v, out);
            }
            out.push(']');
        }
        Value::String(s) => write_string(s, out),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.push_str(&i.to_string());
            } else if let Some(u) = n.as_u64() {
                out.push_str(&u.to_string());
            } else {
                out.push_str(&n.to_string());
            }
        }
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => out.push_str("null"),
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\u{20}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_keys() {
        let value = serde_json::json!({
            "z": 1,
            "a": 2,
            "m": 3,
        });
        assert_eq!(canonicalize(&value), r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn numeric_string_keys_sort_lexically() {
        let value = serde_json::json!({
            "2": "b",
            "10": "a",
            "a": 0,
        });
        assert_eq!(canonicalize(&value), r#"{"10":"a","2":"b","a":0}"#);
    }

    #[test]
    fn nested_objects_and_arrays() {
        let value = serde_json::json!({
            "outer": { "inner": [3, 1, 2], "flag": true },
            "none": null,
        });
        assert_eq!(
            canonicalize(&value),
            r#"{"none":null,"outer":{"flag":true,"inner":[3,1,2]}}"#
        );
    }

    #[test]
    fn escape_shortcuts_and_controls() {
        let value = serde_json::json!({
            "b": "\u{0008}",
            "f": "\u{000c}",
            "ctl": "\u{000f}",
            "quote": "\"",
            "backslash": "\\",
            "nl": "\n",
        });
        assert_eq!(
            canonicalize(&value),
            r#"{"b":"\b","backslash":"\\","ctl":"\u000f","f":"\f","nl":"\n","quote":"\""}"#
        );
    }

    #[test]
    fn non_ascii_passes_through() {
        let value = serde_json::json!({ "name": "Zoë Ñúñez" });
        assert_eq!(canonicalize(&value), r#"{"name":"Zoë Ñúñez"}"#);
    }

    #[test]
    fn large_unsigned_integers() {
        let value = serde_json::json!({ "token": u64::MAX, "neg": -5 });
        assert_eq!(
            canonicalize(&value),
            format!(r#"{{"neg":-5,"token":{}}}"#, u64::MAX)
        );
    }

    #[test]
    fn floats_use_shortest_form() {
        let value = serde_json::json!({ "x": 1.5, "y": 0.1 });
        assert_eq!(canonicalize(&value), r#"{"x":1.5,"y":0.1}"#);
    }
}
