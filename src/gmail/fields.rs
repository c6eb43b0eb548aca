//! Named fields of the Gmail REST records and a lookup that treats
//! falsy values (`null`, `""`, `0`, `false`, `[]`, `{}`) as missing.

use serde_json::Value;

pub trait ApiField: Copy {
    fn key(self) -> &'static str;
}

macro_rules! api_fields {
    ($name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl ApiField for $name {
            fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }
    };
}

api_fields!(HeaderField {
    Name => "name",
    Value => "value",
});

api_fields!(MessagePartBodyField {
    Size => "size",
    Data => "data",
    AttachmentId => "attachmentId",
});

api_fields!(MessagePartField {
    PartId => "partId",
    MimeType => "mimeType",
    Headers => "headers",
    Body => "body",
    Parts => "parts",
});

api_fields!(MessageField {
    Id => "id",
    ThreadId => "threadId",
    Snippet => "snippet",
    Date => "internalDate",
    Payload => "payload",
});

api_fields!(ThreadField {
    Id => "id",
    Messages => "messages",
    Snippet => "snippet",
});

pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// The field's value, or `None` when it is absent or falsy.
pub fn get_field<F: ApiField>(record: &Value, field: F) -> Option<&Value> {
    record.get(field.key()).filter(|v| !is_falsy(v))
}

pub fn get_field_or<'a, F: ApiField>(record: &'a Value, field: F, default: &'a Value) -> &'a Value {
    get_field(record, field).unwrap_or(default)
}

/// String fields; numbers are rendered since the API sends some ids and
/// counters either way.
pub fn get_str<F: ApiField>(record: &Value, field: F) -> Option<String> {
    match get_field(record, field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn get_u64<F: ApiField>(record: &Value, field: F) -> Option<u64> {
    match get_field(record, field)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub fn get_i64<F: ApiField>(record: &Value, field: F) -> Option<i64> {
    match get_field(record, field)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub fn get_array<F: ApiField>(record: &Value, field: F) -> &[Value] {
    get_field(record, field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_and_falsy_collapse_to_default() {
        let record = json!({
            "id": "",
            "snippet": null,
            "threadId": "t1",
            "internalDate": 0,
        });
        let fallback = json!("fallback");

        assert_eq!(get_field(&record, MessageField::Id), None);
        assert_eq!(get_field(&record, MessageField::Snippet), None);
        assert_eq!(get_field(&record, MessageField::Date), None);
        assert_eq!(get_field(&record, MessageField::Payload), None);
        assert_eq!(
            get_field_or(&record, MessageField::Id, &fallback),
            &fallback
        );
        assert_eq!(get_str(&record, MessageField::ThreadId).as_deref(), Some("t1"));
    }

    #[test]
    fn empty_collections_are_missing() {
        let record = json!({ "parts": [], "body": {} });
        assert!(get_field(&record, MessagePartField::Parts).is_none());
        assert!(get_field(&record, MessagePartField::Body).is_none());
        assert!(get_array(&record, MessagePartField::Parts).is_empty());
    }

    #[test]
    fn numeric_strings_are_parsed() {
        let record = json!({ "internalDate": "1672531200123", "size": 42 });
        assert_eq!(get_i64(&record, MessageField::Date), Some(1_672_531_200_123));
        assert_eq!(get_u64(&record, MessagePartBodyField::Size), Some(42));
    }
}
