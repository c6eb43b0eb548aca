use chrono::{DateTime, Local};
use log::warn;
use serde_json::Value;

use crate::domain::message::{Header, Message, MessagePart, MessagePartBody, Thread};
use crate::gmail::api::ThreadSummary;
use crate::gmail::context::{ConversionContext, DecodeFailure};
use crate::gmail::decoder::decode_body;
use crate::gmail::error::{ParseError, Result};
use crate::gmail::fields::{
    HeaderField, MessageField, MessagePartBodyField, MessagePartField, ThreadField, get_array,
    get_field, get_i64, get_str, get_u64,
};

static NO_BODY: Value = Value::Null;

/// Converts a raw message record. Bodies are decoded on the way; parts with
/// no inline data are registered with the context's reconciler.
pub fn parse_message(raw: &Value, ctx: &mut ConversionContext) -> Result<Message> {
    let message_id = get_str(raw, MessageField::Id);
    let payload = get_field(raw, MessageField::Payload).ok_or(ParseError::MissingField {
        record: "message",
        field: "payload",
    })?;
    let payload = parse_message_part(payload, message_id.as_deref(), ctx);

    let id = message_id.unwrap_or_default();
    let date = match get_field(raw, MessageField::Date) {
        Some(v) => {
            let millis = get_i64(raw, MessageField::Date)
                .ok_or_else(|| ParseError::InvalidDate(v.to_string(), id.clone()))?;
            date_from_epoch_millis(millis)
                .ok_or_else(|| ParseError::InvalidDate(millis.to_string(), id.clone()))?
        }
        None => {
            return Err(ParseError::MissingField {
                record: "message",
                field: "internalDate",
            });
        }
    };

    Ok(Message {
        id,
        thread_id: get_str(raw, MessageField::ThreadId),
        date,
        snippet: get_str(raw, MessageField::Snippet),
        payload,
    })
}

pub fn parse_message_part(
    raw: &Value,
    message_id: Option<&str>,
    ctx: &mut ConversionContext,
) -> MessagePart {
    let part_id = get_str(raw, MessagePartField::PartId);
    let mime_type = get_str(raw, MessagePartField::MimeType);
    let headers = parse_headers(raw);

    let raw_body = get_field(raw, MessagePartField::Body).unwrap_or(&NO_BODY);
    let body = parse_body(raw_body);
    if body.encoding_error {
        ctx.report_decode_failure(DecodeFailure {
            message_id: message_id.map(str::to_string),
            part_id: part_id.clone(),
            mime_type: mime_type.clone(),
        });
    }
    if body.is_empty() {
        ctx.reconciler
            .register(message_id, part_id.as_deref(), &body);
    }

    let parts = get_array(raw, MessagePartField::Parts)
        .iter()
        .map(|child| parse_message_part(child, message_id, ctx))
        .collect();

    MessagePart {
        id: part_id,
        mime_type,
        headers,
        body,
        parts,
    }
}

pub fn parse_headers(raw_part: &Value) -> Vec<Header> {
    get_array(raw_part, MessagePartField::Headers)
        .iter()
        .map(|h| Header {
            name: get_str(h, HeaderField::Name).unwrap_or_default(),
            value: get_str(h, HeaderField::Value).unwrap_or_default(),
        })
        .collect()
}

pub fn parse_body(raw_body: &Value) -> MessagePartBody {
    let encoded = get_str(raw_body, MessagePartBodyField::Data).unwrap_or_default();
    let decoded = decode_body(&encoded);
    MessagePartBody {
        data: decoded.text,
        size: get_u64(raw_body, MessagePartBodyField::Size).unwrap_or(0),
        attachment_id: get_str(raw_body, MessagePartBodyField::AttachmentId),
        encoding_error: decoded.encoding_error,
    }
}

/// Builds a thread from its list summary and the full thread record.
/// The subject comes from the first message's `Subject` header.
pub fn parse_thread(
    summary: &ThreadSummary,
    detail: &Value,
    ctx: &mut ConversionContext,
) -> Result<Thread> {
    let raw_messages = get_field(detail, ThreadField::Messages)
        .and_then(Value::as_array)
        .ok_or(ParseError::MissingField {
            record: "thread",
            field: "messages",
        })?;
    let messages = raw_messages
        .iter()
        .map(|m| parse_message(m, ctx))
        .collect::<Result<Vec<_>>>()?;

    let subject = messages
        .first()
        .and_then(Message::subject)
        .map(str::to_string);
    let id = get_str(detail, ThreadField::Id).unwrap_or_else(|| summary.id.clone());

    let thread = Thread {
        id,
        subject,
        messages,
    };
    sanity_check(&thread);
    Ok(thread)
}

fn sanity_check(thread: &Thread) {
    for m in thread.messages_with_other_subject() {
        warn!(
            "Message {} in thread {} has subject {:?}, thread subject is {:?}",
            m.id,
            thread.id,
            m.subject(),
            thread.subject
        );
    }
}

/// Sub-second precision is dropped.
pub fn date_from_epoch_millis(millis: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp(millis / 1000, 0).map(|utc| utc.with_timezone(&Local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gmail::decoder::encode_base64url;
    use crate::gmail::progress::ApiItemType;
    use serde_json::json;

    fn ctx() -> ConversionContext {
        ConversionContext::new(ApiItemType::Thread, None)
    }

    fn raw_message(id: &str, subject: Option<&str>, body: &str) -> Value {
        let mut headers = vec![json!({ "name": "From", "value": "ci@example.com" })];
        if let Some(s) = subject {
            headers.push(json!({ "name": "Subject", "value": s }));
        }
        json!({
            "id": id,
            "threadId": "thread-1",
            "snippet": "snippet",
            "internalDate": "1672531200999",
            "payload": {
                "partId": "",
                "mimeType": "multipart/alternative",
                "headers": headers,
                "body": { "size": 0 },
                "parts": [
                    {
                        "partId": "0",
                        "mimeType": "text/plain",
                        "headers": [],
                        "body": { "size": body.len(), "data": encode_base64url(body.as_bytes()) }
                    },
                    {
                        "partId": "1",
                        "mimeType": "application/octet-stream",
                        "headers": [],
                        "body": { "size": 2048, "attachmentId": "att-1" }
                    }
                ]
            }
        })
    }

    #[test]
    fn parses_nested_parts_and_decodes_bodies() {
        let mut ctx = ctx();
        let msg = parse_message(&raw_message("m1", Some("X"), "line1\r\nline2"), &mut ctx).unwrap();

        assert_eq!(msg.id, "m1");
        assert_eq!(msg.thread_id.as_deref(), Some("thread-1"));
        assert_eq!(msg.payload.parts.len(), 2);
        assert_eq!(msg.payload.parts[0].body.data, "line1\r\nline2");
        assert!(msg.payload.parts[1].is_leaf());
        assert_eq!(msg.plain_text_parts().len(), 1);
        assert_eq!(msg.subject(), Some("X"));
    }

    #[test]
    fn attachment_only_part_is_pending_once() {
        let mut ctx = ctx();
        parse_message(&raw_message("m1", None, "x"), &mut ctx).unwrap();

        let with_attachment: Vec<_> = ctx
            .reconciler
            .pending()
            .iter()
            .filter(|p| p.attachment_id.is_some())
            .collect();
        assert_eq!(with_attachment.len(), 1);
        assert_eq!(with_attachment[0].message_id.as_deref(), Some("m1"));
        assert_eq!(with_attachment[0].attachment_id.as_deref(), Some("att-1"));
        assert_eq!(with_attachment[0].part_id.as_deref(), Some("1"));
    }

    #[test]
    fn headers_keep_order_and_duplicates() {
        let raw = json!({
            "headers": [
                { "name": "Received", "value": "a" },
                { "name": "Received", "value": "b" },
                { "name": "Subject", "value": "s" }
            ]
        });
        let headers = parse_headers(&raw);
        let names: Vec<_> = headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Received", "Received", "Subject"]);
        assert_eq!(headers[1].value, "b");
    }

    #[test]
    fn undecodable_body_is_flagged_and_reported() {
        let mut ctx = ctx();
        let raw = json!({
            "partId": "0",
            "mimeType": "text/plain",
            "body": { "size": 3, "data": "%%%" }
        });
        let part = parse_message_part(&raw, Some("m9"), &mut ctx);
        assert!(part.body.encoding_error);
        assert_eq!(part.body.data, "%%%");
        assert_eq!(ctx.decode_failures.len(), 1);
        assert_eq!(ctx.decode_failures[0].message_id.as_deref(), Some("m9"));
    }

    #[test]
    fn date_drops_milliseconds() {
        let mut ctx = ctx();
        let msg = parse_message(&raw_message("m1", None, "x"), &mut ctx).unwrap();
        assert_eq!(msg.date.timestamp(), 1_672_531_200);
        assert_eq!(msg.date.timestamp_subsec_millis(), 0);
    }

    #[test]
    fn missing_payload_is_an_error() {
        let mut ctx = ctx();
        let err = parse_message(&json!({ "id": "m1", "internalDate": "1" }), &mut ctx).unwrap_err();
        assert!(matches!(err, ParseError::MissingField { field: "payload", .. }));
    }

    #[test]
    fn thread_subject_from_first_message() {
        let mut ctx = ctx();
        let summary = ThreadSummary {
            id: "thread-1".into(),
            ..Default::default()
        };
        let detail = json!({
            "id": "thread-1",
            "messages": [raw_message("m1", Some("X"), "a"), raw_message("m2", Some("Re: X"), "b")]
        });
        let thread = parse_thread(&summary, &detail, &mut ctx).unwrap();
        assert_eq!(thread.subject.as_deref(), Some("X"));
        assert_eq!(thread.messages.len(), 2);
        assert_eq!(thread.messages_with_other_subject().len(), 1);
    }

    #[test]
    fn thread_without_subject_header() {
        let mut ctx = ctx();
        let summary = ThreadSummary {
            id: "fallback".into(),
            ..Default::default()
        };
        let detail = json!({ "messages": [raw_message("m1", None, "a")] });
        let thread = parse_thread(&summary, &detail, &mut ctx).unwrap();
        assert_eq!(thread.subject, None);
        assert_eq!(thread.id, "fallback");
    }
}
