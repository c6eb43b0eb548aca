use chrono::{DateTime, Local};

pub const TEXT_PLAIN: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePartBody {
    /// Decoded text; empty when the payload lives behind `attachment_id`.
    pub data: String,
    pub size: u64,
    pub attachment_id: Option<String>,
    /// Set when `data` still holds the original, undecodable transport text.
    pub encoding_error: bool,
}

impl MessagePartBody {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Exactly one of inline data and attachment reference is present.
    pub fn is_well_formed(&self) -> bool {
        !self.data.is_empty() ^ self.attachment_id.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePart {
    pub id: Option<String>,
    pub mime_type: Option<String>,
    pub headers: Vec<Header>,
    pub body: MessagePartBody,
    pub parts: Vec<MessagePart>,
}

impl MessagePart {
    pub fn is_leaf(&self) -> bool {
        self.parts.is_empty()
    }

    /// First header with exactly this name (case-sensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }

    pub fn has_mime_type(&self, mime_type: &str) -> bool {
        self.mime_type.as_deref() == Some(mime_type)
    }

    /// Every part of the tree, children before their parent.
    pub fn flatten(&self) -> Vec<&MessagePart> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a MessagePart>) {
        for child in &self.parts {
            child.collect_into(out);
        }
        out.push(self);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub thread_id: Option<String>,
    pub date: DateTime<Local>,
    pub snippet: Option<String>,
    pub payload: MessagePart,
}

impl Message {
    pub fn subject(&self) -> Option<&str> {
        self.payload.header("Subject")
    }

    pub fn all_parts(&self) -> Vec<&MessagePart> {
        self.payload.flatten()
    }

    pub fn parts_with_type(&self, mime_type: &str) -> Vec<&MessagePart> {
        self.all_parts()
            .into_iter()
            .filter(|p| p.has_mime_type(mime_type))
            .collect()
    }

    pub fn plain_text_parts(&self) -> Vec<&MessagePart> {
        self.parts_with_type(TEXT_PLAIN)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub id: String,
    pub subject: Option<String>,
    pub messages: Vec<Message>,
}

impl Thread {
    /// Messages whose subject differs from the thread subject.
    pub fn messages_with_other_subject(&self) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.subject() != self.subject.as_deref())
            .collect()
    }
}
