//! Message bodies: a single part or a multipart container

use lettre::message::{header::ContentType, MultiPart, MultiPartBuilder, SinglePart};

use crate::domain::communication::errors::{EmailError, ValidationError};

/// A single body part
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyPart {
    content: String,
    content_type: Option<String>,
}

impl BodyPart {
    /// A plain text part
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: None,
        }
    }

    /// A part with an explicit MIME type.
    ///
    /// The MIME type is not checked until the part is rendered by the transport.
    pub fn with_content_type(content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: Some(content_type.into()),
        }
    }

    /// The part's content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The MIME type, if one was given
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub(crate) fn to_single_part(&self) -> Result<SinglePart, EmailError> {
        let Some(raw) = &self.content_type else {
            return Ok(SinglePart::plain(self.content.clone()));
        };

        let content_type = ContentType::parse(raw)
            .map_err(|_| ValidationError::InvalidContentType(raw.clone()))?;

        Ok(SinglePart::builder()
            .header(content_type)
            .body(self.content.clone()))
    }
}

/// Multipart subtype
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MultipartKind {
    /// `multipart/mixed`
    #[default]
    Mixed,

    /// `multipart/alternative`
    Alternative,

    /// `multipart/related`
    Related,
}

/// A multipart container
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Multipart {
    kind: MultipartKind,
    parts: Vec<BodyPart>,
}

impl Multipart {
    /// An empty container of the given kind
    pub fn new(kind: MultipartKind) -> Self {
        Self {
            kind,
            parts: Vec::new(),
        }
    }

    /// An empty `multipart/mixed` container
    pub fn mixed() -> Self {
        Self::new(MultipartKind::Mixed)
    }

    /// Append a part, builder style
    pub fn with_body_part(mut self, part: BodyPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Part at `index`
    pub fn body_part(&self, index: usize) -> Option<&BodyPart> {
        self.parts.get(index)
    }

    /// All parts in order
    pub fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    /// The container kind
    pub fn kind(&self) -> MultipartKind {
        self.kind
    }

    pub(crate) fn to_multi_part(&self) -> Result<MultiPart, EmailError> {
        let mut parts = self.parts.iter();
        let first = parts.next().ok_or(ValidationError::EmptyMultipart)?;

        let builder: MultiPartBuilder = match self.kind {
            MultipartKind::Mixed => MultiPart::mixed(),
            MultipartKind::Alternative => MultiPart::alternative(),
            MultipartKind::Related => MultiPart::related(),
        };

        let mut multipart = builder.singlepart(first.to_single_part()?);
        for part in parts {
            multipart = multipart.singlepart(part.to_single_part()?);
        }

        Ok(multipart)
    }
}

/// A message body
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    /// A single part
    Part(BodyPart),

    /// A multipart container
    Multipart(Multipart),
}

impl From<BodyPart> for Content {
    fn from(part: BodyPart) -> Self {
        Content::Part(part)
    }
}

impl From<Multipart> for Content {
    fn from(multipart: Multipart) -> Self {
        Content::Multipart(multipart)
    }
}
