use std::sync::Arc;

use crate::entity::Entity;
use crate::protocol::{HttpError, HttpHeader, HttpMessage, MessageBuilder};

const CONTENT_DISPOSITION: &str = "Content-Disposition";
const CONTENT_TYPE: &str = "Content-Type";
const CONTENT_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";

/// number of headers [`PartBuilder::build`] puts in front of the caller's
const SYNTHESIZED_HEADERS: usize = 3;

/// A named part of a multipart body.
///
/// A part always starts with three headers computed from its entity, in this
/// order:
///
/// 1. `Content-Disposition: form-data; name="<name>"`, plus
///    `; filename="<filename>"` when the entity has a non-empty filename
/// 2. `Content-Type`, the entity's media type
/// 3. `Content-Transfer-Encoding`, the entity's transfer encoding or `7bit`
///
/// Headers added on the builder follow them.
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    headers: Vec<HttpHeader>,
    entity: Arc<Entity>,
}

impl Part {
    pub fn builder() -> PartBuilder {
        PartBuilder::default()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn part_entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    /// Reopens the part. The synthesized headers are left out, `build`
    /// computes them again.
    pub fn new_builder(&self) -> PartBuilder {
        PartBuilder {
            name: Some(self.name.clone()),
            headers: self.headers[SYNTHESIZED_HEADERS..].to_vec(),
            entity: Some(Arc::clone(&self.entity)),
        }
    }
}

impl HttpMessage for Part {
    fn headers(&self) -> &[HttpHeader] {
        &self.headers
    }

    fn entity(&self) -> Option<&Arc<Entity>> {
        Some(&self.entity)
    }
}

#[derive(Debug, Default)]
pub struct PartBuilder {
    name: Option<String>,
    headers: Vec<HttpHeader>,
    entity: Option<Arc<Entity>>,
}

impl PartBuilder {
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// # Errors
    ///
    /// [`HttpError::InvalidMessage`] if the name or the entity is missing.
    pub fn build(self) -> Result<Part, HttpError> {
        let name = self.name.ok_or_else(|| HttpError::invalid_message("part name is required"))?;
        let entity = self.entity.ok_or_else(|| HttpError::invalid_message(format!("part {name} has no entity")))?;

        let mut headers = Vec::with_capacity(SYNTHESIZED_HEADERS + self.headers.len());
        headers.push(HttpHeader::new(CONTENT_DISPOSITION, content_disposition(&name, entity.filename())));
        headers.push(HttpHeader::new(CONTENT_TYPE, entity.content_type().to_string()));
        headers.push(HttpHeader::new(
            CONTENT_TRANSFER_ENCODING,
            entity.transfer_encoding().unwrap_or_default().as_str(),
        ));
        headers.extend(self.headers);

        Ok(Part { name, headers, entity })
    }
}

impl MessageBuilder for PartBuilder {
    fn headers_mut(&mut self) -> &mut Vec<HttpHeader> {
        &mut self.headers
    }

    fn entity_mut(&mut self) -> &mut Option<Arc<Entity>> {
        &mut self.entity
    }
}

fn content_disposition(name: &str, filename: Option<&str>) -> String {
    match filename {
        Some(filename) if !filename.is_empty() => format!("form-data; name=\"{name}\"; filename=\"{filename}\""),
        _ => format!("form-data; name=\"{name}\""),
    }
}
