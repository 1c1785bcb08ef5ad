use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A lease template reference held in the `pdfTemplates` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseTemplate {
    pub name: String,
    pub url: String,
}

/// Opaque reference to a filled document produced by a fill backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledDocument {
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FillError {
    #[error("lease template '{0}' has no source url")]
    MissingTemplateUrl(String),
    #[error("fill backend unavailable: {0}")]
    Unavailable(String),
}

/// Document filling seam. A production backend merges the field values into
/// the template form and returns a reference to the flattened output.
pub trait DocumentFill: Send + Sync {
    fn fill(
        &self,
        template: &LeaseTemplate,
        fields: &BTreeMap<String, String>,
    ) -> Result<FilledDocument, FillError>;
}

/// Fill backend that performs no merge: the template itself is returned as
/// the filled document, so the sent lease's filled URL equals the original
/// template URL until the renter uploads a signed copy.
pub struct PassthroughFill;

impl DocumentFill for PassthroughFill {
    fn fill(
        &self,
        template: &LeaseTemplate,
        _fields: &BTreeMap<String, String>,
    ) -> Result<FilledDocument, FillError> {
        if template.url.trim().is_empty() {
            return Err(FillError::MissingTemplateUrl(template.name.clone()));
        }
        Ok(FilledDocument {
            url: template.url.clone(),
        })
    }
}
