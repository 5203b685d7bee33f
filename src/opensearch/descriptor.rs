//! OpenSearch description model and its validation rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::favicon::FaviconError;

/// Maximum length of `LongName`, in characters.
pub const MAX_LONG_NAME: usize = 48;
/// Maximum length of `Description`, in characters.
pub const MAX_DESCRIPTION: usize = 1024;
/// Maximum length of the space-joined `Tags`, in characters.
pub const MAX_TAGS: usize = 256;
/// Maximum length of `Developer`, in characters.
pub const MAX_DEVELOPER: usize = 64;

/// Placeholder the browser substitutes with the search term.
pub const SEARCH_TERMS_PLACEHOLDER: &str = "{searchTerms}";

/// Reasons a descriptor is rejected.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("favicon resolution failed: {0}")]
    Favicon(#[from] FaviconError),

    #[error("short name is empty")]
    EmptyShortName,

    #[error("{field} is {actual} characters, longer than the {max} allowed")]
    TooLong {
        field: &'static str,
        actual: usize,
        max: usize,
    },

    #[error("query URL has no template")]
    MissingTemplate,

    #[error("image has no width")]
    MissingImageWidth,

    #[error("image has no height")]
    MissingImageHeight,
}

/// The `<Url>` element: where the browser sends a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUrl {
    /// URL with a `{searchTerms}` placeholder.
    pub template: String,
    #[serde(default = "default_query_mime")]
    pub mime_type: String,
    #[serde(default = "default_query_method")]
    pub method: String,
}

fn default_query_mime() -> String {
    "text/html".to_string()
}

fn default_query_method() -> String {
    "get".to_string()
}

impl QueryUrl {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            mime_type: default_query_mime(),
            method: default_query_method(),
        }
    }
}

/// The `<Image>` element. `data` is either a plain URL or an embedded data URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    pub data: String,
}

impl Image {
    /// An image of the given size whose contents are filled in later.
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// One search engine as advertised to the browser.
///
/// Only protocol fields live here; behavior switches such as the favicon lookup
/// domain are carried separately in [`super::FaviconOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDescriptor {
    pub short_name: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: QueryUrl,
    #[serde(default)]
    pub image: Image,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub input_encoding: String,
}

impl SearchDescriptor {
    /// Create a descriptor with just the required fields set.
    pub fn new(short_name: impl Into<String>, url: QueryUrl) -> Self {
        Self {
            short_name: short_name.into(),
            long_name: String::new(),
            description: String::new(),
            tags: Vec::new(),
            url,
            image: Image::default(),
            developer: String::new(),
            input_encoding: String::new(),
        }
    }

    /// Name shown to the user: the long name when present.
    pub fn display_name(&self) -> &str {
        if self.long_name.is_empty() {
            &self.short_name
        } else {
            &self.long_name
        }
    }

    /// Tags as they appear in the `<Tags>` element.
    pub fn joined_tags(&self) -> String {
        self.tags.join(" ")
    }

    /// Check the protocol constraints, stopping at the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.short_name.is_empty() {
            return Err(ValidationError::EmptyShortName);
        }

        check_length("long name", &self.long_name, MAX_LONG_NAME)?;
        check_length("description", &self.description, MAX_DESCRIPTION)?;
        check_length("tags", &self.joined_tags(), MAX_TAGS)?;
        check_length("developer", &self.developer, MAX_DEVELOPER)?;

        if self.url.template.is_empty() {
            return Err(ValidationError::MissingTemplate);
        }

        if self.image.width == 0 {
            return Err(ValidationError::MissingImageWidth);
        }
        if self.image.height == 0 {
            return Err(ValidationError::MissingImageHeight);
        }

        Ok(())
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, actual, max });
    }
    Ok(())
}

/// A descriptor paired with the outcome of its favicon resolution.
#[derive(Debug)]
pub struct Candidate {
    pub descriptor: SearchDescriptor,
    pub favicon: Result<(), FaviconError>,
}

impl Candidate {
    /// A candidate that needed no favicon work.
    pub fn ready(descriptor: SearchDescriptor) -> Self {
        Self {
            descriptor,
            favicon: Ok(()),
        }
    }

    /// Validate, reporting a failed favicon resolution before anything else.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Err(e) = &self.favicon {
            return Err(ValidationError::Favicon(e.clone()));
        }
        self.descriptor.validate()
    }

    pub fn into_descriptor(self) -> SearchDescriptor {
        self.descriptor
    }
}
