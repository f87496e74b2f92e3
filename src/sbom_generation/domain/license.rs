/// No license is present in the element
pub const NONE: &str = "NONE";

/// The license was not evaluated
pub const NOASSERTION: &str = "NOASSERTION";

/// Data license every document is published under
pub const DATA_LICENSE: &str = "CC0-1.0";

/// License value object, as loaded from the license corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct License {
    id: String,
    name: Option<String>,
    text: Option<String>,
    url: Option<String>,
}

impl License {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            text: None,
            url: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// True for the NONE / NOASSERTION sentinels
    pub fn is_sentinel(id: &str) -> bool {
        id == NONE || id == NOASSERTION
    }
}
