/// Output format enumeration for SBOM documents
///
/// This enum represents the supported SPDX syntaxes. It belongs in the
/// application layer as both the CLI and the formatters need to understand it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// SPDX tag-value (default)
    #[default]
    TagValue,
    /// SPDX JSON
    Json,
}

impl OutputFormat {
    /// Conventional file extension for documents in this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::TagValue => "spdx",
            OutputFormat::Json => "spdx.json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tag-value" | "tagvalue" | "tv" | "spdx" => Ok(OutputFormat::TagValue),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'tag-value' or 'json'",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::TagValue => write!(f, "tag-value"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
