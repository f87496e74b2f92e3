use crate::adapters::outbound::formatters::{SpdxJsonFormatter, TagValueFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::SbomFormatter;

/// Factory for creating SBOM formatters
///
/// This factory encapsulates the creation logic for different formatter implementations,
/// following the Factory Pattern. It belongs in the application layer as it orchestrates
/// the selection of infrastructure adapters based on application needs.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use spdx_sbom::application::dto::OutputFormat;
    /// use spdx_sbom::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Json);
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn SbomFormatter> {
        match format {
            OutputFormat::TagValue => Box::new(TagValueFormatter::new()),
            OutputFormat::Json => Box::new(SpdxJsonFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    ///
    /// # Examples
    /// ```
    /// use spdx_sbom::application::dto::OutputFormat;
    /// use spdx_sbom::application::factories::FormatterFactory;
    ///
    /// let message = FormatterFactory::progress_message(OutputFormat::Json);
    /// assert_eq!(message, "📝 Generating SPDX JSON output...");
    /// ```
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::TagValue => "📝 Generating SPDX tag-value output...",
            OutputFormat::Json => "📝 Generating SPDX JSON output...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::read_models::SpdxReadModelBuilder;
    use crate::sbom_generation::domain::{Document, Package};

    fn model() -> crate::application::read_models::SpdxReadModel {
        let mut document = Document::new("demo", "https://example.com/demo");
        document.add_package(Package::new("app")).unwrap();
        SpdxReadModelBuilder::build(&document)
    }

    #[test]
    fn test_create_tag_value_formatter() {
        let output = FormatterFactory::create(OutputFormat::TagValue)
            .format(&model())
            .unwrap();
        assert!(output.starts_with("SPDXVersion: SPDX-2.2"));
    }

    #[test]
    fn test_create_json_formatter() {
        let output = FormatterFactory::create(OutputFormat::Json)
            .format(&model())
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["spdxVersion"], "SPDX-2.2");
    }

    #[test]
    fn test_progress_messages() {
        assert_eq!(
            FormatterFactory::progress_message(OutputFormat::TagValue),
            "📝 Generating SPDX tag-value output..."
        );
        assert_eq!(
            FormatterFactory::progress_message(OutputFormat::Json),
            "📝 Generating SPDX JSON output..."
        );
    }
}
