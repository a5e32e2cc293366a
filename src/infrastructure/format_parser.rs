// Feed document parsing (YAML or JSON)
use crate::application::series_feed::{ParseError, SeriesParser};
use crate::domain::telemetry::RawSeriesDoc;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatParser {
    #[default]
    Yaml,
    Json,
}

impl SeriesParser for FormatParser {
    fn parse_series(&self, text: &str) -> Result<RawSeriesDoc, ParseError> {
        match self {
            FormatParser::Yaml => Ok(serde_yaml::from_str(text)?),
            FormatParser::Json => Ok(serde_json::from_str(text)?),
        }
    }
}
