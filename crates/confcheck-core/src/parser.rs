//! # Parser Capabilities
//!
//! Parsing is modelled as an injected capability. Callers build a
//! [`ParserRegistry`] once at startup and hand it to the validators, which
//! resolve the parsers they need when they are constructed.
//!
//! JSON is always available. YAML is compiled in behind the default `yaml`
//! cargo feature; a build without it still runs every JSON check and reports
//! [`CheckError::Configuration`] for anything that needs YAML.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::document::DocumentFormat;
use crate::error::CheckError;

/// Parses the text of one config file into the shared tree model.
pub trait DocumentParser: Send + Sync {
    /// Format this parser handles.
    fn format(&self) -> DocumentFormat;

    /// Parse `source` into a tree, or return the parser's error message.
    fn parse(&self, source: &str) -> Result<Value, String>;
}

/// JSON parser backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl DocumentParser for JsonParser {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Json
    }

    fn parse(&self, source: &str) -> Result<Value, String> {
        serde_json::from_str(source).map_err(|e| e.to_string())
    }
}

/// YAML parser backed by `serde_yaml`.
///
/// Accepts a single YAML document. An empty file parses as `null`. Aliases
/// are expanded and `<<` merge keys are applied. Repeated keys in one
/// mapping are rejected.
#[cfg(feature = "yaml")]
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

#[cfg(feature = "yaml")]
impl DocumentParser for YamlParser {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Yaml
    }

    fn parse(&self, source: &str) -> Result<Value, String> {
        let mut yaml: serde_yaml::Value = serde_yaml::from_str(source).map_err(|e| e.to_string())?;
        yaml.apply_merge().map_err(|e| e.to_string())?;
        yaml_to_json_value(&yaml)
    }
}

/// The set of parsers available to a check run.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: BTreeMap<DocumentFormat, Box<dyn DocumentParser>>,
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

impl ParserRegistry {
    /// A registry with no parsers at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding every parser compiled into this build.
    pub fn with_defaults() -> Self {
        let registry = Self::empty().with_parser(JsonParser);
        #[cfg(feature = "yaml")]
        let registry = registry.with_parser(YamlParser);
        registry
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_parser(mut self, parser: impl DocumentParser + 'static) -> Self {
        self.register(parser);
        self
    }

    /// Register a parser, replacing any existing parser for the same format.
    pub fn register(&mut self, parser: impl DocumentParser + 'static) {
        let format = parser.format();
        if self.parsers.insert(format, Box::new(parser)).is_some() {
            tracing::debug!(%format, "replaced registered parser");
        }
    }

    /// Parser for `format`, if registered.
    pub fn get(&self, format: DocumentFormat) -> Option<&dyn DocumentParser> {
        self.parsers.get(&format).map(|p| p.as_ref())
    }

    /// Parser for `format`, or a configuration error naming the gap.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Configuration`] when no parser is registered.
    pub fn require(&self, format: DocumentFormat) -> Result<&dyn DocumentParser, CheckError> {
        self.get(format).ok_or_else(|| {
            let hint = match format {
                DocumentFormat::Yaml => " (build confcheck with the `yaml` feature)",
                DocumentFormat::Json => "",
            };
            CheckError::Configuration(format!("no {format} parser available{hint}"))
        })
    }

    /// Whether a parser for `format` is registered.
    pub fn supports(&self, format: DocumentFormat) -> bool {
        self.parsers.contains_key(&format)
    }

    /// Registered formats, in a stable order.
    pub fn formats(&self) -> Vec<DocumentFormat> {
        self.parsers.keys().copied().collect()
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// YAML has a richer type system than JSON. Tags are dropped (the inner value
/// is kept), scalar map keys are stringified, and floats that JSON cannot
/// represent (NaN, infinities) are rejected.
#[cfg(feature = "yaml")]
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in the document model"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
