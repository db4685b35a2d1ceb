//! Override rules: forcing a build action for matching files.
//!
//! Rules are tried in the order they were declared and the first match
//! wins. There is no specificity ranking, so a broad rule declared early
//! shadows a narrower one declared later.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::Result;
use crate::pattern::Pattern;

/// What a matching override asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideAction {
    /// Copy the file verbatim; no importer or processor.
    Copy,
    /// Build with explicit names and/or parameters. Missing names fall back
    /// to the extension-based importer and its default processor.
    Build {
        importer: Option<String>,
        processor: Option<String>,
        params: Vec<(String, String)>,
    },
    /// The configured value could not be understood. Matching files are
    /// skipped rather than built with defaults.
    Invalid { reason: String },
}

/// A compiled override.
#[derive(Debug, Clone)]
pub struct OverrideRule {
    pattern: Pattern,
    action: OverrideAction,
}

impl OverrideRule {
    /// Compile one `overrides` entry.
    pub fn from_config(expression: &str, value: &Value) -> Result<Self> {
        Ok(Self {
            pattern: Pattern::compile(expression)?,
            action: parse_action(value),
        })
    }

    pub fn expression(&self) -> &str {
        self.pattern.expression()
    }

    pub fn action(&self) -> &OverrideAction {
        &self.action
    }

    pub fn matches(&self, path: &str) -> bool {
        self.pattern.matches(path)
    }
}

/// First-match lookup over the configured rules.
#[derive(Debug, Clone, Default)]
pub struct OverrideResolver {
    rules: Vec<OverrideRule>,
}

impl OverrideResolver {
    /// Compile every rule of a config `overrides` table, keeping order.
    pub fn from_config(overrides: &Map<String, Value>) -> Result<Self> {
        let rules = overrides
            .iter()
            .map(|(expression, value)| OverrideRule::from_config(expression, value))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// The first rule matching `path`, if any.
    pub fn resolve(&self, path: &str) -> Option<&OverrideRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct OverrideSpec {
    #[serde(default)]
    importer: Option<String>,
    #[serde(default)]
    processor: Option<String>,
    #[serde(default)]
    processor_params: Map<String, Value>,
    #[serde(default)]
    copy: bool,
}

fn parse_action(value: &Value) -> OverrideAction {
    match value {
        Value::String(s) if s.eq_ignore_ascii_case("copy") => OverrideAction::Copy,
        Value::String(s) => OverrideAction::Invalid {
            reason: format!(
                "bare string override \"{s}\" is not supported, use {{\"importer\": \"{s}\"}} or \"copy\""
            ),
        },
        Value::Object(_) => match OverrideSpec::deserialize(value) {
            Ok(spec) => spec_to_action(spec),
            Err(e) => OverrideAction::Invalid {
                reason: e.to_string(),
            },
        },
        Value::Array(_) => OverrideAction::Invalid {
            reason: "array overrides are not supported, use {\"importer\": .., \"processor\": ..}"
                .to_string(),
        },
        other => OverrideAction::Invalid {
            reason: format!("unsupported override value {other}"),
        },
    }
}

fn spec_to_action(spec: OverrideSpec) -> OverrideAction {
    if spec.copy {
        return OverrideAction::Copy;
    }

    let mut params = Vec::with_capacity(spec.processor_params.len());
    for (key, value) in spec.processor_params {
        let value = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            other => {
                return OverrideAction::Invalid {
                    reason: format!("processor parameter {key} has unsupported value {other}"),
                };
            }
        };
        params.push((key, value));
    }

    OverrideAction::Build {
        importer: spec.importer.filter(|s| !s.is_empty()),
        processor: spec.processor.filter(|s| !s.is_empty()),
        params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn resolver(value: Value) -> OverrideResolver {
        match value {
            Value::Object(map) => OverrideResolver::from_config(&map).unwrap(),
            _ => panic!("test overrides must be an object"),
        }
    }

    #[test]
    fn test_copy_shorthand() {
        let resolver = resolver(json!({"*.fnt": "copy"}));
        let rule = resolver.resolve("fonts/a.fnt").unwrap();
        assert_eq!(rule.action(), &OverrideAction::Copy);
    }

    #[test]
    fn test_copy_shorthand_any_case() {
        let resolver = resolver(json!({"*.fnt": "Copy"}));
        assert_eq!(resolver.resolve("a.fnt").unwrap().action(), &OverrideAction::Copy);
    }

    #[test]
    fn test_copy_flag_wins_over_names() {
        let resolver = resolver(json!({"*.txt": {"importer": "X", "copy": true}}));
        assert_eq!(resolver.resolve("a.txt").unwrap().action(), &OverrideAction::Copy);
    }

    #[test]
    fn test_structured_override_keeps_param_order() {
        let resolver = resolver(json!({
            "ui/*.png": {
                "processor": "TextureProcessor",
                "processorParams": {"Zeta": "1", "Alpha": false, "Scale": 0.5}
            }
        }));
        let rule = resolver.resolve("ui/button.png").unwrap();
        assert_eq!(
            rule.action(),
            &OverrideAction::Build {
                importer: None,
                processor: Some("TextureProcessor".into()),
                params: vec![
                    ("Zeta".into(), "1".into()),
                    ("Alpha".into(), "False".into()),
                    ("Scale".into(), "0.5".into()),
                ],
            }
        );
    }

    #[test]
    fn test_empty_names_are_treated_as_absent() {
        let resolver = resolver(json!({"*.png": {"importer": "", "processor": ""}}));
        assert_eq!(
            resolver.resolve("a.png").unwrap().action(),
            &OverrideAction::Build {
                importer: None,
                processor: None,
                params: vec![],
            }
        );
    }

    #[test]
    fn test_first_declared_match_wins() {
        let resolver = resolver(json!({
            "*.png": {"processor": "First"},
            "textures/*.png": {"processor": "Second"}
        }));
        let rule = resolver.resolve("textures/hero.png").unwrap();
        assert_eq!(rule.expression(), "*.png");
    }

    #[test]
    fn test_no_match_is_none() {
        let resolver = resolver(json!({"*.png": "copy"}));
        assert!(resolver.resolve("sounds/a.wav").is_none());
    }

    #[test]
    fn test_unsupported_shapes_are_invalid() {
        let resolver = resolver(json!({
            "a.*": "TextureImporter",
            "b.*": ["TextureImporter", "TextureProcessor"],
            "c.*": 3,
            "d.*": {"importer": "X", "unknown": 1},
            "e.*": {"processorParams": {"Nested": {"x": 1}}}
        }));
        for path in ["a.x", "b.x", "c.x", "d.x", "e.x"] {
            let rule = resolver.resolve(path).unwrap();
            assert!(
                matches!(rule.action(), OverrideAction::Invalid { .. }),
                "{path} should be invalid, got {:?}",
                rule.action()
            );
        }
    }
}
