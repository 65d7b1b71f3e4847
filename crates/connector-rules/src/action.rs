//! Validation actions and the directive grammar of rule tables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a rule demands of its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationAction {
    /// Field must be present.
    Require,
    /// Field is never checked.
    Ignore,
    /// Field must be absent.
    Disallow,
    /// Field may be absent, or present with the rule's default value.
    AllowDefault,
    /// Field may be absent, or present with one of the listed values.
    AllowValues,
    /// Field may be present with any value. Reserved for future value
    /// constraints; evaluates like [`ValidationAction::Ignore`].
    Allow,
}

impl ValidationAction {
    /// All actions, in declaration order.
    pub const fn all() -> &'static [Self] {
        &[
            Self::Require,
            Self::Ignore,
            Self::Disallow,
            Self::AllowDefault,
            Self::AllowValues,
            Self::Allow,
        ]
    }

    /// Human-readable label, close to the directive text in rule tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Require => "REQUIRE",
            Self::Ignore => "IGNORE",
            Self::Disallow => "DISALLOW",
            Self::AllowDefault => "ALLOW default",
            Self::AllowValues => "ALLOW values",
            Self::Allow => "ALLOW",
        }
    }

    /// Whether a rule with this action can ever produce a violation.
    pub fn is_checked(&self) -> bool {
        !matches!(self, Self::Ignore | Self::Allow)
    }
}

impl fmt::Display for ValidationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const ALLOW_TOKEN: &str = "ALLOW";
const ALLOW_LIST_PREFIX: &str = "ALLOW ";
const DEFAULT_MARKER: &str = "default";

/// A parsed directive cell: the action plus, for `ALLOW a, b` lists, the
/// allowed values in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub action: ValidationAction,
    pub allowed_values: Option<Vec<String>>,
}

type DirectiveMatcher = fn(&str) -> Option<Directive>;

/// Directive grammar, highest priority first. The first matcher that accepts
/// the trimmed cell decides the action; a cell no matcher accepts is not a
/// directive. `ALLOW default ...` must be tried before the value-list form.
const DIRECTIVE_PRECEDENCE: [DirectiveMatcher; 3] =
    [match_exact_token, match_allow_default, match_allow_list];

impl Directive {
    fn bare(action: ValidationAction) -> Self {
        Self {
            action,
            allowed_values: None,
        }
    }

    /// Parse a directive cell. Returns `None` for unrecognized text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        DIRECTIVE_PRECEDENCE
            .iter()
            .find_map(|matcher| matcher(text))
    }
}

fn match_exact_token(text: &str) -> Option<Directive> {
    let action = match text {
        "REQUIRE" => ValidationAction::Require,
        "IGNORE" => ValidationAction::Ignore,
        "DISALLOW" => ValidationAction::Disallow,
        ALLOW_TOKEN => ValidationAction::Allow,
        _ => return None,
    };
    Some(Directive::bare(action))
}

fn match_allow_default(text: &str) -> Option<Directive> {
    let is_default =
        text.starts_with(ALLOW_TOKEN) && text.to_lowercase().contains(DEFAULT_MARKER);
    is_default.then(|| Directive::bare(ValidationAction::AllowDefault))
}

fn match_allow_list(text: &str) -> Option<Directive> {
    let values = text.strip_prefix(ALLOW_LIST_PREFIX)?;
    Some(Directive {
        action: ValidationAction::AllowValues,
        allowed_values: Some(split_value_list(values)),
    })
}

/// Split `a, b and c` into `["a", "b", "c"]`, keeping order and dropping
/// empty entries.
pub fn split_value_list(text: &str) -> Vec<String> {
    text.replace(" and ", ", ")
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action_of(text: &str) -> Option<ValidationAction> {
        Directive::parse(text).map(|directive| directive.action)
    }

    #[test]
    fn exact_tokens_map_directly() {
        assert_eq!(action_of("REQUIRE"), Some(ValidationAction::Require));
        assert_eq!(action_of("IGNORE"), Some(ValidationAction::Ignore));
        assert_eq!(action_of("DISALLOW"), Some(ValidationAction::Disallow));
        assert_eq!(action_of("ALLOW"), Some(ValidationAction::Allow));
        assert_eq!(action_of("  REQUIRE \t"), Some(ValidationAction::Require));
    }

    #[test]
    fn allow_default_wins_over_value_list() {
        let directive = Directive::parse("ALLOW default").expect("directive");
        assert_eq!(directive.action, ValidationAction::AllowDefault);
        assert_eq!(directive.allowed_values, None);

        // Looks like a value list, but the default marker takes priority.
        assert_eq!(
            action_of("ALLOW default and latest"),
            Some(ValidationAction::AllowDefault)
        );
        assert_eq!(
            action_of("ALLOW Default"),
            Some(ValidationAction::AllowDefault)
        );
        assert_eq!(
            action_of("ALLOW only the DEFAULT"),
            Some(ValidationAction::AllowDefault)
        );
    }

    #[test]
    fn allow_value_list_is_split_in_order() {
        let directive = Directive::parse("ALLOW earliest, latest").expect("directive");
        assert_eq!(directive.action, ValidationAction::AllowValues);
        assert_eq!(
            directive.allowed_values,
            Some(vec!["earliest".to_string(), "latest".to_string()])
        );

        let directive = Directive::parse("ALLOW none, all and some").expect("directive");
        assert_eq!(
            directive.allowed_values,
            Some(vec!["none".to_string(), "all".to_string(), "some".to_string()])
        );
    }

    #[test]
    fn value_list_drops_empty_entries() {
        assert_eq!(split_value_list("a,, b ,"), vec!["a", "b"]);
        assert!(split_value_list(" , ").is_empty());
    }

    #[test]
    fn unrecognized_directives_are_rejected() {
        assert_eq!(action_of(""), None);
        assert_eq!(action_of("require"), None);
        assert_eq!(action_of("ALLOWED"), None);
        assert_eq!(action_of("ALLOW_VALUES"), None);
        assert_eq!(action_of("MAYBE"), None);
    }

    #[test]
    fn ignore_and_allow_are_unchecked() {
        assert!(!ValidationAction::Ignore.is_checked());
        assert!(!ValidationAction::Allow.is_checked());
        assert!(ValidationAction::Require.is_checked());
        assert_eq!(ValidationAction::all().len(), 6);
    }
}
