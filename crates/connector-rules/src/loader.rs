//! CSV loader for rule tables.
//!
//! A rule table has a header row naming its columns; columns are located by
//! name, so their order is free and unknown columns are ignored:
//!
//! | column                       | meaning                                   |
//! |------------------------------|-------------------------------------------|
//! | `name`                       | field name (rows without one are skipped) |
//! | `what_do_do` / `what to do`  | directive, see [`Directive::parse`]       |
//! | `default`                    | default value for `ALLOW default`         |
//! | `valid_values`               | free text, documentation only             |
//! | `subsection`                 | documentation only                        |
//! | `definition`                 | documentation only                        |
//! | `importance`                 | documentation only                        |

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::trace;

use crate::action::Directive;
use crate::error::RulesError;
use crate::rule::{RuleMeta, ValidationRule};

/// Accepted spellings of the directive column, in lookup order.
const DIRECTIVE_COLUMNS: [&str; 2] = ["what_do_do", "what to do"];

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct RuleColumns {
    name: Option<usize>,
    directive: Vec<usize>,
    default: Option<usize>,
    valid_values: Option<usize>,
    subsection: Option<usize>,
    definition: Option<usize>,
    importance: Option<usize>,
}

impl RuleColumns {
    fn from_headers(headers: &StringRecord) -> Self {
        let position = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim_matches('\u{feff}').trim() == name)
        };
        Self {
            name: position("name"),
            directive: DIRECTIVE_COLUMNS
                .iter()
                .filter_map(|column| position(column))
                .collect(),
            default: position("default"),
            valid_values: position("valid_values"),
            subsection: position("subsection"),
            definition: position("definition"),
            importance: position("importance"),
        }
    }
}

/// Trimmed cell text, `None` when the column is absent or the cell is blank.
fn cell(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

fn parse_row(columns: &RuleColumns, record: &StringRecord) -> Option<ValidationRule> {
    if record.iter().all(|value| value.trim().is_empty()) {
        return None;
    }
    let name = cell(record, columns.name)?;
    let directive_text = columns
        .directive
        .iter()
        .find_map(|&index| cell(record, Some(index)))?;
    let Some(directive) = Directive::parse(&directive_text) else {
        trace!(field = %name, directive = %directive_text, "skipping unrecognized directive");
        return None;
    };

    let meta = RuleMeta {
        subsection: cell(record, columns.subsection),
        definition: cell(record, columns.definition),
        importance: cell(record, columns.importance),
        valid_values: cell(record, columns.valid_values),
    };
    let default_value = cell(record, columns.default);
    Some(ValidationRule::from_directive(name, directive, default_value).with_meta(meta))
}

/// Parse a rule table from any reader, returning rules in row order.
///
/// Rows without a name, with an unrecognized directive, or with every cell
/// blank are skipped. Duplicate names are returned as-is; the store decides
/// which one wins.
pub fn parse_rule_table<R: Read>(reader: R) -> Result<Vec<ValidationRule>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let columns = RuleColumns::from_headers(&headers);

    let mut rules = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(rule) = parse_row(&columns, &record) {
            rules.push(rule);
        }
    }
    Ok(rules)
}

/// Read and parse a rule table from disk.
pub fn read_rule_file(path: &Path) -> Result<Vec<ValidationRule>, RulesError> {
    if !path.exists() {
        return Err(RulesError::MissingSource {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| RulesError::io(path, e))?;
    parse_rule_table(file).map_err(|e| RulesError::csv(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ValidationAction;

    fn parse(text: &str) -> Vec<ValidationRule> {
        parse_rule_table(text.as_bytes()).expect("parse rule table")
    }

    #[test]
    fn reads_columns_by_name() {
        let rules = parse(
            "importance,default,name,what_do_do,subsection,definition,valid_values,extra\n\
             high,,topics,REQUIRE,Kafka,Topics to read,,ignored\n\
             low,latest,mode,ALLOW default,Kafka,Offset mode,\"earliest, latest\",\n",
        );
        assert_eq!(rules.len(), 2);

        let topics = &rules[0];
        assert_eq!(topics.name, "topics");
        assert_eq!(topics.action, ValidationAction::Require);
        assert_eq!(topics.meta.subsection.as_deref(), Some("Kafka"));
        assert_eq!(topics.meta.importance.as_deref(), Some("high"));
        assert_eq!(topics.default_value, None);

        let mode = &rules[1];
        assert_eq!(mode.action, ValidationAction::AllowDefault);
        assert_eq!(mode.default_value.as_deref(), Some("latest"));
        assert_eq!(mode.meta.valid_values.as_deref(), Some("earliest, latest"));
    }

    #[test]
    fn accepts_spaced_directive_header() {
        let rules = parse("name,what to do\nfield1,DISALLOW\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].action, ValidationAction::Disallow);
    }

    #[test]
    fn first_non_blank_directive_column_wins() {
        let rules = parse(
            "name,what_do_do,what to do\n\
             a,,REQUIRE\n\
             b,IGNORE,REQUIRE\n",
        );
        assert_eq!(rules[0].action, ValidationAction::Require);
        assert_eq!(rules[1].action, ValidationAction::Ignore);
    }

    #[test]
    fn skips_blank_and_unrecognized_rows() {
        let rules = parse(
            "name,what_do_do,default\n\
             ,,\n\
             \"   \",REQUIRE,\n\
             no_directive,,\n\
             odd,MAYBE,\n\
             kept,IGNORE,\n",
        );
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "kept");
    }

    #[test]
    fn strips_byte_order_mark_from_header() {
        let rules = parse("\u{feff}name,what_do_do\nfield,REQUIRE\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "field");
    }

    #[test]
    fn blank_default_is_absent() {
        let rules = parse("name,what_do_do,default\nmode,ALLOW default,\"  \"\n");
        assert_eq!(rules[0].action, ValidationAction::AllowDefault);
        assert_eq!(rules[0].default_value, None);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let rules = parse("name,what_do_do,default,definition\nfield,REQUIRE\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].meta.definition, None);
    }

    #[test]
    fn missing_file_is_reported_as_missing_source() {
        let err = read_rule_file(Path::new("/nonexistent/rules.csv")).unwrap_err();
        assert!(matches!(err, RulesError::MissingSource { .. }));
    }
}
