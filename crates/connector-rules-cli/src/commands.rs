use anyhow::{Context, Result};
use tracing::{info, info_span};

use connector_rules::{ConnectorType, load_connector_rules, rules_root};
use connector_rules_cli::batch::{BatchReport, BatchValidator, collect_config_files};

use crate::cli::{ReportFormatArg, RulesArgs, ValidateArgs};
use crate::summary::{print_report, print_rules};

pub fn run_validate(args: &ValidateArgs) -> Result<BatchReport> {
    let rules_dir = args.rules_dir.clone().unwrap_or_else(rules_root);
    let connector_type = args.connector_type.map(ConnectorType::from);
    let span = info_span!("validate", rules_dir = %rules_dir.display());
    let _guard = span.enter();

    let files = collect_config_files(&args.paths).context("collect configuration files")?;
    if files.is_empty() {
        info!("no .json files found");
    }

    let mut validator = BatchValidator::new(rules_dir, connector_type);
    let report = validator.validate_files(&files)?;
    match args.format {
        ReportFormatArg::Table => print_report(&report),
        ReportFormatArg::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialize report")?;
            println!("{json}");
        }
    }
    Ok(report)
}

pub fn run_rules(args: &RulesArgs) -> Result<()> {
    let rules_dir = args.rules_dir.clone().unwrap_or_else(rules_root);
    let connector_type = ConnectorType::from(args.connector_type);
    let store = load_connector_rules(&rules_dir, connector_type)
        .with_context(|| format!("load {connector_type} rules"))?;
    print_rules(connector_type, &store);
    Ok(())
}
