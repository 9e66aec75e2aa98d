//! CLI logic for the Flowsketch layout tool.
//!
//! Reads a flowchart file, parses it, lays it out and writes the positioned
//! graph as pretty-printed JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use flowsketch::{
    DiagramBuilder, FlowsketchError,
    config::{AppConfig, ParserConfig},
};
use flowsketch_core::{Graph, LayoutResult};
use flowsketch_parser::Diagnostic;

use error_adapter::diagnostics_to_reportables;

/// Run the Flowsketch CLI application
///
/// This function processes the input file through parsing and layout and
/// writes the resulting [`LayoutResult`] as JSON to the output file.
///
/// # Errors
///
/// Returns `FlowsketchError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Reading the `--pins` file or writing JSON
pub async fn run(args: &Args) -> Result<(), FlowsketchError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.strict {
        app_config = AppConfig::new(ParserConfig::new(true), app_config.layout().clone());
    }

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let parsed = builder.parse(&source)?;
    report_warnings(parsed.warnings(), &source);

    let mut graph = parsed.into_graph();
    if let Some(path) = &args.pins {
        let previous = load_pinned_graph(path)?;
        graph = graph.with_pins_from(&previous);
    }

    let result = builder.layout(&graph).await;

    let json = serde_json::to_string_pretty(&result)
        .map_err(|err| FlowsketchError::Serialize(err.to_string()))?;
    fs::write(&args.output, json)?;

    info!(output_file = args.output; "Layout exported successfully");

    Ok(())
}

/// Reads a previous JSON output to carry its pins over.
fn load_pinned_graph(path: &str) -> Result<Graph, FlowsketchError> {
    info!(path; "Loading pinned nodes");
    let content = fs::read_to_string(path)?;
    let previous: LayoutResult = serde_json::from_str(&content)
        .map_err(|err| FlowsketchError::Serialize(format!("{path}: {err}")))?;
    Ok(previous.into_graph())
}

fn report_warnings(warnings: &[Diagnostic], source: &str) {
    let reporter = miette::GraphicalReportHandler::new();
    for reportable in diagnostics_to_reportables(warnings, source) {
        let mut writer = String::new();
        match reporter.render_report(&mut writer, &reportable) {
            Ok(()) => warn!("{writer}"),
            Err(_) => warn!("{reportable}"),
        }
    }
}
