use anyhow::Result;
use kitemcp::mcp::{register_kite_tools, ToolDefinition, ToolRegistry};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;

#[derive(Tabled)]
struct ToolRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Arguments")]
    arguments: String,
}

#[derive(serde::Serialize)]
struct ToolInfo {
    name: String,
    title: String,
    description: String,
    input_schema: serde_json::Value,
}

/// Definitions of every tool the server registers
pub fn tool_definitions() -> Result<Vec<ToolDefinition>> {
    let mut registry = ToolRegistry::new();
    register_kite_tools(&mut registry)?;
    Ok(registry.definitions())
}

pub fn run_tools_command(format: OutputFormat) -> Result<()> {
    let definitions = tool_definitions()?;
    match format {
        OutputFormat::Table => println!("{}", render_table(&definitions)),
        OutputFormat::Json => println!("{}", render_json(&definitions)?),
    }
    Ok(())
}

fn describe_arguments(definition: &ToolDefinition) -> String {
    let fields = definition.input_schema.fields();
    if fields.is_empty() {
        return "-".to_string();
    }

    fields
        .iter()
        .map(|field| {
            if field.required {
                field.name.to_string()
            } else {
                format!("{}?", field.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_table(definitions: &[ToolDefinition]) -> String {
    let rows: Vec<ToolRow> = definitions
        .iter()
        .map(|definition| ToolRow {
            name: definition.name.to_string(),
            title: definition.title.to_string(),
            arguments: describe_arguments(definition),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.with(Modify::new(Rows::new(1..)).with(Alignment::left()));
    table.to_string()
}

fn render_json(definitions: &[ToolDefinition]) -> Result<String> {
    let infos: Vec<ToolInfo> = definitions
        .iter()
        .map(|definition| ToolInfo {
            name: definition.name.to_string(),
            title: definition.title.to_string(),
            description: definition.description.trim().to_string(),
            input_schema: definition.input_schema.to_json(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&infos)?)
}
