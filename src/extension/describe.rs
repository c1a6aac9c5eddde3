// src/extension/describe.rs

use std::collections::BTreeMap;

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;

use crate::errors::Result;

/// Output format of `describe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DescribeFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Kind of command the extension exposes to Meltano.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Handled by the extension itself.
    Extension,
    /// Passed straight through to the wrapped CLI.
    Invoker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionCommand {
    pub name: String,
    pub description: String,
    pub kind: CommandKind,
}

/// What the extension can do, as reported to Meltano.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Describe {
    pub commands: Vec<ExtensionCommand>,
}

#[derive(Serialize)]
struct DescribeDocument<'a> {
    commands: BTreeMap<&'a str, String>,
}

impl Describe {
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }

    /// Render in `format`.
    ///
    /// Text is a short listing; JSON and YAML map each command to the
    /// `invoke` line Meltano should use for it.
    pub fn formatted(&self, format: DescribeFormat) -> Result<String> {
        let document = DescribeDocument {
            commands: self
                .commands
                .iter()
                .map(|c| (c.name.as_str(), format!("invoke {}", c.name)))
                .collect(),
        };

        let rendered = match format {
            DescribeFormat::Text => format!("commands: {:?}", self.command_names()),
            DescribeFormat::Json => {
                serde_json::to_string_pretty(&document).context("rendering describe as JSON")?
            }
            DescribeFormat::Yaml => {
                serde_yaml::to_string(&document).context("rendering describe as YAML")?
            }
        };
        Ok(rendered)
    }
}
