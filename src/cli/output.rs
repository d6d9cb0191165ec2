//! Output formatting for generated scripts and dialect listings
//!
//! `Script` prints only the script text so the output can be piped into the
//! interpreter. The other formats describe the whole [`ShellScript`].

use anyhow::{Context, Result};
use serde::Serialize;

use crate::shell::{FeaturesInfo, Shell, ShellScript};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raw script text
    Script,
    Json,
    Yaml,
    /// Invocation, environment and script as readable text
    Human,
}

/// Serializable summary of a registered dialect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellInfo {
    pub name: String,
    pub features: FeaturesInfo,
    pub supported_options: Vec<String>,
    pub is_default: bool,
}

impl ShellInfo {
    pub fn from_shell(shell: &dyn Shell) -> Self {
        Self {
            name: shell.name().to_string(),
            features: shell.features(),
            supported_options: shell
                .supported_options()
                .iter()
                .map(|o| o.to_string())
                .collect(),
            is_default: shell.is_default(),
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_script(&self, script: &ShellScript) -> Result<String> {
        match self.format {
            OutputFormat::Script => Ok(script.script.clone()),
            OutputFormat::Json => {
                serde_json::to_string_pretty(script).context("Failed to serialize script to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(script).context("Failed to serialize script to YAML")
            }
            OutputFormat::Human => Ok(self.format_script_human(script)),
        }
    }

    fn format_script_human(&self, script: &ShellScript) -> String {
        let mut output = String::new();

        output.push_str("Command:\n");
        output.push_str(&format!("  {}", script.command));
        for argument in &script.arguments {
            output.push(' ');
            output.push_str(argument);
        }
        output.push_str("\n\n");

        output.push_str(&format!("Environment ({}):\n", script.environment.len()));
        for variable in &script.environment {
            output.push_str(&format!("  {}\n", variable));
        }
        output.push('\n');

        output.push_str("Script:\n");
        output.push_str(&script.script);

        output
    }

    pub fn format_shells(&self, shells: &[ShellInfo]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(shells).context("Failed to serialize shells to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(shells).context("Failed to serialize shells to YAML")
            }
            OutputFormat::Script | OutputFormat::Human => {
                let mut output = String::new();
                for shell in shells {
                    output.push_str(&shell.name);
                    if shell.is_default {
                        output.push_str(" (default)");
                    }
                    output.push('\n');
                    output.push_str(&format!("  artifacts: {}\n", shell.features.artifacts));
                    if !shell.supported_options.is_empty() {
                        output.push_str(&format!(
                            "  options: {}\n",
                            shell.supported_options.join(", ")
                        ));
                    }
                }
                Ok(output)
            }
        }
    }
}
