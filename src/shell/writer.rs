//! Line-oriented script buffer
//!
//! [`ScriptWriter`] is the only way phase builders put text into a script. Each
//! method appends exactly one line.

use super::escape::shell_escape;

pub const ANSI_BOLD_GREEN: &str = "\x1b[32;1m";
pub const ANSI_RESET: &str = "\x1b[0;m";

#[derive(Debug, Default)]
pub struct ScriptWriter {
    buffer: String,
}

impl ScriptWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `cmd` followed by `args`, every word escaped.
    pub fn command<S: AsRef<str>>(&mut self, cmd: &str, args: &[S]) {
        self.buffer.push_str(&shell_escape(cmd));
        for arg in args {
            self.buffer.push(' ');
            self.buffer.push_str(&shell_escape(arg.as_ref()));
        }
        self.buffer.push('\n');
    }

    /// Appends `line` verbatim.
    ///
    /// Only for shell keywords and fragments the caller has already escaped.
    pub fn command_format(&mut self, line: &str) {
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    pub fn echo_colored(&mut self, text: &str) {
        self.command("echo", &[format!("{}{}{}", ANSI_BOLD_GREEN, text, ANSI_RESET)]);
    }

    pub fn if_directory(&mut self, path: &str) {
        self.command_format(&format!("if [[ -d {} ]]; then", shell_escape(path)));
    }

    pub fn if_file(&mut self, path: &str) {
        self.command_format(&format!("if [[ -e {} ]]; then", shell_escape(path)));
    }

    pub fn else_branch(&mut self) {
        self.command_format("else");
    }

    pub fn end_if(&mut self) {
        self.command_format("fi");
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}
