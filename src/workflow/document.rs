//! Typed GitHub Actions workflow document and its writer.
//!
//! Templates assemble a [`Workflow`] from steps and parameters instead of
//! interpolating strings, and the writer decides how each value is emitted.
//! Values from callers (site names, branches, image names) go through
//! [`Scalar`], which keeps ordinary identifiers as they are and quotes
//! anything that would otherwise change the structure of the document.
//!
//! Layout produced by the writer:
//!
//! ```text
//! # <comment>
//!
//! name: <name>
//!
//! on:
//!   push:
//!     branches:
//!       - <branch>
//!
//! jobs:
//!   <job-id>:
//!     runs-on: <runner>
//!
//!     steps:
//!     - name: <step>
//!       uses: <action>
//!       with:
//!         <key>: <value>
//! ```
//!
//! Steps are separated by a blank line and the document has no trailing
//! newline.

use std::fmt;

const STEP_FIRST_LINE: &str = "    - ";
const STEP_CONTINUATION: &str = "      ";

/// Words YAML 1.1 readers turn into booleans or null when left unquoted
const RESERVED_WORDS: &[&str] = &[
    "true", "false", "yes", "no", "y", "n", "on", "off", "null", "~",
];

const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
    '`',
];

/// A value in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// Emitted bare unless that would be ambiguous YAML, then quoted
    Plain(String),
    /// Always emitted quoted
    Quoted(String),
    /// Literal block (`|`), one entry per line
    Block(Vec<String>),
}

impl Scalar {
    pub fn plain(value: impl Into<String>) -> Self {
        Scalar::Plain(value.into())
    }

    pub fn quoted(value: impl Into<String>) -> Self {
        Scalar::Quoted(value.into())
    }

    pub fn block<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scalar::Block(lines.into_iter().map(Into::into).collect())
    }

    /// Reference to a repository secret, e.g. `${{ secrets.NAME }}`
    pub fn secret(name: &str) -> Self {
        Scalar::Plain(secret_ref(name))
    }

    /// Single-line rendering. Blocks used inline are collapsed into a quoted
    /// scalar with explicit line breaks.
    pub fn inline(&self) -> String {
        match self {
            Scalar::Plain(value) if !needs_quoting(value) => value.clone(),
            Scalar::Plain(value) | Scalar::Quoted(value) => quote(value),
            Scalar::Block(lines) => quote(&lines.join("\n")),
        }
    }
}

pub fn secret_ref(name: &str) -> String {
    format!("${{{{ secrets.{} }}}}", name)
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.starts_with(INDICATORS)
        || value.ends_with(':')
        || value.contains(": ")
        || value.contains(" #")
        || value.chars().any(char::is_control)
        || RESERVED_WORDS.contains(&value.to_ascii_lowercase().as_str())
        || value.parse::<f64>().is_ok()
        || is_yaml_number(value)
}

/// Numeric forms YAML readers accept beyond what `f64` parses: radix
/// prefixes, `_` digit separators, sexagesimal `1:30` and `.inf`/`.nan`.
fn is_yaml_number(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    let unsigned = lower
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(&lower);

    if matches!(unsigned, ".inf" | ".nan") {
        return true;
    }

    let digits_in = |digits: &str, radix: u32| {
        digits.chars().any(|c| c.is_digit(radix))
            && digits.chars().all(|c| c == '_' || c.is_digit(radix))
    };

    if let Some(digits) = unsigned.strip_prefix("0x") {
        return digits_in(digits, 16);
    }
    if let Some(digits) = unsigned.strip_prefix("0o") {
        return digits_in(digits, 8);
    }
    if let Some(digits) = unsigned.strip_prefix("0b") {
        return digits_in(digits, 2);
    }
    if unsigned.contains(':') {
        return unsigned.split(':').all(|part| digits_in(part, 10));
    }

    unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && unsigned.contains(|c: char| c.is_ascii_digit())
        && unsigned.replace('_', "").parse::<f64>().is_ok()
}

fn quote(value: &str) -> String {
    if value.chars().any(char::is_control) {
        return double_quote(value);
    }
    format!("'{}'", value.replace('\'', "''"))
}

fn double_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Appends `key: value` at `indent`, expanding block scalars onto the
/// following lines.
fn push_entry(lines: &mut Vec<String>, indent: &str, key: &str, value: &Scalar) {
    match value {
        Scalar::Block(block) => {
            lines.push(format!("{}{}: |", indent, key));
            for line in block.iter().flat_map(|l| l.split('\n')) {
                let line = line.trim_end_matches('\r');
                if line.is_empty() {
                    lines.push(String::new());
                } else {
                    lines.push(format!("{}  {}", indent, line));
                }
            }
        }
        _ => lines.push(format!("{}{}: {}", indent, key, value.inline())),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    pub name: Option<Scalar>,
    pub uses: Option<String>,
    pub with: Vec<(String, Scalar)>,
    pub run: Option<Scalar>,
}

impl Step {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(Scalar::plain(name)),
            ..Default::default()
        }
    }

    pub fn named_quoted(name: impl Into<String>) -> Self {
        Self {
            name: Some(Scalar::quoted(name)),
            ..Default::default()
        }
    }

    /// Unnamed step running a single action
    pub fn action(action: impl Into<String>) -> Self {
        Self {
            uses: Some(action.into()),
            ..Default::default()
        }
    }

    /// Unnamed step running a shell script
    pub fn script(run: Scalar) -> Self {
        Self {
            run: Some(run),
            ..Default::default()
        }
    }

    pub fn uses(mut self, action: impl Into<String>) -> Self {
        self.uses = Some(action.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: Scalar) -> Self {
        self.with.push((key.into(), value));
        self
    }

    pub fn run(mut self, run: Scalar) -> Self {
        self.run = Some(run);
        self
    }

    pub fn param(&self, key: &str) -> Option<&Scalar> {
        self.with.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn write_lines(&self, out: &mut Vec<String>) {
        let mut body = Vec::new();
        if let Some(name) = &self.name {
            push_entry(&mut body, "", "name", name);
        }
        if let Some(uses) = &self.uses {
            push_entry(&mut body, "", "uses", &Scalar::plain(uses.as_str()));
        }
        if !self.with.is_empty() {
            body.push("with:".to_string());
            for (key, value) in &self.with {
                push_entry(&mut body, "  ", key, value);
            }
        }
        if let Some(run) = &self.run {
            push_entry(&mut body, "", "run", run);
        }

        for (i, line) in body.into_iter().enumerate() {
            if line.is_empty() {
                out.push(line);
            } else if i == 0 {
                out.push(format!("{}{}", STEP_FIRST_LINE, line));
            } else {
                out.push(format!("{}{}", STEP_CONTINUATION, line));
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub runs_on: Scalar,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    /// Comment lines placed above the document, without the `# ` marker
    pub comments: Vec<String>,
    pub name: Scalar,
    /// Branches whose pushes trigger the workflow
    pub push_branches: Vec<Scalar>,
    pub jobs: Vec<Job>,
}

impl Workflow {
    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();

        for comment in &self.comments {
            out.push(format!("# {}", comment));
        }
        if !self.comments.is_empty() {
            out.push(String::new());
        }

        push_entry(&mut out, "", "name", &self.name);
        out.push(String::new());

        out.push("on:".to_string());
        out.push("  push:".to_string());
        out.push("    branches:".to_string());
        for branch in &self.push_branches {
            out.push(format!("      - {}", branch.inline()));
        }
        out.push(String::new());

        out.push("jobs:".to_string());
        for (i, job) in self.jobs.iter().enumerate() {
            if i > 0 {
                out.push(String::new());
            }
            out.push(format!("  {}:", job.id));
            push_entry(&mut out, "    ", "runs-on", &job.runs_on);
            out.push(String::new());
            out.push("    steps:".to_string());
            for (j, step) in job.steps.iter().enumerate() {
                if j > 0 {
                    out.push(String::new());
                }
                step.write_lines(&mut out);
            }
        }

        out
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}
