//! Configuration for a single unit of work.
//!
//! A [`WorkUnit`] is a fully-configured, not-yet-started command. The
//! launcher takes ownership of each unit and decides when to spawn it;
//! nothing runs until admission.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

/// A not-yet-started worker command.
///
/// # Example
///
/// ```rust,no_run
/// use poolrun::WorkUnit;
///
/// let unit = WorkUnit::new("convert")
///     .arg("in.png")
///     .arg("out.jpg")
///     .working_dir("/data")
///     .label("convert-1");
/// ```
#[derive(Debug, Clone)]
pub struct WorkUnit {
    /// The program to execute.
    pub program: String,

    /// Arguments to pass to the program.
    pub args: Vec<String>,

    /// Working directory for the process.
    pub working_dir: Option<PathBuf>,

    /// Environment variables to set (merged with the current env).
    pub env: HashMap<String, String>,

    /// Discard the child's stdout/stderr instead of inheriting.
    pub silent: bool,

    label: Option<String>,
}

impl WorkUnit {
    /// Create a new unit for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: HashMap::new(),
            silent: false,
            label: None,
        }
    }

    /// Create a unit that runs a command line through `sh -c`.
    pub fn shell(command_line: impl Into<String>) -> Self {
        let command_line = command_line.into();
        Self::new("sh")
            .arg("-c")
            .arg(command_line.clone())
            .label(command_line)
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Discard the child's stdout and stderr.
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    /// Set the label used in logs and error reports.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label used to identify this unit, defaulting to the program name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.program)
    }

    /// Build the command to spawn. stdin is always null; workers get no
    /// input and produce no collected output.
    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());
        if self.silent {
            cmd.stdout(Stdio::null());
            cmd.stderr(Stdio::null());
        }

        cmd
    }
}
