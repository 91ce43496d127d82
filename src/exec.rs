//! Narrow interface to external tools.
//!
//! Every shell-out goes through [`ToolCommand`]: command plus args in,
//! captured stdout out. A missing binary and a non-zero exit are both plain
//! errors carrying the tool name and its stderr, so callers handle failure
//! uniformly. There is no timeout; a hung child blocks its caller.

use anyhow::{anyhow, bail, Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

/// An external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The equivalent shell line, for logging.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run the tool and capture stdout as UTF-8.
    pub fn run(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    anyhow!("{} not found on PATH; is it installed?", self.program)
                }
                _ => anyhow!("Cannot run {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }
        String::from_utf8(output.stdout)
            .with_context(|| format!("{} produced non-UTF-8 output", self.program))
    }
}

/// blastn invocation for a spacer search: short-task nucleotide BLAST with
/// the tabular field list the downstream coordinate unit needs.
pub fn blastn_spacers(
    query_fasta: &Path,
    subject_db: &Path,
    evalue: f64,
    fields: &[&str],
) -> ToolCommand {
    ToolCommand::new("blastn")
        .args(["-task", "blastn-short"])
        .arg("-query")
        .arg(query_fasta.to_string_lossy())
        .arg("-db")
        .arg(subject_db.to_string_lossy())
        .arg("-evalue")
        .arg(evalue.to_string())
        .arg("-outfmt")
        .arg(format!("7 {}", fields.join(" ")))
}

/// blastdbcmd invocation fetching a plus-strand range of one subject entry.
pub fn blastdbcmd_range(db: &Path, entry: &str, start: usize, end: usize) -> ToolCommand {
    ToolCommand::new("blastdbcmd")
        .arg("-db")
        .arg(db.to_string_lossy())
        .args(["-entry", entry])
        .args(["-range", &format!("{}-{}", start, end)])
        .args(["-strand", "plus"])
        .args(["-outfmt", "%s"])
}

/// Parse the single-sequence `%s` output of blastdbcmd.
pub fn parse_blastdbcmd_seq(stdout: &str) -> Result<String> {
    let seq: String = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('>'))
        .collect();
    if seq.is_empty() {
        bail!("blastdbcmd returned no sequence");
    }
    Ok(seq)
}
