//! Commands that act on the window manager itself rather than on the layout.

use std::borrow::Cow;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WmCmd {
    Exec(ExecCmd),
    Quit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExecCmd {
    String(String),
    Array(Vec<String>),
}

impl ExecCmd {
    pub fn as_array(&self) -> Cow<'_, [String]> {
        match self {
            ExecCmd::Array(vec) => Cow::Borrowed(&*vec),
            ExecCmd::String(s) => parse_command(s).into(),
        }
    }
}

/// Starts `cmd_args` in its own process group and returns immediately.
/// Children are reaped by the kernel (see `sys::process`).
pub fn exec_cmd(cmd_args: &ExecCmd) {
    let cmd_args = cmd_args.as_array();
    let [cmd, args @ ..] = &*cmd_args else {
        error!("Empty argument list passed to exec");
        return;
    };
    let spawned = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .process_group(0)
        .spawn();
    match spawned {
        Ok(child) => debug!(pid = child.id(), "Spawned {cmd:?} {args:?}"),
        Err(e) => error!("Failed to execute command {cmd:?}: {e:?}"),
    }
}

/// Execute startup commands from configuration
pub fn execute_startup_commands(commands: &[String]) {
    if commands.is_empty() {
        return;
    }

    trace!("Executing {} startup commands", commands.len());

    for (i, command) in commands.iter().enumerate() {
        trace!("Executing startup command {}: {}", i + 1, command);
        if parse_command(command).is_empty() {
            error!("Empty startup command at index {}", i);
            continue;
        }
        exec_cmd(&ExecCmd::String(command.clone()));
    }
}

/// Splits a command line on whitespace, keeping quoted sections together.
pub fn parse_command(command: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current_part = String::new();
    let mut quote: Option<char> = None;
    let mut chars = command.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' | '"' if quote.is_none() => quote = Some(ch),
            c if Some(c) == quote => quote = None,
            ' ' | '\t' if quote.is_none() => {
                if !current_part.is_empty() {
                    parts.push(std::mem::take(&mut current_part));
                }
            }
            '\\' if quote.is_some() => match chars.next() {
                Some('n') => current_part.push('\n'),
                Some('t') => current_part.push('\t'),
                Some(next @ ('\\' | '\'' | '"')) => current_part.push(next),
                Some(next) => {
                    current_part.push('\\');
                    current_part.push(next);
                }
                None => current_part.push('\\'),
            },
            _ => current_part.push(ch),
        }
    }

    if !current_part.is_empty() {
        parts.push(current_part);
    }

    parts
}
