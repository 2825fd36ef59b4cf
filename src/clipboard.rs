/*!
 * Clipboard output for generated documents
 *
 * Pipes text into whichever clipboard command the host provides.
 */

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{debug, warn};

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// A clipboard command could not be run or reported failure
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No clipboard command is available
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Something text can be copied into
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Clipboard commands known to work, in no particular order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    Tmux,
    Wayland,
    Xsel,
    Xclip,
    MacOS,
    Windows,
    Termux,
}

impl ClipboardProvider {
    /// Program and arguments that read the clipboard text from stdin
    pub fn command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
            Self::Wayland => ("wl-copy", &[]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::MacOS => ("pbcopy", &[]),
            Self::Windows => ("clip.exe", &[]),
            Self::Termux => ("termux-clipboard-set", &[]),
        }
    }

    /// Providers worth trying on this host, most preferred first
    pub fn detect() -> Vec<ClipboardProvider> {
        let mut candidates = Vec::new();

        if env::var_os("TMUX").is_some() {
            candidates.push(Self::Tmux);
        }

        if cfg!(target_os = "macos") {
            candidates.push(Self::MacOS);
        } else if cfg!(target_os = "windows") || env::var_os("WSL_DISTRO_NAME").is_some() {
            candidates.push(Self::Windows);
        } else if cfg!(target_os = "android") {
            candidates.push(Self::Termux);
        } else {
            if env::var_os("WAYLAND_DISPLAY").is_some() {
                candidates.push(Self::Wayland);
            }
            candidates.extend([Self::Xsel, Self::Xclip]);
        }

        candidates
            .into_iter()
            .filter(|provider| command_exists(provider.command().0))
            .collect()
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.command();
        pipe_to_command(cmd, args, text)
    }
}

/// Copy text using the first clipboard provider that succeeds
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let providers = ClipboardProvider::detect();
    debug!("Clipboard candidates: {:?}", providers);

    for provider in providers {
        match provider.copy_to_clipboard(text) {
            Ok(()) => return Ok(()),
            Err(e) => warn!("Clipboard provider {:?} failed: {}", provider, e),
        }
    }

    Err(ClipboardError::NoClipboardFound)
}

/// Check whether a program is on the PATH
pub fn command_exists(command: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| {
            env::split_paths(&paths).any(|dir| dir.join(command).is_file())
        })
        .unwrap_or(false)
}

fn pipe_to_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)))?;

    // Dropping stdin closes the pipe so the command sees EOF
    {
        let mut stdin = child.stdin.take().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| ClipboardError::CommandFailed(format!("Failed to write to {}: {}", cmd, e)))?;
    }

    let status = child
        .wait()
        .map_err(|e| ClipboardError::CommandFailed(format!("Failed to wait for {}: {}", cmd, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}
