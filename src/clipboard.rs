use std::sync::Mutex;

/// Destination of the "copy" action of a tool session.
///
/// Writes are fire-and-forget: the session assumes success and never waits
/// on, nor reports, the outcome.
pub trait Clipboard {
    fn write_text(&self, text: &str);
}

/// Clipboard backed by the platform command (`pbcopy`, `xclip`/`xsel`,
/// `clip.exe`). Failures are only visible in the debug log.
#[cfg(feature = "clipboard")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) {
        if let Err(e) = system::copy_to_clipboard(text) {
            crate::debug!("Clipboard write failed: {}", e);
        }
    }
}

#[cfg(feature = "clipboard")]
mod system {
    use std::io::Write;
    use std::process::{Command, Stdio};

    use crate::error::{Error, Result};

    /// Pipes the text into a clipboard command and waits for it to exit
    pub(super) fn pipe_to(mut command: Command, name: &str, text: &str) -> Result<()> {
        let mut child = command.stdin(Stdio::piped()).spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        if child.wait()?.success() {
            Ok(())
        } else {
            Err(Error::Msg(format!("{} exited with error", name)))
        }
    }

    #[cfg(target_os = "macos")]
    pub fn copy_to_clipboard(text: &str) -> Result<()> {
        pipe_to(Command::new("pbcopy"), "pbcopy", text)
    }

    #[cfg(target_os = "linux")]
    pub fn copy_to_clipboard(text: &str) -> Result<()> {
        let mut xclip = Command::new("xclip");
        xclip.args(["-selection", "clipboard"]);
        match pipe_to(xclip, "xclip", text) {
            Ok(()) => Ok(()),
            Err(_) => {
                let mut xsel = Command::new("xsel");
                xsel.args(["--clipboard", "--input"]);
                pipe_to(xsel, "xsel", text)
            }
        }
    }

    #[cfg(target_os = "windows")]
    pub fn copy_to_clipboard(text: &str) -> Result<()> {
        pipe_to(Command::new("clip"), "clip", text)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    pub fn copy_to_clipboard(_text: &str) -> Result<()> {
        Err(Error::Msg(
            "Clipboard not supported on this platform".to_string(),
        ))
    }
}

/// In-process clipboard keeping every written text, for hosts without a
/// system clipboard and for tests
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    entries: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text written, if any
    pub fn contents(&self) -> Option<String> {
        self.entries.lock().ok().and_then(|e| e.last().cloned())
    }

    pub fn writes(&self) -> usize {
        self.entries.lock().map_or(0, |e| e.len())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(text.to_string());
        }
    }
}
