use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::download::Notice;

/// Desktop services the viewer relies on.
///
/// Everything except the clipboard has a working default, so most hosts
/// only implement [`ViewerHost::set_clipboard`] or use [`DesktopHost`].
pub trait ViewerHost {
    fn fetch(&mut self, url: &str) -> Result<Box<dyn Read + Send>> {
        let response = ureq::get(url)
            .set("User-Agent", "Chatter-Viewer/1.0")
            .call()
            .context("Failed to download media")?;
        let reader: Box<dyn Read + Send> = response.into_reader();
        Ok(reader)
    }

    fn create_file(&mut self, path: &Path) -> Result<Box<dyn Write>> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Box::new(file))
    }

    /// Asks where to save a download. `None` means the user cancelled.
    fn choose_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Save")
            .set_file_name(suggested_name)
            .save_file()
    }

    fn set_clipboard(&mut self, text: &str) -> Result<()>;

    fn open_uri(&mut self, uri: &str) -> Result<()> {
        open_with_system(uri)
    }

    fn notify(&mut self, notice: Notice) {
        notice.enqueue();
    }
}

/// Hands `uri` to the platform's default handler.
pub fn open_with_system(uri: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    let status = Command::new("open").arg(uri).status();

    #[cfg(target_os = "windows")]
    let status = Command::new("cmd").args(["/C", "start", "", uri]).status();

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let status = Command::new("xdg-open").arg(uri).status();

    let status = status.context("Failed to launch the URI handler")?;
    if !status.success() {
        bail!("URI handler exited with {}", status);
    }
    Ok(())
}

/// Host backed by the system clipboard, file dialogs and network.
#[derive(Default)]
pub struct DesktopHost {
    clipboard: Option<arboard::Clipboard>,
}

impl DesktopHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewerHost for DesktopHost {
    fn set_clipboard(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().context("Failed to access the clipboard")?,
        };
        self.clipboard
            .insert(clipboard)
            .set_text(text)
            .context("Failed to copy to the clipboard")
    }
}
