use std::io::{self, Write};
use std::path::Path;

use chatter_toast::ToastKind;

use crate::host::ViewerHost;

/// How saving a remote file ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved { bytes: u64 },
    FetchFailed,
    CreateFailed,
    WriteFailed,
}

impl DownloadOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    /// The single notification shown for this outcome.
    pub fn notice(&self) -> Notice {
        match self {
            Self::Saved { .. } => Notice::new(ToastKind::Success, "Picture saved successfully"),
            Self::FetchFailed => Notice::new(
                ToastKind::Error,
                "An error occured while downloading picture data",
            ),
            Self::CreateFailed => Notice::new(
                ToastKind::Error,
                "An I/O error occurred while creating the output file",
            ),
            Self::WriteFailed => Notice::new(
                ToastKind::Error,
                "An I/O error occurred while saving the file",
            ),
        }
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: ToastKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Queues the notice on the global toast queue.
    pub fn enqueue(self) {
        match self.kind {
            ToastKind::Info => chatter_toast::info(self.message),
            ToastKind::Success => chatter_toast::success(self.message),
            ToastKind::Warning => chatter_toast::warning(self.message),
            ToastKind::Error => chatter_toast::error(self.message),
        }
    }
}

/// Fetches `url` and streams the body into a new file at `path`.
///
/// The request is made before the file is created, so a failed fetch leaves
/// nothing behind. Failures are logged here and reported through the
/// returned outcome. Blocks on the network and the disk; hosts with an event
/// loop should call it from a background task.
pub fn save_to_path<H>(host: &mut H, url: &str, path: &Path) -> DownloadOutcome
where
    H: ViewerHost + ?Sized,
{
    let mut body = match host.fetch(url) {
        Ok(body) => body,
        Err(err) => {
            log::warn!("An error occured while downloading picture data: {:#}", err);
            return DownloadOutcome::FetchFailed;
        }
    };

    let mut out = match host.create_file(path) {
        Ok(out) => out,
        Err(err) => {
            log::warn!(
                "An I/O error occurred while creating the output file: {:#}",
                err
            );
            return DownloadOutcome::CreateFailed;
        }
    };

    let copied = io::copy(&mut body, &mut out).and_then(|bytes| out.flush().map(|()| bytes));
    match copied {
        Ok(bytes) => {
            log::debug!("viewer: saved {} bytes to {}", bytes, path.display());
            DownloadOutcome::Saved { bytes }
        }
        Err(err) => {
            log::warn!("An I/O error occurred while saving the file: {}", err);
            DownloadOutcome::WriteFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::tests::FakeHost;

    #[test]
    fn saves_body_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        let mut host = FakeHost::serving(b"png bytes");

        let outcome = save_to_path(&mut host, "https://cdn.example.com/cat.png", &path);

        assert_eq!(outcome, DownloadOutcome::Saved { bytes: 9 });
        assert_eq!(std::fs::read(&path).unwrap(), b"png bytes");
        assert_eq!(host.fetched, vec!["https://cdn.example.com/cat.png"]);
    }

    #[test]
    fn fetch_failure_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        let mut host = FakeHost::offline();

        let outcome = save_to_path(&mut host, "https://cdn.example.com/cat.png", &path);

        assert_eq!(outcome, DownloadOutcome::FetchFailed);
        assert!(!path.exists());
    }

    #[test]
    fn missing_directory_fails_creation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cat.png");
        let mut host = FakeHost::serving(b"data");

        let outcome = save_to_path(&mut host, "https://cdn.example.com/cat.png", &path);
        assert_eq!(outcome, DownloadOutcome::CreateFailed);
    }

    #[test]
    fn broken_stream_fails_the_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        let mut host = FakeHost::serving(b"data");
        host.broken_stream = true;

        let outcome = save_to_path(&mut host, "https://cdn.example.com/cat.png", &path);
        assert_eq!(outcome, DownloadOutcome::WriteFailed);
    }

    #[test]
    fn each_outcome_has_its_own_message() {
        let outcomes = [
            DownloadOutcome::Saved { bytes: 1 },
            DownloadOutcome::FetchFailed,
            DownloadOutcome::CreateFailed,
            DownloadOutcome::WriteFailed,
        ];
        let mut messages: Vec<String> = outcomes.iter().map(|o| o.notice().message).collect();
        messages.dedup();
        assert_eq!(messages.len(), 4);
        assert_eq!(outcomes[0].notice().kind, ToastKind::Success);
        assert!(outcomes[1..].iter().all(|o| o.notice().kind == ToastKind::Error));
    }

    #[test]
    fn enqueued_notice_keeps_its_kind() {
        Notice::new(ToastKind::Warning, "viewer notice for the queue").enqueue();
        DownloadOutcome::WriteFailed.notice().enqueue();

        let queued = chatter_toast::drain_pending();
        let warning = queued
            .iter()
            .find(|request| request.message == "viewer notice for the queue")
            .unwrap();
        assert_eq!(warning.kind, ToastKind::Warning);
        assert_eq!(warning.duration, chatter_toast::DEFAULT_TOAST_DURATION);
        assert!(queued.iter().any(|request| {
            request.kind == ToastKind::Error
                && request.message == "An I/O error occurred while saving the file"
        }));
    }
}
