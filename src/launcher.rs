use std::io;

/// Hands a finished download's URL to whatever retrieves it.
pub trait DownloadLauncher: Send + Sync {
    fn launch(&self, target_url: &str) -> io::Result<()>;
}

/// Opens the URL in the user's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl DownloadLauncher for SystemLauncher {
    fn launch(&self, target_url: &str) -> io::Result<()> {
        let target_url = target_url.trim();
        if target_url.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty download URL"));
        }
        tracing::info!(%target_url, "opening download");
        // Waits for the platform opener to exit and reports its status.
        open::that(target_url)
    }
}
