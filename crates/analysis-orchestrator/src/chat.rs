//! Chat assistant session with an id that persists across runs.

use analysis_core::{AnalysisResult, MarketDataSource};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SESSION_FILE: &str = "session_id";

/// `session_<unix millis>_<9 lowercase alphanumerics>`
pub fn generate_session_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("session_{}_{}", millis, suffix)
}

pub fn is_valid_session_id(id: &str) -> bool {
    let Some(rest) = id.strip_prefix("session_") else {
        return false;
    };
    let Some((millis, suffix)) = rest.split_once('_') else {
        return false;
    };
    !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == 9
        && suffix.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}

/// File holding the chat session id.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/finanalyse/session_id`
    pub fn default_location() -> AnalysisResult<Self> {
        Self::under_data_dir(dirs::data_dir())
    }

    fn under_data_dir(base: Option<PathBuf>) -> AnalysisResult<Self> {
        let base = base.ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "cannot determine the user data directory")
        })?;
        Ok(Self::new(base.join("finanalyse").join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored id, or a fresh one written to disk. A corrupt file is replaced.
    pub fn load_or_create(&self) -> AnalysisResult<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim();
                if is_valid_session_id(id) {
                    return Ok(id.to_string());
                }
                tracing::warn!("Replacing malformed session id in {}", self.path.display());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let id = generate_session_id();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, &id)?;
        tracing::debug!("Created chat session {}", id);
        Ok(id)
    }
}

pub struct ChatSession {
    source: Arc<dyn MarketDataSource>,
    session_id: String,
}

impl ChatSession {
    pub fn new(source: Arc<dyn MarketDataSource>, session_id: impl Into<String>) -> Self {
        Self {
            source,
            session_id: session_id.into(),
        }
    }

    pub fn open(source: Arc<dyn MarketDataSource>, store: &SessionStore) -> AnalysisResult<Self> {
        Ok(Self::new(source, store.load_or_create()?))
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Sends a message and returns the assistant's reply. Blank messages are
    /// not sent and yield `None`.
    pub async fn send(&self, message: &str) -> AnalysisResult<Option<String>> {
        let message = message.trim();
        if message.is_empty() {
            return Ok(None);
        }
        let reply = self.source.chat(&self.session_id, message).await?;
        Ok(Some(reply.response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSource;
    use analysis_core::AnalysisError;

    #[test]
    fn test_generated_id_format() {
        let id = generate_session_id();
        assert!(is_valid_session_id(&id), "bad id: {}", id);
        assert_ne!(id, generate_session_id());
    }

    #[test]
    fn test_id_validation() {
        assert!(is_valid_session_id("session_1717400000000_abc123xyz"));
        assert!(!is_valid_session_id("session_1717400000000_ABC123XYZ"));
        assert!(!is_valid_session_id("session_1717400000000_abc"));
        assert!(!is_valid_session_id("session__abc123xyz"));
        assert!(!is_valid_session_id("abc123xyz"));
    }

    #[test]
    fn test_store_persists_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join(SESSION_FILE));

        let first = store.load_or_create().unwrap();
        let second = store.load_or_create().unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), first);
    }

    #[test]
    fn test_missing_data_dir_is_io_error() {
        let err = SessionStore::under_data_dir(None).unwrap_err();
        assert!(matches!(&err, AnalysisError::Io(e) if e.kind() == io::ErrorKind::NotFound));

        let store = SessionStore::under_data_dir(Some(PathBuf::from("/data"))).unwrap();
        assert!(store.path().ends_with("finanalyse/session_id"));
    }

    #[test]
    fn test_store_replaces_corrupt_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        fs::write(&path, "garbage").unwrap();

        let id = SessionStore::new(&path).load_or_create().unwrap();
        assert!(is_valid_session_id(&id));
    }

    #[tokio::test]
    async fn test_blank_message_not_sent() {
        let source = Arc::new(FakeSource::default());
        let chat = ChatSession::new(source.clone(), "session_1_abcdefghi");

        assert_eq!(chat.send("  \n").await.unwrap(), None);
        assert_eq!(source.call_count(), 0);

        let reply = chat.send(" Is AAPL cheap? ").await.unwrap();
        assert_eq!(reply.as_deref(), Some("echo: Is AAPL cheap?"));

        let sent = source.chat_requests.lock().unwrap();
        assert_eq!(sent[0].session_id, "session_1_abcdefghi");
        assert_eq!(sent[0].message, "Is AAPL cheap?");
    }
}
