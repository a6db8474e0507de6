//! The signed-in user the listing is created for.
//!
//! Resolved once at startup and handed to the form explicitly: command-line / environment
//! values win, otherwise the saved session file is used.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// `<config dir>/create-listing/session.json`
pub fn default_session_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("create-listing")
        .join("session.json")
}

pub fn load_session(path: &Path) -> Result<Option<CurrentUser>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read session file {}", path.display()))?;
    let user: CurrentUser = serde_json::from_str(&data)
        .with_context(|| format!("parse session file {}", path.display()))?;
    Ok(Some(user))
}

pub fn save_session(path: &Path, user: &CurrentUser) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let data = serde_json::to_string_pretty(user)?;
    std::fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Pick the current user from explicit values or the session file.
pub fn resolve_user(
    user_id: Option<&str>,
    access_token: Option<&str>,
    session_path: &Path,
) -> Result<CurrentUser> {
    let saved = load_session(session_path)?;
    let user = match (user_id.filter(|s| !s.trim().is_empty()), saved) {
        (Some(id), saved) => CurrentUser {
            id: id.trim().to_string(),
            access_token: access_token
                .map(str::to_string)
                .or_else(|| saved.and_then(|s| s.access_token)),
        },
        (None, Some(mut saved)) => {
            if let Some(token) = access_token {
                saved.access_token = Some(token.to_string());
            }
            saved
        }
        (None, None) => {
            return Err(anyhow::anyhow!(
                "no signed-in user: pass --user-id or sign in to create a session file ({})",
                session_path.display()
            ))
        }
    };
    tracing::debug!(user = %user.id, "resolved current user");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("create-listing-{}-{name}", std::process::id()))
            .join("session.json")
    }

    #[test]
    fn flag_wins_over_session_file() {
        let path = temp_path("flag");
        save_session(
            &path,
            &CurrentUser {
                id: "saved".into(),
                access_token: Some("tok".into()),
            },
        )
        .unwrap();

        let user = resolve_user(Some("cli"), None, &path).unwrap();
        assert_eq!(user.id, "cli");
        assert_eq!(user.access_token.as_deref(), Some("tok"));

        let user = resolve_user(None, Some("fresh"), &path).unwrap();
        assert_eq!(user.id, "saved");
        assert_eq!(user.access_token.as_deref(), Some("fresh"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_user_is_an_error() {
        let path = temp_path("none");
        let err = resolve_user(None, None, &path).unwrap_err();
        assert!(err.to_string().starts_with("no signed-in user"));
    }

    #[test]
    fn corrupt_session_file_reports_path() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        let err = load_session(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parse session file"));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
