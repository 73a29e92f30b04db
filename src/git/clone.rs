use crate::error::{CharFreqError, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Bare-clone `url` into `dest` with the `git` executable.
///
/// With a commit limit the clone is shallow, one commit deeper than the limit so the
/// oldest walked commit still has its parent to diff against.
pub fn clone_repository(url: &str, dest: &Path, commit_limit: Option<usize>, quiet: bool) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.env("GIT_TERMINAL_PROMPT", "0")
        .args(["clone", "--bare", "--no-tags"]);
    if let Some(limit) = commit_limit {
        cmd.arg("--depth").arg(limit.saturating_add(1).to_string());
    }
    if quiet {
        cmd.arg("--quiet").stdout(Stdio::null()).stderr(Stdio::null());
    }
    cmd.arg("--").arg(url).arg(dest);

    debug!(%url, dest = %dest.display(), "cloning");
    let status = cmd.status().map_err(|e| CharFreqError::Clone {
        url: url.to_string(),
        reason: format!("cannot run git: {e}"),
    })?;

    if !status.success() {
        return Err(CharFreqError::Clone {
            url: url.to_string(),
            reason: format!("git exited with {status}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn huge_commit_limit_fails_cleanly() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-such-repo");
        let url = format!("file://{}", missing.display());
        let result = clone_repository(&url, &dir.path().join("dest.git"), Some(usize::MAX), true);
        assert!(matches!(result, Err(CharFreqError::Clone { .. })));
    }
}
