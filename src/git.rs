//! Repository and branch name for the notification title.

use std::path::Path;
use std::process::Command;

use crate::variables::path_basename;

const FALLBACK_BRANCH: &str = "main";

/// Repository and branch the session ran in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    pub repo: String,
    pub branch: String,
}

/// Resolve repo and branch for `cwd`.
///
/// `HOOK_GIT_REPO`/`HOOK_GIT_BRANCH` win when both are set. Otherwise git is
/// asked; outside a repository the directory name and `main` are used.
pub fn git_info(cwd: &Path) -> GitInfo {
    if let Some(info) = git_info_from_env() {
        return info;
    }

    match (repo_name(cwd), branch_name(cwd)) {
        (Some(repo), Some(branch)) => GitInfo { repo, branch },
        _ => GitInfo {
            repo: path_basename(&cwd.to_string_lossy()),
            branch: FALLBACK_BRANCH.to_string(),
        },
    }
}

fn git_info_from_env() -> Option<GitInfo> {
    let repo = std::env::var("HOOK_GIT_REPO").ok().filter(|s| !s.is_empty())?;
    let branch = std::env::var("HOOK_GIT_BRANCH").ok().filter(|s| !s.is_empty())?;
    Some(GitInfo { repo, branch })
}

fn repo_name(cwd: &Path) -> Option<String> {
    let toplevel = run_git(cwd, &["rev-parse", "--show-toplevel"])?;
    Some(repo_name_from_toplevel(&toplevel))
}

fn branch_name(cwd: &Path) -> Option<String> {
    run_git(cwd, &["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Final path segment with any `.git` removed.
fn repo_name_from_toplevel(toplevel: &str) -> String {
    path_basename(toplevel).replace(".git", "")
}

fn run_git(cwd: &Path, args: &[&str]) -> Option<String> {
    let output = match Command::new("git").args(args).current_dir(cwd).output() {
        Ok(o) => o,
        Err(e) => {
            tracing::debug!("Failed to run git {:?}: {}", args, e);
            return None;
        }
    };

    if !output.status.success() {
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
