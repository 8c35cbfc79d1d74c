//! In-process [`VersionControl`] fake.
//!
//! The "remote URL" is a plain local directory. The fake keeps a stack of
//! committed trees per mirror so that `reset_and_clean` can restore what was
//! last committed, and `push` copies the mirror back onto the upstream
//! directory.
//!
//! Like git, `reset_and_clean` only rewrites files whose content differs
//! from the last commit, and rewritten files get the current time.
//!
//! Any step can be made to fail with [`FakeTransport::fail_at`]. A failing
//! `Clone` leaves a half-created destination directory behind, like an
//! interrupted real clone.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use mkshare_git::{CommitMode, GitError, VersionControl};

use crate::fixtures::copy_tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Clone,
    Checkout,
    Refresh,
    Stage,
    Commit,
    Push,
    DiscardCommit,
    Reset,
}

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Clone { url: String, dest: PathBuf },
    Checkout { repo: PathBuf, branch: String },
    Refresh { repo: PathBuf, branch: String },
    Stage { repo: PathBuf, paths: Vec<PathBuf> },
    Commit { repo: PathBuf, mode: CommitMode },
    Push { repo: PathBuf, branch: String },
    DiscardCommit { repo: PathBuf },
    Reset { repo: PathBuf, subdir: PathBuf },
}

impl Call {
    pub fn step(&self) -> Step {
        match self {
            Call::Clone { .. } => Step::Clone,
            Call::Checkout { .. } => Step::Checkout,
            Call::Refresh { .. } => Step::Refresh,
            Call::Stage { .. } => Step::Stage,
            Call::Commit { .. } => Step::Commit,
            Call::Push { .. } => Step::Push,
            Call::DiscardCommit { .. } => Step::DiscardCommit,
            Call::Reset { .. } => Step::Reset,
        }
    }
}

type Tree = BTreeMap<PathBuf, Vec<u8>>;

#[derive(Debug, Default)]
pub struct FakeTransport {
    calls: RefCell<Vec<Call>>,
    failing: RefCell<BTreeSet<Step>>,
    origins: RefCell<HashMap<PathBuf, PathBuf>>,
    commits: RefCell<HashMap<PathBuf, Vec<Tree>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future call of `step` fail.
    pub fn fail_at(&self, step: Step) {
        self.failing.borrow_mut().insert(step);
    }

    pub fn clear_failures(&self) {
        self.failing.borrow_mut().clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.calls.borrow().iter().map(Call::step).collect()
    }

    fn enter(&self, call: Call, dir: &Path) -> Result<(), GitError> {
        let step = call.step();
        self.calls.borrow_mut().push(call);
        if self.failing.borrow().contains(&step) {
            return Err(GitError::Failed {
                command: format!("fake {step:?}"),
                dir: dir.to_path_buf(),
                status: "exit status: 1".into(),
            });
        }
        Ok(())
    }

    fn record_commit(&self, repo: &Path) -> Result<(), GitError> {
        let tree = snapshot(repo).map_err(|e| io(repo, e))?;
        self.commits
            .borrow_mut()
            .entry(repo.to_path_buf())
            .or_default()
            .push(tree);
        Ok(())
    }

    fn head(&self, repo: &Path) -> Tree {
        self.commits
            .borrow()
            .get(repo)
            .and_then(|history| history.last().cloned())
            .unwrap_or_default()
    }
}

fn io(dir: &Path, source: std::io::Error) -> GitError {
    GitError::Spawn {
        command: format!("fake io in {}", dir.display()),
        source,
    }
}

fn snapshot(root: &Path) -> std::io::Result<Tree> {
    let mut tree = Tree::new();
    walk(root, root, &mut tree)?;
    Ok(tree)
}

fn walk(root: &Path, dir: &Path, tree: &mut Tree) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(root, &path, tree)?;
        } else {
            let rel = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            tree.insert(rel, fs::read(&path)?);
        }
    }
    Ok(())
}

impl VersionControl for FakeTransport {
    fn clone_repo(&self, url: &str, dest: &Path, _branch: &str) -> Result<(), GitError> {
        let call = Call::Clone {
            url: url.to_owned(),
            dest: dest.to_path_buf(),
        };
        if let Err(err) = self.enter(call, dest) {
            let _ = fs::create_dir_all(dest);
            return Err(err);
        }
        copy_tree(Path::new(url), dest).map_err(|e| io(dest, e))?;
        self.origins
            .borrow_mut()
            .insert(dest.to_path_buf(), PathBuf::from(url));
        self.record_commit(dest)
    }

    fn force_checkout(&self, repo: &Path, branch: &str) -> Result<(), GitError> {
        self.enter(
            Call::Checkout {
                repo: repo.to_path_buf(),
                branch: branch.to_owned(),
            },
            repo,
        )
    }

    fn force_rebase_pull(&self, repo: &Path, branch: &str) -> Result<(), GitError> {
        self.enter(
            Call::Refresh {
                repo: repo.to_path_buf(),
                branch: branch.to_owned(),
            },
            repo,
        )?;
        let origin = self.origins.borrow().get(repo).cloned();
        if let Some(origin) = origin {
            copy_tree(&origin, repo).map_err(|e| io(repo, e))?;
            self.record_commit(repo)?;
        }
        Ok(())
    }

    fn stage(&self, repo: &Path, paths: &[PathBuf]) -> Result<(), GitError> {
        self.enter(
            Call::Stage {
                repo: repo.to_path_buf(),
                paths: paths.to_vec(),
            },
            repo,
        )
    }

    fn commit(&self, repo: &Path, mode: &CommitMode) -> Result<(), GitError> {
        self.enter(
            Call::Commit {
                repo: repo.to_path_buf(),
                mode: mode.clone(),
            },
            repo,
        )?;
        self.record_commit(repo)
    }

    fn push(&self, repo: &Path, branch: &str) -> Result<(), GitError> {
        self.enter(
            Call::Push {
                repo: repo.to_path_buf(),
                branch: branch.to_owned(),
            },
            repo,
        )?;
        let origin = self.origins.borrow().get(repo).cloned();
        if let Some(origin) = origin {
            copy_tree(repo, &origin).map_err(|e| io(repo, e))?;
        }
        Ok(())
    }

    fn discard_last_commit(&self, repo: &Path) -> Result<(), GitError> {
        self.enter(
            Call::DiscardCommit {
                repo: repo.to_path_buf(),
            },
            repo,
        )?;
        if let Some(history) = self.commits.borrow_mut().get_mut(repo) {
            if history.len() > 1 {
                history.pop();
            }
        }
        Ok(())
    }

    fn reset_and_clean(&self, repo: &Path, subdir: &Path) -> Result<(), GitError> {
        self.enter(
            Call::Reset {
                repo: repo.to_path_buf(),
                subdir: subdir.to_path_buf(),
            },
            repo,
        )?;
        let head: Tree = self
            .head(repo)
            .into_iter()
            .filter(|(rel, _)| rel.starts_with(subdir))
            .collect();
        let current: Tree = snapshot(repo)
            .map_err(|e| io(repo, e))?
            .into_iter()
            .filter(|(rel, _)| rel.starts_with(subdir))
            .collect();

        for rel in current.keys().filter(|rel| !head.contains_key(*rel)) {
            fs::remove_file(repo.join(rel)).map_err(|e| io(repo, e))?;
        }
        for (rel, bytes) in &head {
            if current.get(rel) == Some(bytes) {
                continue;
            }
            let path = repo.join(rel);
            if path.is_dir() {
                fs::remove_dir_all(&path).map_err(|e| io(repo, e))?;
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| io(repo, e))?;
            }
            fs::write(&path, bytes).map_err(|e| io(repo, e))?;
        }
        Ok(())
    }
}
