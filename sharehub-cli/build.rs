use std::path::Path;
use std::process::Command;

/// Short commit id of the checkout, with a `-dirty` suffix for local edits.
fn git_revision(repo_root: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!rev.is_empty()).then_some(rev)
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let repo_root = Path::new(&manifest_dir).join("..");

    // Release builds from a source tarball have no .git; CI passes the id in.
    println!("cargo:rerun-if-env-changed=SHAREHUB_BUILD_SHA");
    let head = repo_root.join(".git").join("HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }

    let revision = std::env::var("SHAREHUB_BUILD_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| git_revision(&repo_root))
        .unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env=SHAREHUB_BUILD_SHA={revision}");
}
