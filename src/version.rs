//! Client build identity.
//!
//! `build.rs` stamps git and toolchain details into the binary; they show
//! up in `aiclone version`, in the startup log line, and in the
//! `User-Agent` sent to the service.

use std::fmt;

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// Short commit hash, "unknown" outside a git checkout
    pub git_hash: &'static str,
    pub git_branch: &'static str,
    git_dirty: &'static str,
    pub built_at: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("AICLONE_GIT_HASH"),
            git_branch: env!("AICLONE_GIT_BRANCH"),
            git_dirty: env!("AICLONE_GIT_DIRTY"),
            built_at: env!("AICLONE_BUILD_TIMESTAMP"),
            target: env!("AICLONE_TARGET"),
            profile: env!("AICLONE_PROFILE"),
            rustc: env!("AICLONE_RUSTC_VERSION"),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.git_dirty == "true"
    }

    /// `0.1.0-abc1234`, with `-dirty` appended for uncommitted builds
    pub fn full_version(&self) -> String {
        let mut full = format!("{}-{}", self.version, self.git_hash);
        if self.is_dirty() {
            full.push_str("-dirty");
        }
        full
    }

    /// `User-Agent` header for service requests
    pub fn user_agent(&self) -> String {
        format!("aiclone/{}", self.full_version())
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.full_version())?;
        writeln!(f)?;
        writeln!(f, "Build Information:")?;
        let dirty = if self.is_dirty() { " (uncommitted changes)" } else { "" };
        let rows = [
            ("Version", self.version.to_string()),
            ("Git Hash", format!("{}{}", self.git_hash, dirty)),
            ("Git Branch", self.git_branch.to_string()),
            ("Built", self.built_at.to_string()),
            ("Profile", self.profile.to_string()),
            ("Target", self.target.to_string()),
            ("Compiler", self.rustc.to_string()),
        ];
        for (label, value) in rows {
            writeln!(f, "  {:<11} {}", format!("{}:", label), value)?;
        }
        Ok(())
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::current()
}

/// Print the `aiclone version` report to stdout.
pub fn print_version() {
    print!("{}", build_info());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_identity() {
        let info = build_info();
        assert_eq!(info.name, "aiclone-client");
        assert!(!info.version.is_empty());
    }

    #[test]
    fn test_full_version_contains_hash() {
        let info = build_info();
        let full = info.full_version();
        assert!(full.starts_with(info.version));
        assert!(full.contains(info.git_hash));
        assert_eq!(full.ends_with("-dirty"), info.is_dirty());
    }

    #[test]
    fn test_user_agent() {
        assert!(build_info().user_agent().starts_with("aiclone/0."));
    }

    #[test]
    fn test_report_rows() {
        let report = build_info().to_string();
        for label in ["Build Information:", "Version:", "Git Hash:", "Target:", "Compiler:"] {
            assert!(report.contains(label), "missing {}", label);
        }
    }
}
