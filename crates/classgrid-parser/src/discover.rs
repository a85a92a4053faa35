//! Input file discovery.

use regex::Regex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// Compiled file-name glob (`*`, `?`).
///
/// Like shell globs, wildcards never match a leading `.`; hidden files are
/// only matched by patterns that start with a literal `.`.
#[derive(Debug, Clone)]
pub struct FileGlob {
    regex: Regex,
    matches_hidden: bool,
}

impl FileGlob {
    pub fn new(pattern: &str) -> Result<Self, LoadError> {
        Ok(Self {
            regex: glob_to_regex(pattern)?,
            matches_hidden: pattern.starts_with('.'),
        })
    }

    pub fn is_match(&self, name: &str) -> bool {
        (self.matches_hidden || !name.starts_with('.')) && self.regex.is_match(name)
    }
}

/// Translate a file-name glob into an anchored regex
pub fn glob_to_regex(pattern: &str) -> Result<Regex, LoadError> {
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            c => re.push_str(&regex::escape(&c.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|e| LoadError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Student identifier for a source file: its name without extension
pub fn student_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Files in `dir` (non-recursive) whose names match `pattern`, sorted.
///
/// Office lock files (`~$name.xlsx`) and `exclude` are never returned. A
/// directory that does not exist holds no files.
pub fn discover_inputs(
    dir: &Path,
    pattern: &str,
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>, LoadError> {
    let matcher = FileGlob::new(pattern)?;
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) if source.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(LoadError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with("~$") || !matcher.is_match(&name) {
            continue;
        }
        if exclude.is_some_and(|out| same_file(&path, out)) {
            continue;
        }
        paths.push(path);
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn glob_translation() {
        let glob = FileGlob::new("*.xlsx").unwrap();
        assert!(glob.is_match("alice.xlsx"));
        assert!(!glob.is_match("alice.xlsx.bak"));
        assert!(!glob.is_match("alice_xlsx"));

        let glob = FileGlob::new("student_??.xls*").unwrap();
        assert!(glob.is_match("student_01.xls"));
        assert!(glob.is_match("student_02.xlsx"));
        assert!(!glob.is_match("student_003.xlsx"));
    }

    #[test]
    fn wildcards_skip_hidden_names() {
        let glob = FileGlob::new("*.xlsx").unwrap();
        assert!(!glob.is_match(".xlsx"));
        assert!(!glob.is_match(".hidden.xlsx"));
        assert!(!FileGlob::new("?alice.xlsx").unwrap().is_match(".alice.xlsx"));

        let glob = FileGlob::new(".*.xlsx").unwrap();
        assert!(glob.is_match(".hidden.xlsx"));
        assert!(!glob.is_match("alice.xlsx"));
    }

    #[test]
    fn student_id_strips_extension() {
        assert_eq!(student_id(Path::new("/tmp/in/alice.xlsx")), "alice");
        assert_eq!(student_id(Path::new("bob.smith.xlsx")), "bob.smith");
        assert_eq!(student_id(Path::new("carol")), "carol");
    }

    #[test]
    fn discovery_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "bob.xlsx",
            "alice.xlsx",
            "~$alice.xlsx",
            ".backup.xlsx",
            "notes.txt",
            "out.xlsx",
        ] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.xlsx")).unwrap();

        let out = dir.path().join("out.xlsx");
        let found = discover_inputs(dir.path(), "*.xlsx", Some(out.as_path())).unwrap();
        let names: Vec<String> = found.iter().map(|p| student_id(p)).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn missing_output_is_not_excluded_by_accident() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("alice.xlsx"), b"x").unwrap();
        let out = dir.path().join("result.xlsx");
        let found = discover_inputs(dir.path(), "*.xlsx", Some(out.as_path())).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn missing_directory_has_no_files() {
        let found = discover_inputs(Path::new("/nonexistent/classgrid/dir"), "*.xlsx", None);
        assert!(found.unwrap().is_empty());
    }
}
