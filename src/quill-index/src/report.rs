//! Prompt-context formatting for an indexed codebase.
//!
//! These renderings are embedded into model prompts, so they stay plain
//! text: no color, no box drawing.

use quill_common::format_bytes;

use crate::index::{CodebaseIndex, FileRecord};

/// Files whose presence says something about the project as a whole.
const KEY_FILES: [&str; 12] = [
    "Cargo.toml",
    "go.mod",
    "package.json",
    "requirements.txt",
    "pom.xml",
    "build.gradle",
    "Gemfile",
    "composer.json",
    "Makefile",
    "Dockerfile",
    "README.md",
    "main.go",
];

/// Whether a file name is one of the project-defining ones.
pub fn is_key_file(name: &str) -> bool {
    KEY_FILES.contains(&name)
}

/// Render the tree structure, indented by depth.
pub fn format_file_structure(files: &[FileRecord]) -> String {
    let mut out = String::new();
    for file in files {
        let indent = "  ".repeat(file.depth());
        if file.is_dir {
            out.push_str(&format!("{indent}{}/\n", file.name));
        } else {
            out.push_str(&format!("{indent}{}\n", file.name));
        }
    }
    out
}

/// Render key files with language, size and purpose.
pub fn format_key_files(files: &[FileRecord]) -> String {
    let mut out = String::new();
    for file in files {
        if !file.is_dir && is_key_file(&file.name) {
            let language = file.language.as_deref().unwrap_or("unknown");
            out.push_str(&format!(
                "- {} ({}, {} lines): {}\n",
                file.path, language, file.lines, file.purpose
            ));
        }
    }
    out
}

/// Render every file with language and line count.
pub fn format_detailed_files(files: &[FileRecord]) -> String {
    let mut out = String::new();
    for file in files {
        if !file.is_dir {
            let language = file.language.as_deref().unwrap_or("unknown");
            out.push_str(&format!(
                "- {} ({}, {} lines)\n",
                file.path, language, file.lines
            ));
        }
    }
    out
}

/// One-paragraph overview used at the top of query/analysis prompts.
pub fn format_overview(index: &CodebaseIndex) -> String {
    format!(
        "- Root path: {}\n- Total files: {}\n- Total lines: {}\n- Directories: {}\n- Languages: {}\n- Size: {}\n",
        index.root_path,
        index.file_count(),
        index.total_lines,
        index.directories,
        index.languages.join(", "),
        format_bytes(index.total_bytes),
    )
}
