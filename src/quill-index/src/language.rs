//! Language detection and file-purpose heuristics.

/// Detect the language of a file from its name.
pub fn detect_language(filename: &str) -> Option<&'static str> {
    if matches!(filename, "Dockerfile" | "Makefile") {
        return Some(filename_language(filename));
    }

    let ext = filename.rsplit_once('.').map(|(_, ext)| ext)?;
    let lang = match ext.to_lowercase().as_str() {
        "rs" => "Rust",
        "go" => "Go",
        "js" | "mjs" | "cjs" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "py" => "Python",
        "java" => "Java",
        "cpp" | "cc" | "cxx" => "C++",
        "c" | "h" => "C",
        "cs" => "C#",
        "php" => "PHP",
        "rb" => "Ruby",
        "swift" => "Swift",
        "kt" | "kts" => "Kotlin",
        "scala" => "Scala",
        "html" | "htm" => "HTML",
        "css" => "CSS",
        "scss" | "sass" => "SCSS",
        "json" => "JSON",
        "xml" => "XML",
        "yaml" | "yml" => "YAML",
        "toml" => "TOML",
        "ini" | "conf" => "Config",
        "sh" | "bash" | "zsh" | "fish" => "Shell",
        "sql" => "SQL",
        "md" => "Markdown",
        "txt" => "Text",
        _ => return None,
    };
    Some(lang)
}

fn filename_language(filename: &str) -> &'static str {
    match filename {
        "Dockerfile" => "Dockerfile",
        _ => "Makefile",
    }
}

/// Classify what a file is for, from its name and relative path.
pub fn determine_purpose(filename: &str, relative_path: &str) -> &'static str {
    let name = filename.to_lowercase();
    let path = relative_path.to_lowercase();

    if name.contains("config") || path.contains("config") {
        return "Configuration";
    }
    if name.contains("settings") || path.contains("settings") {
        return "Settings";
    }
    if matches!(
        name.as_str(),
        "package.json" | "go.mod" | "cargo.toml" | "requirements.txt" | "gemfile"
    ) {
        return "Dependencies";
    }
    if name.contains("makefile") || name.contains("build") || name == "dockerfile" {
        return "Build";
    }
    if name.contains("readme") || path.contains("docs") {
        return "Documentation";
    }
    if name.contains("license") {
        return "License";
    }
    if path.contains("test") || name.contains("test") {
        return "Testing";
    }
    if name.contains("main") || path.contains("cmd") || path.contains("bin") {
        return "Entry point";
    }
    "Source code"
}
