use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LanguageId {
    Rust,
    Go,
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    C,
    Cpp,
    Java,
    Json,
    Toml,
    Css,
    Bash,
    Sql,
    Markdown,
}

impl LanguageId {
    pub const ALL: [LanguageId; 15] = [
        Self::Rust,
        Self::Go,
        Self::Python,
        Self::JavaScript,
        Self::TypeScript,
        Self::Tsx,
        Self::C,
        Self::Cpp,
        Self::Java,
        Self::Json,
        Self::Toml,
        Self::Css,
        Self::Bash,
        Self::Sql,
        Self::Markdown,
    ];

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|s| s.to_str())?.to_ascii_lowercase();
        match ext.as_str() {
            "rs" => Some(Self::Rust),
            "go" => Some(Self::Go),
            "py" | "pyi" => Some(Self::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "c" => Some(Self::C),
            "cc" | "cpp" | "cxx" | "c++" | "hpp" | "hh" | "hxx" | "h++" | "h" => Some(Self::Cpp),
            "java" => Some(Self::Java),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "css" => Some(Self::Css),
            "sh" | "bash" => Some(Self::Bash),
            "sql" => Some(Self::Sql),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// 按名字查找（语法覆盖命令用），忽略大小写
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|lang| {
            lang.language_id().eq_ignore_ascii_case(name)
                || lang.display_name().eq_ignore_ascii_case(name)
        })
    }

    /// 行注释前缀，自动缩进判断时跳过以此开头的行
    pub fn comment_prefix(self) -> &'static str {
        match self {
            Self::Python | Self::Toml | Self::Bash => "#",
            Self::Sql => "--",
            Self::Css => "/*",
            Self::Markdown => "<!--",
            _ => "//",
        }
    }

    pub fn language_id(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "typescriptreact",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Css => "css",
            Self::Bash => "bash",
            Self::Sql => "sql",
            Self::Markdown => "markdown",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Rust => "Rust",
            Self::Go => "Go",
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Tsx => "TSX",
            Self::C => "C",
            Self::Cpp => "C++",
            Self::Java => "Java",
            Self::Json => "JSON",
            Self::Toml => "TOML",
            Self::Css => "CSS",
            Self::Bash => "Bash",
            Self::Sql => "SQL",
            Self::Markdown => "Markdown",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/language.rs"]
mod tests;
