//! 脚本宿主：编译用户脚本、缓存编译结果、调用入口 `main`
//!
//! 编译结果缓存在脚本旁的 `<script>.cache`，缓存里记着源码的哈希，哈希一致时直接加载。

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;
use std::io;
use std::path::{Path, PathBuf};

pub const ENTRY_POINT: &str = "main";
pub const CACHE_SUFFIX: &str = "cache";
pub const MAX_CALL_DEPTH: usize = 64;

#[derive(Debug)]
pub enum ScriptError {
    Io(io::Error),
    Compile { line: usize, message: String },
    MissingEntry(String),
    UnknownFunction(String),
    CallDepthExceeded,
    Api(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io(e) => write!(f, "script IO error: {}", e),
            ScriptError::Compile { line, message } => {
                write!(f, "compile error at line {}: {}", line, message)
            }
            ScriptError::MissingEntry(name) => write!(f, "entry point `{}` not found", name),
            ScriptError::UnknownFunction(name) => write!(f, "unknown function `{}`", name),
            ScriptError::CallDepthExceeded => {
                write!(f, "call depth exceeded {}", MAX_CALL_DEPTH)
            }
            ScriptError::Api(msg) => write!(f, "script command failed: {}", msg),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ScriptError {
    fn from(e: io::Error) -> Self {
        ScriptError::Io(e)
    }
}

/// 脚本能触达的宿主能力
pub trait ScriptApi {
    fn open_document(&mut self, path: &Path) -> Result<(), String>;
    fn open_project(&mut self, path: &Path) -> Result<(), String>;
    fn refresh(&mut self) -> Result<(), String>;
    fn show_message(&mut self, text: &str);
    fn insert_text(&mut self, text: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "arg", rename_all = "snake_case")]
pub enum Instruction {
    Open(PathBuf),
    OpenProject(PathBuf),
    Refresh,
    Message(String),
    Insert(String),
    Call(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFunction {
    pub name: String,
    pub body: Vec<Instruction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptProgram {
    pub functions: Vec<ScriptFunction>,
}

impl ScriptProgram {
    pub fn function(&self, name: &str) -> Option<&ScriptFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn invoke(&self, entry: &str, api: &mut dyn ScriptApi) -> Result<(), ScriptError> {
        if self.function(entry).is_none() {
            return Err(ScriptError::MissingEntry(entry.to_string()));
        }
        self.call(entry, api, 0)
    }

    fn call(&self, name: &str, api: &mut dyn ScriptApi, depth: usize) -> Result<(), ScriptError> {
        if depth >= MAX_CALL_DEPTH {
            return Err(ScriptError::CallDepthExceeded);
        }
        let function = self
            .function(name)
            .ok_or_else(|| ScriptError::UnknownFunction(name.to_string()))?;

        for instruction in &function.body {
            match instruction {
                Instruction::Open(path) => api.open_document(path).map_err(ScriptError::Api)?,
                Instruction::OpenProject(path) => {
                    api.open_project(path).map_err(ScriptError::Api)?
                }
                Instruction::Refresh => api.refresh().map_err(ScriptError::Api)?,
                Instruction::Message(text) => api.show_message(text),
                Instruction::Insert(text) => api.insert_text(text).map_err(ScriptError::Api)?,
                Instruction::Call(callee) => self.call(callee, api, depth + 1)?,
            }
        }
        Ok(())
    }
}

pub trait ScriptCompiler {
    /// `base_dir` 是脚本所在目录，用于解析相对路径
    fn compile(&self, source: &str, base_dir: &Path) -> Result<ScriptProgram, ScriptError>;
}

/// 行式宏语言：
///
/// ```text
/// # 注释
/// fn main {
///     open "src/lib.rs"
///     call greet
/// }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct MacroCompiler;

impl MacroCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptCompiler for MacroCompiler {
    fn compile(&self, source: &str, base_dir: &Path) -> Result<ScriptProgram, ScriptError> {
        let mut program = ScriptProgram::default();
        let mut current: Option<(usize, ScriptFunction)> = None;
        let mut calls: Vec<(usize, String)> = Vec::new();

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let err = |message: String| ScriptError::Compile {
                line: line_no,
                message,
            };

            if let Some(rest) = line.strip_prefix("fn ") {
                if current.is_some() {
                    return Err(err("nested function definition".to_string()));
                }
                let name = rest
                    .strip_suffix('{')
                    .map(str::trim)
                    .ok_or_else(|| err("expected `{` after function name".to_string()))?;
                if !is_identifier(name) {
                    return Err(err(format!("invalid function name {:?}", name)));
                }
                if program.function(name).is_some() {
                    return Err(err(format!("function `{}` defined twice", name)));
                }
                current = Some((
                    line_no,
                    ScriptFunction {
                        name: name.to_string(),
                        body: Vec::new(),
                    },
                ));
                continue;
            }

            if line == "}" {
                let (_, function) = current
                    .take()
                    .ok_or_else(|| err("unmatched `}`".to_string()))?;
                program.functions.push(function);
                continue;
            }

            let Some((_, function)) = current.as_mut() else {
                return Err(err("command outside of a function".to_string()));
            };

            let (command, arg) = match line.split_once(char::is_whitespace) {
                Some((command, arg)) => (command, arg.trim()),
                None => (line, ""),
            };
            let instruction = match command {
                "open" => Instruction::Open(resolve(base_dir, &parse_string(arg).map_err(err)?)),
                "open_project" => {
                    Instruction::OpenProject(resolve(base_dir, &parse_string(arg).map_err(err)?))
                }
                "refresh" => {
                    if !arg.is_empty() {
                        return Err(err("`refresh` takes no argument".to_string()));
                    }
                    Instruction::Refresh
                }
                "message" => Instruction::Message(parse_string(arg).map_err(err)?),
                "insert" => Instruction::Insert(parse_string(arg).map_err(err)?),
                "call" => {
                    if !is_identifier(arg) {
                        return Err(err(format!("invalid function name {:?}", arg)));
                    }
                    calls.push((line_no, arg.to_string()));
                    Instruction::Call(arg.to_string())
                }
                other => return Err(err(format!("unknown command `{}`", other))),
            };
            function.body.push(instruction);
        }

        if let Some((line, function)) = current {
            return Err(ScriptError::Compile {
                line,
                message: format!("function `{}` is missing `}}`", function.name),
            });
        }

        for (line, name) in calls {
            if program.function(&name).is_none() {
                return Err(ScriptError::Compile {
                    line,
                    message: format!("call to undefined function `{}`", name),
                });
            }
        }

        Ok(program)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// 双引号字符串，支持 `\"` `\\` `\n` `\t`
fn parse_string(arg: &str) -> Result<String, String> {
    let inner = arg
        .strip_prefix('"')
        .ok_or_else(|| "expected a quoted string".to_string())?;

    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if chars.as_str().trim().is_empty() {
                    return Ok(out);
                }
                return Err("unexpected text after string".to_string());
            }
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => return Err(format!("unknown escape `\\{}`", other)),
                None => break,
            },
            c => out.push(c),
        }
    }
    Err("unterminated string".to_string())
}

pub struct ScriptHost {
    compiler: Box<dyn ScriptCompiler>,
}

impl Default for ScriptHost {
    fn default() -> Self {
        Self::new(Box::new(MacroCompiler::new()))
    }
}

impl ScriptHost {
    pub fn new(compiler: Box<dyn ScriptCompiler>) -> Self {
        Self { compiler }
    }

    pub fn cache_path(script: &Path) -> PathBuf {
        let mut name = script.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(CACHE_SUFFIX);
        script.with_file_name(name)
    }

    /// 加载（或编译）脚本并执行 `main`
    pub fn run(&self, script: &Path, api: &mut dyn ScriptApi) -> Result<(), ScriptError> {
        let program = self.load(script)?;
        tracing::info!(script = %script.display(), "running script");
        program.invoke(ENTRY_POINT, api)
    }

    pub fn load(&self, script: &Path) -> Result<ScriptProgram, ScriptError> {
        let source = std::fs::read_to_string(script)?;
        let source_hash = hash_source(&source);
        let cache = Self::cache_path(script);
        match read_cache(&cache) {
            Ok(Some(cached)) if cached.source_hash == source_hash => return Ok(cached.program),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(cache = %cache.display(), error = %e, "script cache unreadable, recompiling");
            }
        }

        let base_dir = script.parent().unwrap_or_else(|| Path::new(""));
        let program = self.compiler.compile(&source, base_dir)?;

        let cached = CachedProgram {
            source_hash,
            program,
        };
        if let Err(e) = write_cache(&cache, &cached) {
            tracing::warn!(cache = %cache.display(), error = %e, "failed to write script cache");
        }
        Ok(cached.program)
    }
}

/// 缓存文件内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedProgram {
    pub source_hash: u64,
    pub program: ScriptProgram,
}

/// FxHasher 没有随机种子，跨进程结果稳定
pub fn hash_source(source: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(source.as_bytes());
    hasher.finish()
}

/// 缓存不存在返回 `Ok(None)`
fn read_cache(cache: &Path) -> io::Result<Option<CachedProgram>> {
    let data = match std::fs::read_to_string(cache) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_cache(cache: &Path, cached: &CachedProgram) -> io::Result<()> {
    let data = serde_json::to_string(cached)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    std::fs::write(cache, data)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/script.rs"]
mod tests;
