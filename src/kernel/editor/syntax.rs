//! 语法高亮：tree-sitter 解析 + 按节点类型分类

use crate::kernel::language::LanguageId;
use ropey::Rope;
use tree_sitter::{Language, Parser, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Comment,
    String,
    Keyword,
    Type,
    Number,
    Attribute,
    Lifetime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub kind: HighlightKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AbsHighlightSpan {
    start: usize,
    end: usize,
    kind: HighlightKind,
}

/// 有 tree-sitter 语法的语言才返回 Some
pub fn grammar(language: LanguageId) -> Option<Language> {
    let lang = match language {
        LanguageId::Rust => tree_sitter_rust::language(),
        LanguageId::Go => tree_sitter_go::language(),
        LanguageId::Python => tree_sitter_python::language(),
        LanguageId::JavaScript => tree_sitter_javascript::language(),
        LanguageId::TypeScript => tree_sitter_typescript::language_typescript(),
        LanguageId::Tsx => tree_sitter_typescript::language_tsx(),
        LanguageId::C => tree_sitter_c::language(),
        LanguageId::Cpp => tree_sitter_cpp::language(),
        LanguageId::Java => tree_sitter_java::language(),
        LanguageId::Json => tree_sitter_json::language(),
        LanguageId::Toml => tree_sitter_toml::language(),
        LanguageId::Css => tree_sitter_css::language(),
        LanguageId::Bash => tree_sitter_bash::language(),
        LanguageId::Sql | LanguageId::Markdown => return None,
    };
    Some(lang)
}

pub struct SyntaxDocument {
    language: LanguageId,
    parser: Parser,
    tree: Tree,
}

impl SyntaxDocument {
    pub fn new(language: LanguageId, rope: &Rope) -> Option<Self> {
        let mut parser = Parser::new();
        parser.set_language(grammar(language)?).ok()?;
        let tree = parse_rope(&mut parser, rope)?;
        Some(Self {
            language,
            parser,
            tree,
        })
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// 全量重新解析；失败时保留旧树
    pub fn reparse(&mut self, rope: &Rope) {
        if let Some(tree) = parse_rope(&mut self.parser, rope) {
            self.tree = tree;
        }
    }

    /// 返回 `[start_line, end_line_exclusive)` 每行的高亮，偏移相对行首（字节）
    pub fn highlight_lines(
        &self,
        rope: &Rope,
        start_line: usize,
        end_line_exclusive: usize,
    ) -> Vec<Vec<HighlightSpan>> {
        let total_lines = rope.len_lines().max(1);
        let start_line = start_line.min(total_lines);
        let end_line_exclusive = end_line_exclusive.min(total_lines);
        if start_line >= end_line_exclusive {
            return Vec::new();
        }

        let range_start = rope.line_to_byte(start_line);
        let range_end = if end_line_exclusive >= rope.len_lines() {
            rope.len_bytes()
        } else {
            rope.line_to_byte(end_line_exclusive)
        };

        let spans = collect_highlights(self.language, &self.tree, range_start, range_end);
        let mut per_line = vec![Vec::new(); end_line_exclusive - start_line];

        for span in spans {
            let span_start = span.start.max(range_start);
            let span_end = span.end.min(range_end);
            if span_start >= span_end {
                continue;
            }

            let first_line = rope.byte_to_line(span_start).max(start_line);
            let last_line = rope
                .byte_to_line(span_end.saturating_sub(1))
                .min(end_line_exclusive - 1);

            for line in first_line..=last_line {
                let line_start = rope.line_to_byte(line);
                let line_end = if line + 1 >= rope.len_lines() {
                    rope.len_bytes()
                } else {
                    rope.line_to_byte(line + 1)
                };

                let s = span_start.max(line_start);
                let e = span_end.min(line_end);
                if s >= e {
                    continue;
                }

                per_line[line - start_line].push(HighlightSpan {
                    start: s - line_start,
                    end: e - line_start,
                    kind: span.kind,
                });
            }
        }

        for line_spans in &mut per_line {
            line_spans.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
            merge_adjacent_spans(line_spans);
        }

        per_line
    }
}

fn parse_rope(parser: &mut Parser, rope: &Rope) -> Option<Tree> {
    let mut cache = RopeChunkCache::new(rope);
    parser.parse_with(&mut |byte_offset, _| cache.bytes_from(byte_offset), None)
}

struct RopeChunkCache<'a> {
    rope: &'a Rope,
    chunk: &'a str,
    start: usize,
    end: usize,
}

impl<'a> RopeChunkCache<'a> {
    fn new(rope: &'a Rope) -> Self {
        Self {
            rope,
            chunk: "",
            start: 0,
            end: 0,
        }
    }

    fn bytes_from(&mut self, byte_offset: usize) -> &'a [u8] {
        if byte_offset >= self.rope.len_bytes() {
            return &[];
        }

        if byte_offset < self.start || byte_offset >= self.end {
            let (chunk, chunk_start, _, _) = self.rope.chunk_at_byte(byte_offset);
            self.chunk = chunk;
            self.start = chunk_start;
            self.end = chunk_start + chunk.len();
        }

        let rel = byte_offset.saturating_sub(self.start);
        &self.chunk.as_bytes()[rel..]
    }
}

fn merge_adjacent_spans(spans: &mut Vec<HighlightSpan>) {
    if spans.len() <= 1 {
        return;
    }

    let mut out: Vec<HighlightSpan> = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        if let Some(prev) = out.last_mut() {
            if prev.kind == span.kind && span.start <= prev.end {
                prev.end = prev.end.max(span.end);
                continue;
            }
        }
        out.push(span);
    }
    *spans = out;
}

fn collect_highlights(
    language: LanguageId,
    tree: &Tree,
    start_byte: usize,
    end_byte: usize,
) -> Vec<AbsHighlightSpan> {
    let root = tree.root_node();
    let mut stack = vec![root];
    let mut spans = Vec::new();

    while let Some(node) = stack.pop() {
        let node_start = node.start_byte();
        let node_end = node.end_byte();

        if node_end <= start_byte || node_start >= end_byte {
            continue;
        }

        if let Some(kind) = classify_node(language, node.kind()) {
            spans.push(AbsHighlightSpan {
                start: node_start,
                end: node_end,
                kind,
            });

            // 注释 / 字符串 / 属性整体着色，不再下钻
            if matches!(
                kind,
                HighlightKind::Comment | HighlightKind::String | HighlightKind::Attribute
            ) {
                continue;
            }
        }

        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }

    spans.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
    spans
}

fn classify_node(language: LanguageId, kind: &str) -> Option<HighlightKind> {
    if is_comment_kind(kind) {
        return Some(HighlightKind::Comment);
    }
    if is_string_kind(kind) {
        return Some(HighlightKind::String);
    }
    if kind.contains("integer") || kind.contains("float") || kind.contains("number") {
        return Some(HighlightKind::Number);
    }
    if kind.ends_with("_literal") && (kind.contains("int") || kind.contains("imaginary")) {
        return Some(HighlightKind::Number);
    }
    if matches!(
        kind,
        "type_identifier" | "primitive_type" | "predefined_type" | "integral_type"
    ) {
        return Some(HighlightKind::Type);
    }
    if matches!(
        kind,
        "attribute_item" | "inner_attribute_item" | "decorator" | "annotation" | "marker_annotation"
    ) {
        return Some(HighlightKind::Attribute);
    }
    if kind == "lifetime" {
        return Some(HighlightKind::Lifetime);
    }
    if is_keyword(language, kind) {
        return Some(HighlightKind::Keyword);
    }
    None
}

fn is_comment_kind(kind: &str) -> bool {
    kind.contains("comment")
}

fn is_string_kind(kind: &str) -> bool {
    kind.contains("string") || matches!(kind, "char_literal" | "byte_literal")
}

fn is_keyword(language: LanguageId, kind: &str) -> bool {
    match language {
        LanguageId::Rust => is_rust_keyword(kind),
        LanguageId::Go => is_go_keyword(kind),
        LanguageId::Python => is_python_keyword(kind),
        LanguageId::JavaScript | LanguageId::TypeScript | LanguageId::Tsx => is_js_ts_keyword(kind),
        LanguageId::C | LanguageId::Cpp | LanguageId::Java => is_c_family_keyword(kind),
        LanguageId::Bash => is_bash_keyword(kind),
        LanguageId::Json | LanguageId::Toml => matches!(kind, "true" | "false" | "null"),
        LanguageId::Css | LanguageId::Sql | LanguageId::Markdown => false,
    }
}

fn is_rust_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "as" | "async"
            | "await"
            | "break"
            | "const"
            | "continue"
            | "crate"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "Self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
    )
}

fn is_go_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "break"
            | "case"
            | "chan"
            | "const"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "func"
            | "go"
            | "goto"
            | "if"
            | "import"
            | "interface"
            | "map"
            | "package"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
            | "type"
            | "var"
    )
}

fn is_python_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "False"
            | "None"
            | "True"
            | "and"
            | "as"
            | "assert"
            | "async"
            | "await"
            | "break"
            | "case"
            | "class"
            | "continue"
            | "def"
            | "del"
            | "elif"
            | "else"
            | "except"
            | "finally"
            | "for"
            | "from"
            | "global"
            | "if"
            | "import"
            | "in"
            | "is"
            | "lambda"
            | "match"
            | "nonlocal"
            | "not"
            | "or"
            | "pass"
            | "raise"
            | "return"
            | "try"
            | "while"
            | "with"
            | "yield"
    )
}

fn is_js_ts_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "async"
            | "await"
            | "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "export"
            | "extends"
            | "finally"
            | "for"
            | "from"
            | "function"
            | "if"
            | "import"
            | "in"
            | "instanceof"
            | "interface"
            | "let"
            | "new"
            | "null"
            | "of"
            | "private"
            | "protected"
            | "public"
            | "readonly"
            | "return"
            | "static"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "try"
            | "type"
            | "typeof"
            | "undefined"
            | "var"
            | "void"
            | "while"
            | "with"
            | "yield"
            | "true"
            | "false"
    )
}

fn is_c_family_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "default"
            | "do"
            | "else"
            | "enum"
            | "extends"
            | "extern"
            | "false"
            | "final"
            | "for"
            | "goto"
            | "if"
            | "implements"
            | "import"
            | "inline"
            | "interface"
            | "namespace"
            | "new"
            | "nullptr"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "return"
            | "sizeof"
            | "static"
            | "struct"
            | "switch"
            | "template"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typedef"
            | "union"
            | "using"
            | "virtual"
            | "void"
            | "volatile"
            | "while"
            | "#include"
            | "#define"
            | "#ifdef"
            | "#ifndef"
            | "#endif"
    )
}

fn is_bash_keyword(kind: &str) -> bool {
    matches!(
        kind,
        "if" | "then"
            | "else"
            | "elif"
            | "fi"
            | "for"
            | "while"
            | "until"
            | "do"
            | "done"
            | "case"
            | "esac"
            | "in"
            | "function"
            | "local"
            | "export"
            | "declare"
    )
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/syntax.rs"]
mod tests;
