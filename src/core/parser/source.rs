//! Structural parsing of Python source at top-level statement granularity.
//!
//! Parsing happens in two passes. A layout scan groups physical lines into
//! logical lines and checks indentation, block headers, brackets and string
//! literals, reporting errors the way the Python tokenizer words them. The
//! tree-sitter grammar then builds the statement tree and catches any
//! remaining grammar errors. The layout scan is needed because tree-sitter
//! recovers silently from stray indentation.

use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use tracing::debug;
use tree_sitter::{Node, Parser};

use crate::error::AgentError;

const TAB_WIDTH: usize = 8;

/// Keywords that open a compound statement and need a trailing colon
const BLOCK_KEYWORDS: &[&str] = &[
    "def", "class", "if", "elif", "else", "for", "while", "try", "except", "finally", "with",
];

/// Result of parsing one source text
pub type ParseOutcome = Result<SourceTree, SyntaxError>;

/// Class of a syntax error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnexpectedIndent,
    ExpectedColon,
    ExpectedIndentedBlock,
    UnindentMismatch,
    UnclosedBracket(char),
    UnmatchedBracket(char),
    MismatchedBracket { open: char, close: char },
    UnterminatedString,
    UnterminatedTripleQuote,
    InvalidSyntax,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::UnexpectedIndent => f.write_str("unexpected indent"),
            SyntaxErrorKind::ExpectedColon => f.write_str("expected ':'"),
            SyntaxErrorKind::ExpectedIndentedBlock => f.write_str("expected an indented block"),
            SyntaxErrorKind::UnindentMismatch => {
                f.write_str("unindent does not match any outer indentation level")
            }
            SyntaxErrorKind::UnclosedBracket(c) => write!(f, "'{}' was never closed", c),
            SyntaxErrorKind::UnmatchedBracket(c) => write!(f, "unmatched '{}'", c),
            SyntaxErrorKind::MismatchedBracket { open, close } => write!(
                f,
                "closing parenthesis '{}' does not match opening parenthesis '{}'",
                close, open
            ),
            SyntaxErrorKind::UnterminatedString => f.write_str("unterminated string literal"),
            SyntaxErrorKind::UnterminatedTripleQuote => {
                f.write_str("unterminated triple-quoted string literal")
            }
            SyntaxErrorKind::InvalidSyntax => f.write_str("invalid syntax"),
        }
    }
}

/// Parse failure with its 1-indexed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    fn new(line: usize, kind: SyntaxErrorKind) -> Self {
        Self { line, kind }
    }

    /// Python-style error message
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.kind, self.line)
    }
}

/// What a top-level statement is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// `def`, decorated or not
    Function { name: String },
    /// `async def`, decorated or not
    AsyncFunction { name: String },
    Class { name: String },
    Other,
}

/// One top-level statement of a parsed source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    /// Byte span in the source, decorators included
    pub span: Range<usize>,
    /// 1-indexed first line
    pub line: usize,
}

impl Statement {
    pub fn function_name(&self) -> Option<&str> {
        match &self.kind {
            StatementKind::Function { name } => Some(name),
            _ => None,
        }
    }
}

/// Top-level structure of a Python source that parsed cleanly
#[derive(Debug, Clone)]
pub struct SourceTree {
    source: String,
    statements: Vec<Statement>,
    appended: Vec<String>,
}

impl SourceTree {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Top-level synchronous function definitions in source order
    pub fn functions(&self) -> impl Iterator<Item = &Statement> {
        self.statements
            .iter()
            .filter(|s| matches!(s.kind, StatementKind::Function { .. }))
    }

    /// Names of the top-level function definitions
    pub fn function_names(&self) -> HashSet<&str> {
        self.functions().filter_map(|s| s.function_name()).collect()
    }

    /// Source text of a statement
    pub fn text_of(&self, statement: &Statement) -> &str {
        &self.source[statement.span.clone()]
    }

    /// Append a top-level statement after the existing ones
    pub fn append(&mut self, text: impl Into<String>) {
        self.appended.push(text.into());
    }

    /// Serialize the tree, appended statements included
    pub fn to_source(&self) -> String {
        if self.appended.is_empty() {
            return self.source.clone();
        }

        let mut out = self.source.trim_end().to_string();
        for text in &self.appended {
            if !out.is_empty() {
                out.push_str("\n\n\n");
            }
            out.push_str(text.trim_end());
        }
        out.push('\n');
        out
    }
}

/// Python source parser
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new() -> Result<Self, AgentError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| AgentError::ParserUnavailable(format!("Failed to set language: {e}")))?;
        Ok(Self { parser })
    }

    /// Parse source into a statement tree or the first syntax error
    pub fn parse(&mut self, source: &str) -> ParseOutcome {
        check_layout(source)?;

        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| SyntaxError::new(1, SyntaxErrorKind::InvalidSyntax))?;
        let root = tree.root_node();

        if root.has_error() {
            let error = first_error(root)
                .map(|node| {
                    let kind = if node.is_missing() && node.kind() == ":" {
                        SyntaxErrorKind::ExpectedColon
                    } else {
                        SyntaxErrorKind::InvalidSyntax
                    };
                    SyntaxError::new(node.start_position().row + 1, kind)
                })
                .unwrap_or_else(|| SyntaxError::new(1, SyntaxErrorKind::InvalidSyntax));
            debug!("Grammar rejected source: {}", error);
            return Err(error);
        }

        let bytes = source.as_bytes();
        let mut cursor = root.walk();
        let statements = root
            .named_children(&mut cursor)
            .filter(|node| node.kind() != "comment")
            .map(|node| Statement {
                kind: statement_kind(node, bytes),
                span: node.start_byte()..node.end_byte(),
                line: node.start_position().row + 1,
            })
            .collect();

        Ok(SourceTree {
            source: source.to_string(),
            statements,
            appended: Vec::new(),
        })
    }
}

fn statement_kind(node: Node, bytes: &[u8]) -> StatementKind {
    let definition = if node.kind() == "decorated_definition" {
        match node.child_by_field_name("definition") {
            Some(inner) => inner,
            None => return StatementKind::Other,
        }
    } else {
        node
    };

    let name = definition
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(bytes).ok())
        .map(str::to_string);

    let is_async = definition.child(0).is_some_and(|c| c.kind() == "async");

    match (definition.kind(), name) {
        ("function_definition", Some(name)) if is_async => StatementKind::AsyncFunction { name },
        ("function_definition", Some(name)) => StatementKind::Function { name },
        ("class_definition", Some(name)) => StatementKind::Class { name },
        _ => StatementKind::Other,
    }
}

/// First ERROR or MISSING node in document order
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

/// String literal being scanned
#[derive(Debug, Clone, Copy)]
enum StringState {
    Single { quote: char },
    Triple { quote: char, line: usize },
}

/// Logical line accumulated across physical lines
#[derive(Debug, Default)]
struct LogicalLine {
    /// Leading words used to recognise block headers
    head: String,
    has_top_colon: bool,
    ends_with_colon: bool,
}

impl LogicalLine {
    fn is_block_header(&self) -> bool {
        let mut words = self
            .head
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|w| !w.is_empty());
        match words.next() {
            Some("async") => matches!(words.next(), Some("def" | "for" | "with")),
            Some(word) => BLOCK_KEYWORDS.contains(&word) && self.head_starts_with_word(word),
            None => false,
        }
    }

    /// The keyword must be the very first token, not e.g. `(if` or `.else`
    fn head_starts_with_word(&self, word: &str) -> bool {
        self.head.starts_with(word)
            && !self.head[word.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
    }
}

fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
            '\x0c' => width = 0,
            _ => break,
        }
    }
    width
}

fn is_closer(c: char) -> Option<char> {
    match c {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        _ => None,
    }
}

/// Check indentation, block headers, brackets and strings
fn check_layout(source: &str) -> Result<(), SyntaxError> {
    let mut indents: Vec<usize> = vec![0];
    let mut brackets: Vec<(char, usize)> = Vec::new();
    let mut string: Option<StringState> = None;
    let mut logical: Option<LogicalLine> = None;
    let mut pending_block: Option<usize> = None;
    let mut last_line = 0;

    for (index, raw) in source.split('\n').enumerate() {
        let line_no = index + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        last_line = line_no;

        if logical.is_none() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let indent = indent_width(line);
            let top = indents.last().copied().unwrap_or(0);
            if pending_block.take().is_some() {
                if indent <= top {
                    return Err(SyntaxError::new(line_no, SyntaxErrorKind::ExpectedIndentedBlock));
                }
                indents.push(indent);
            } else if indent > top {
                return Err(SyntaxError::new(line_no, SyntaxErrorKind::UnexpectedIndent));
            } else if indent < top {
                while indents.last().is_some_and(|&level| level > indent) {
                    indents.pop();
                }
                if indents.last().copied().unwrap_or(0) != indent {
                    return Err(SyntaxError::new(line_no, SyntaxErrorKind::UnindentMismatch));
                }
            }
            logical = Some(LogicalLine::default());
        }

        let Some(current) = logical.as_mut() else {
            continue;
        };

        let chars: Vec<char> = line.chars().collect();
        let mut continued = false;
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let leading = current.head.is_empty() && c.is_whitespace();
            if !leading && current.head.len() < 16 && brackets.is_empty() && string.is_none() {
                current.head.push(c);
            }

            match string {
                Some(StringState::Single { quote }) => {
                    if c == '\\' {
                        if i + 1 == chars.len() {
                            continued = true;
                        }
                        i += 1;
                    } else if c == quote {
                        string = None;
                    }
                }
                Some(StringState::Triple { quote, .. }) => {
                    if c == '\\' {
                        i += 1;
                    } else if c == quote && chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote) {
                        string = None;
                        i += 2;
                    }
                }
                None => {
                    if c == '#' {
                        break;
                    }
                    if !c.is_whitespace() {
                        current.ends_with_colon = false;
                    }
                    match c {
                        '\'' | '"' => {
                            if chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c) {
                                string = Some(StringState::Triple { quote: c, line: line_no });
                                i += 2;
                            } else {
                                string = Some(StringState::Single { quote: c });
                            }
                        }
                        '(' | '[' | '{' => brackets.push((c, line_no)),
                        ')' | ']' | '}' => {
                            let open = is_closer(c).unwrap_or(c);
                            match brackets.pop() {
                                Some((found, _)) if found == open => {}
                                Some((found, _)) => {
                                    return Err(SyntaxError::new(
                                        line_no,
                                        SyntaxErrorKind::MismatchedBracket { open: found, close: c },
                                    ));
                                }
                                None => {
                                    return Err(SyntaxError::new(
                                        line_no,
                                        SyntaxErrorKind::UnmatchedBracket(c),
                                    ));
                                }
                            }
                        }
                        ':' if brackets.is_empty() && chars.get(i + 1) != Some(&'=') => {
                            current.has_top_colon = true;
                            current.ends_with_colon = true;
                        }
                        '\\' if i + 1 == chars.len() => continued = true,
                        _ => {}
                    }
                }
            }
            i += 1;
        }

        if let Some(StringState::Single { .. }) = string {
            if !continued {
                return Err(SyntaxError::new(line_no, SyntaxErrorKind::UnterminatedString));
            }
            continue;
        }
        if string.is_some() || !brackets.is_empty() || continued {
            continue;
        }

        if let Some(done) = logical.take() {
            if done.is_block_header() && !done.has_top_colon {
                return Err(SyntaxError::new(line_no, SyntaxErrorKind::ExpectedColon));
            }
            if done.ends_with_colon {
                pending_block = Some(line_no);
            }
        }
    }

    match string {
        Some(StringState::Triple { line, .. }) => {
            return Err(SyntaxError::new(line, SyntaxErrorKind::UnterminatedTripleQuote));
        }
        Some(StringState::Single { .. }) => {
            return Err(SyntaxError::new(last_line, SyntaxErrorKind::UnterminatedString));
        }
        None => {}
    }
    if let Some(&(open, line)) = brackets.last() {
        return Err(SyntaxError::new(line, SyntaxErrorKind::UnclosedBracket(open)));
    }
    if let Some(header) = pending_block {
        debug!("Block opened on line {} has no body", header);
        return Err(SyntaxError::new(last_line, SyntaxErrorKind::ExpectedIndentedBlock));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseOutcome {
        SourceParser::new().unwrap().parse(source)
    }

    fn error_of(source: &str) -> SyntaxError {
        parse(source).expect_err("source should not parse")
    }

    #[test]
    fn test_parse_collects_top_level_statements() {
        let source = "import os\n\n\nclass Greeter:\n    def hello(self):\n        return 'hi'\n\n\ndef main():\n    print(os.name)\n\n\nasync def fetch():\n    return 1\n";
        let tree = parse(source).unwrap();

        let kinds: Vec<&StatementKind> = tree.statements().iter().map(|s| &s.kind).collect();
        assert_eq!(kinds.len(), 4);
        assert_eq!(*kinds[0], StatementKind::Other);
        assert_eq!(*kinds[1], StatementKind::Class { name: "Greeter".to_string() });
        assert_eq!(*kinds[2], StatementKind::Function { name: "main".to_string() });
        assert_eq!(*kinds[3], StatementKind::AsyncFunction { name: "fetch".to_string() });

        let names = tree.function_names();
        assert!(names.contains("main"));
        assert!(!names.contains("fetch"));
        assert!(!names.contains("hello"));
    }

    #[test]
    fn test_decorated_function_span_includes_decorator() {
        let source = "@app.route('/')\ndef home():\n    return 'home'\n";
        let tree = parse(source).unwrap();

        let function = tree.functions().next().unwrap();
        assert_eq!(function.function_name(), Some("home"));
        assert_eq!(function.line, 1);
        assert_eq!(
            tree.text_of(function),
            "@app.route('/')\ndef home():\n    return 'home'"
        );
    }

    #[test]
    fn test_decorated_async_function() {
        let source = "@app.get(\"/\")\nasync def read_root():\n    return {}\n";
        let tree = parse(source).unwrap();

        assert_eq!(
            tree.statements()[0].kind,
            StatementKind::AsyncFunction { name: "read_root".to_string() }
        );
        assert_eq!(tree.functions().count(), 0);
    }

    #[test]
    fn test_to_source_without_appends_is_identity() {
        let source = "x = 1  # keep\n";
        let tree = parse(source).unwrap();
        assert_eq!(tree.to_source(), source);
    }

    #[test]
    fn test_to_source_with_appends() {
        let mut tree = parse("def a():\n    return 1\n\n").unwrap();
        tree.append("def b():\n    return 2");

        let merged = tree.to_source();
        assert_eq!(merged, "def a():\n    return 1\n\n\ndef b():\n    return 2\n");
        assert!(parse(&merged).is_ok());
    }

    #[test]
    fn test_empty_source_parses() {
        let tree = parse("").unwrap();
        assert!(tree.statements().is_empty());
    }

    #[test]
    fn test_valid_constructs() {
        let sources = [
            "if x:\n    pass\nelif y:\n    pass\nelse:\n    pass\n",
            "if x: pass\n",
            "def f(a: int, b: dict = {'k': 1}) -> int:\n    return a\n",
            "items = [\n    1,\n        2,\n]\n",
            "total = 1 + \\\n        2\n",
            "text = \"\"\"\n  not: code\n    (\n\"\"\"\n",
            "s = 'a # not a comment'  # comment\n",
            "def f():\n    x = 1\n\n    # comment\n        # odd comment\n    return x\n",
            "for i in range(3):\n\tprint(i)\n",
            "if (n := 10) > 5:\n    print(n)\n",
            "label = 'else'\nelsewhere = 1\n",
        ];
        for source in sources {
            assert!(parse(source).is_ok(), "expected valid: {:?}", source);
        }
    }

    #[test]
    fn test_unexpected_indent() {
        let error = error_of("x = 1\n    y = 2\nprint(x)\n");
        assert_eq!(error.line, 2);
        assert_eq!(error.kind, SyntaxErrorKind::UnexpectedIndent);
        assert_eq!(error.message(), "unexpected indent");
    }

    #[test]
    fn test_expected_colon() {
        let error = error_of("def greet(name)\n    return name\n");
        assert_eq!(error.line, 1);
        assert_eq!(error.kind, SyntaxErrorKind::ExpectedColon);
        assert_eq!(error.message(), "expected ':'");
    }

    #[test]
    fn test_expected_colon_on_last_line_of_header() {
        let error = error_of("def greet(\n    name,\n)\n    return name\n");
        assert_eq!(error.line, 3);
        assert_eq!(error.kind, SyntaxErrorKind::ExpectedColon);
    }

    #[test]
    fn test_expected_indented_block() {
        assert_eq!(
            error_of("def f():\nreturn 1\n").kind,
            SyntaxErrorKind::ExpectedIndentedBlock
        );
        assert_eq!(
            error_of("def f():\n").kind,
            SyntaxErrorKind::ExpectedIndentedBlock
        );
    }

    #[test]
    fn test_unindent_mismatch() {
        let error = error_of("def f():\n    x = 1\n  return x\n");
        assert_eq!(error.line, 3);
        assert_eq!(error.kind, SyntaxErrorKind::UnindentMismatch);
    }

    #[test]
    fn test_bracket_errors() {
        assert_eq!(
            error_of("print(1\n").kind,
            SyntaxErrorKind::UnclosedBracket('(')
        );
        assert_eq!(error_of("x = 1)\n").kind, SyntaxErrorKind::UnmatchedBracket(')'));
        assert_eq!(
            error_of("x = [1)\n").kind,
            SyntaxErrorKind::MismatchedBracket { open: '[', close: ')' }
        );
    }

    #[test]
    fn test_string_errors() {
        assert_eq!(
            error_of("x = 'abc\ny = 2\n"),
            SyntaxError { line: 1, kind: SyntaxErrorKind::UnterminatedString }
        );
        assert_eq!(
            error_of("x = 1\ndoc = \"\"\"never closed\n").kind,
            SyntaxErrorKind::UnterminatedTripleQuote
        );
    }

    #[test]
    fn test_grammar_error_after_layout() {
        let error = error_of("x = = 1\n");
        assert_eq!(error.line, 1);
        assert_eq!(error.kind, SyntaxErrorKind::InvalidSyntax);
    }
}
