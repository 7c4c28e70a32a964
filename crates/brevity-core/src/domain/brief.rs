//! Reader and writer for brief documents.
//!
//! A brief document declares one element per line; indentation nests them.
//!
//! ```text
//! brevity templates:"local/*.tmpl"
//!     project:demo
//!         cli:cobra module:github.com/me/demo
//!             command:serve short:"run the server"
//!         readme `
//!             # Demo
//!             Generated by brevity.
//!         `
//! ```
//!
//! - `element[:name]` comes first, followed by any number of `key:value`.
//! - Names and values are bare words, `"double quoted"` (with `\"`, `\\`,
//!   `\n`, `\t` escapes) or `'single quoted'`.
//! - Backtick content closes the element line and may span several lines;
//!   continuation lines lose their common indentation.
//! - Blank lines and `#` comment lines are skipped.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::domain::{
    entities::node::{Node, NodeId, Tree},
    error::DomainError,
};

/// Columns a leading tab counts for.
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Streaming decoder over the text of one document.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    source: &'a str,
    tab_size: usize,
    padding: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tab_size: DEFAULT_TAB_SIZE,
            padding: 0,
        }
    }

    pub fn tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size.max(1);
        self
    }

    /// Offset added to every decoded indent, used when the text is spliced
    /// into an existing document.
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Decode into `tree`, returning the top-level elements in order.
    pub fn decode_into(&self, tree: &mut Tree) -> Result<Vec<NodeId>, DomainError> {
        let lines: Vec<&str> = self.source.lines().collect();
        let mut roots = Vec::new();
        let mut stack: Vec<(usize, NodeId)> = Vec::new();
        let mut index = 0;

        while index < lines.len() {
            let line_no = index + 1;
            let (indent, rest) = self.split_indent(lines[index]);
            if rest.is_empty() || rest.starts_with('#') {
                index += 1;
                continue;
            }

            let mut parser = LineParser::new(rest, line_no);
            let (mut node, content) = parser.element()?;
            index += 1;

            if let Some(first) = content {
                let (text, consumed) = read_content(first, &lines[index..], line_no)?;
                node.content = text;
                index += consumed;
            }

            node.indent = self.padding + indent;
            node.line = line_no;

            while stack.last().is_some_and(|(top, _)| *top >= indent) {
                stack.pop();
            }
            let parent = stack.last().map(|(_, id)| *id);
            let id = tree.add(node, parent);
            if parent.is_none() {
                roots.push(id);
            }
            stack.push((indent, id));
        }

        Ok(roots)
    }

    fn split_indent<'l>(&self, line: &'l str) -> (usize, &'l str) {
        let mut width = 0;
        for (at, ch) in line.char_indices() {
            match ch {
                ' ' => width += 1,
                '\t' => width += self.tab_size,
                _ => return (width, line[at..].trim_end()),
            }
        }
        (width, "")
    }
}

/// Decode a standalone document into a fresh tree.
pub fn decode(source: &str) -> Result<(Tree, Vec<NodeId>), DomainError> {
    let mut tree = Tree::new();
    let roots = Decoder::new(source).decode_into(&mut tree)?;
    Ok((tree, roots))
}

// ── line parsing ──────────────────────────────────────────────────────────────

struct LineParser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl LineParser {
    fn new(source: &str, line: usize) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line,
        }
    }

    fn error(&self, reason: impl Into<String>) -> DomainError {
        DomainError::Decode {
            line: self.line,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_blank(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Parse the element line. Returns the node and, when a backtick opened
    /// content, the text that followed it on this line.
    fn element(&mut self) -> Result<(Node, Option<String>), DomainError> {
        let (kind, name) = self.pair()?;
        if kind.is_empty() {
            return Err(self.error("missing element kind"));
        }
        let mut node = Node::new(kind).named(name.unwrap_or_default());
        let mut keys = BTreeMap::new();

        loop {
            self.skip_blank();
            match self.peek() {
                None => break,
                Some('`') => {
                    self.pos += 1;
                    let rest: String = self.chars[self.pos..].iter().collect();
                    node.keys = keys;
                    return Ok((node, Some(rest)));
                }
                Some(_) => {
                    let (key, value) = self.pair()?;
                    let Some(value) = value else {
                        return Err(self.error(format!("expected key:value, found '{key}'")));
                    };
                    if key.is_empty() {
                        return Err(self.error("missing key before ':'"));
                    }
                    if keys.insert(key.clone(), value).is_some() {
                        return Err(self.error(format!("duplicate key '{key}'")));
                    }
                }
            }
        }

        node.keys = keys;
        Ok((node, None))
    }

    /// `head[:value]`
    fn pair(&mut self) -> Result<(String, Option<String>), DomainError> {
        let mut head = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == ':' || ch == '`' {
                break;
            }
            head.push(ch);
            self.pos += 1;
        }
        if self.peek() != Some(':') {
            return Ok((head, None));
        }
        self.pos += 1;
        let value = self.value()?;
        Ok((head, Some(value)))
    }

    fn value(&mut self) -> Result<String, DomainError> {
        let value = match self.peek() {
            Some('"') => self.double_quoted()?,
            Some('\'') => self.single_quoted()?,
            _ => {
                let mut out = String::new();
                while let Some(ch) = self.peek() {
                    if ch.is_whitespace() || ch == '`' {
                        break;
                    }
                    out.push(ch);
                    self.pos += 1;
                }
                return Ok(out);
            }
        };
        match self.peek() {
            None => Ok(value),
            Some(ch) if ch.is_whitespace() || ch == '`' => Ok(value),
            Some(ch) => Err(self.error(format!("unexpected '{ch}' after quoted value"))),
        }
    }

    fn double_quoted(&mut self) -> Result<String, DomainError> {
        self.pos += 1;
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            self.pos += 1;
            match ch {
                '"' => return Ok(out),
                '\\' => {
                    let escaped = self
                        .peek()
                        .ok_or_else(|| self.error("unterminated escape in quoted value"))?;
                    self.pos += 1;
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                }
                other => out.push(other),
            }
        }
        Err(self.error("unterminated quoted value"))
    }

    fn single_quoted(&mut self) -> Result<String, DomainError> {
        self.pos += 1;
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            self.pos += 1;
            if ch == '\'' {
                return Ok(out);
            }
            out.push(ch);
        }
        Err(self.error("unterminated quoted value"))
    }
}

/// Collect backtick content starting with the text after the opening
/// backtick. Returns the content and the number of extra lines consumed.
fn read_content(
    first: String,
    following: &[&str],
    line: usize,
) -> Result<(String, usize), DomainError> {
    if let Some(end) = first.find('`') {
        ensure_closed(&first[end + 1..], line)?;
        return Ok((first[..end].to_string(), 0));
    }

    let mut pieces: Vec<String> = Vec::new();
    for (offset, text) in following.iter().enumerate() {
        if let Some(end) = text.find('`') {
            ensure_closed(&text[end + 1..], line + offset + 1)?;
            pieces.push(text[..end].to_string());

            let mut lines = vec![first.clone()];
            lines.extend(dedent(&pieces));
            if lines[0].trim().is_empty() {
                lines.remove(0);
            }
            return Ok((lines.join("\n"), offset + 1));
        }
        pieces.push((*text).to_string());
    }

    Err(DomainError::Decode {
        line,
        reason: "unterminated content: missing closing '`'".into(),
    })
}

fn ensure_closed(rest: &str, line: usize) -> Result<(), DomainError> {
    if rest.trim().is_empty() {
        Ok(())
    } else {
        Err(DomainError::Decode {
            line,
            reason: format!("unexpected text after content: '{}'", rest.trim()),
        })
    }
}

/// Strip the indentation shared by every non-blank line.
fn dedent(lines: &[String]) -> Vec<String> {
    let common = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l[common..].to_string()
            }
        })
        .collect()
}

// ── encoding ──────────────────────────────────────────────────────────────────

const INDENT: &str = "    ";

impl Tree {
    /// Write the sub-tree rooted at `id` back out as a brief document.
    pub fn encode(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.encode_node(&mut out, id, 0);
        out
    }

    fn encode_node(&self, out: &mut String, id: NodeId, depth: usize) {
        let node = self.get(id);
        let pad = INDENT.repeat(depth);
        out.push_str(&pad);
        out.push_str(node.kind.as_str());
        if !node.name.is_empty() {
            let _ = write!(out, ":{}", quote(&node.name));
        }
        for (key, value) in &node.keys {
            let _ = write!(out, " {key}:{}", quote(value));
        }
        if !node.content.is_empty() {
            if node.content.contains('\n') {
                let inner = INDENT.repeat(depth + 1);
                out.push_str(" `\n");
                let trailing = node.content.ends_with('\n');
                let body = node.content.strip_suffix('\n').unwrap_or(&node.content);
                let lines: Vec<&str> = body.split('\n').collect();
                for (i, line) in lines.iter().enumerate() {
                    if !line.is_empty() {
                        out.push_str(&inner);
                        out.push_str(line);
                    }
                    if i + 1 < lines.len() {
                        out.push('\n');
                    }
                }
                if trailing {
                    out.push('\n');
                    out.push_str(&pad);
                }
                out.push('`');
            } else {
                let _ = write!(out, " `{}`", node.content);
            }
        }
        out.push('\n');
        for child in self.children(id) {
            self.encode_node(out, *child, depth + 1);
        }
    }
}

fn quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '`'));
    if !needs_quotes {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn nests_by_indentation() {
        let (tree, roots) = decode(
            "brevity\n    project:demo\n        cli:cobra\n            command:serve\n        readme\n",
        )
        .unwrap();
        assert_eq!(roots.len(), 1);
        let project = tree.children(roots[0])[0];
        assert_eq!(tree.get(project).label(), "project:demo");
        let sections: Vec<_> = tree
            .children(project)
            .iter()
            .map(|id| tree.get(*id).kind.to_string())
            .collect();
        assert_eq!(sections, vec!["cli", "readme"]);
        let cli = tree.children(project)[0];
        assert_eq!(tree.get(tree.children(cli)[0]).name, "serve");
        assert_eq!(tree.parent(cli), Some(project));
    }

    #[test]
    fn parses_bare_and_quoted_keys() {
        let (tree, roots) =
            decode(r#"template:main element:cli file:"cmd/{{name}}/main.go" note:'a "b"' url:http://x"#)
                .unwrap();
        let node = tree.get(roots[0]);
        assert_eq!(node.name, "main");
        assert_eq!(node.key("element"), Some("cli"));
        assert_eq!(node.key("file"), Some("cmd/{{name}}/main.go"));
        assert_eq!(node.key("note"), Some(r#"a "b""#));
        assert_eq!(node.key("url"), Some("http://x"));
    }

    #[test]
    fn escapes_in_double_quotes() {
        let (tree, roots) = decode(r#"a exec:"echo \"hi\"\tthere""#).unwrap();
        assert_eq!(tree.get(roots[0]).key("exec"), Some("echo \"hi\"\tthere"));
    }

    #[test]
    fn inline_content() {
        let (tree, roots) = decode("define:greeting `hello {{name}}`").unwrap();
        assert_eq!(tree.get(roots[0]).content, "hello {{name}}");
    }

    #[test]
    fn multi_line_content_is_dedented() {
        let source = "definitions\n    define:main `\n        package main\n\n          func main() {}\n    `\n    define:other `x`\n";
        let (tree, roots) = decode(source).unwrap();
        let defs = tree.children(roots[0]);
        assert_eq!(defs.len(), 2);
        assert_eq!(
            tree.get(defs[0]).content,
            "package main\n\n  func main() {}\n"
        );
        assert_eq!(tree.get(defs[1]).content, "x");
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let (tree, roots) = decode("# header\n\nroot\n    # inner\n    child\n").unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(tree.children(roots[0]).len(), 1);
    }

    #[test]
    fn tabs_count_as_tab_size() {
        let (tree, roots) = decode("root\n\tchild\n    sibling\n").unwrap();
        assert_eq!(tree.children(roots[0]).len(), 2);
    }

    #[test]
    fn padding_offsets_recorded_indent() {
        let mut tree = Tree::new();
        let roots = Decoder::new("a\n    b\n")
            .padding(8)
            .decode_into(&mut tree)
            .unwrap();
        assert_eq!(tree.get(roots[0]).indent, 8);
        assert_eq!(tree.get(tree.children(roots[0])[0]).indent, 12);
    }

    #[test]
    fn reports_line_of_bad_token() {
        let err = decode("root\n    child orphan\n").unwrap_err();
        assert_eq!(
            err,
            DomainError::Decode {
                line: 2,
                reason: "expected key:value, found 'orphan'".into()
            }
        );
    }

    #[test]
    fn rejects_unterminated_content_and_quotes() {
        assert!(matches!(
            decode("a `never closed\nb\n"),
            Err(DomainError::Decode { line: 1, .. })
        ));
        assert!(matches!(
            decode("a k:\"open\n"),
            Err(DomainError::Decode { line: 1, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = decode("a k:1 k:2").unwrap_err();
        assert!(err.to_string().contains("duplicate key 'k'"));
    }

    #[test]
    fn encode_reads_back_identically() {
        let source = "project:demo\n    cli:cobra module:\"my module\" x:1\n        command:serve\n    readme `\n        # Demo\n        text\n    `\n";
        let (tree, roots) = decode(source).unwrap();
        let encoded = tree.encode(roots[0]);
        assert_eq!(encoded, source);

        let (again, roots) = decode(&encoded).unwrap();
        assert_eq!(again.encode(roots[0]), source);
    }
}
