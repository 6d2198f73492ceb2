//! Token-based indenting formatter for function source.

use std::collections::HashSet;

const INDENT: &str = "  ";

const PUNCTUATION: &[char] = &['(', ')', '{', '}', '[', ']', ';', ',', '<', '>', ':', '?', '!'];

/// Reformat function source with one statement per line and two-space indentation.
///
/// Braces always open an indented block. Parentheses, brackets and angle
/// brackets open one too unless they are empty, an arrow function's parameter
/// list, or a generic argument list, which stay on one line.
pub fn format_function_source(code: &str) -> String {
    let tokens = merge_empty_pairs(tokenize(code));
    let arrow_params = arrow_parameter_tokens(&tokens);
    let generics = generic_tokens(&tokens);

    let mut out = LineWriter::default();
    let mut stack: Vec<&str> = Vec::new();

    for (i, tok) in tokens.iter().enumerate() {
        let tok = tok.as_str();
        let next = tokens.get(i + 1).map(String::as_str).unwrap_or_default();

        match tok {
            "(" | "{" | "[" | "<" => {
                out.place(tok, false);
                stack.push(tok);
                if tok == "{" {
                    out.indent += 1;
                    out.new_line();
                } else {
                    let inline = (tok == "(" && arrow_params.contains(&i))
                        || (tok == "<" && generics.contains(&i));
                    let close = closing_for(tok);
                    let closes_immediately =
                        next == close || matches!(next, "()" | "[]" | "<>");
                    if !inline && !closes_immediately {
                        out.indent += 1;
                        out.new_line();
                    }
                }
            }
            ")" | "}" | "]" | ">" => {
                let opening = stack.last().copied();
                let paired = matches!((tok, opening), (")", Some("(")) | ("]", Some("[")) | (">", Some("<")));
                if paired {
                    let inline = (tok == ")" && arrow_params.contains(&i))
                        || (tok == ">" && generics.contains(&i));
                    if !inline {
                        out.dedent();
                        out.new_line();
                    }
                } else if tok == "}" && opening == Some("{") {
                    out.dedent();
                    out.new_line();
                }
                stack.pop();
                out.place(tok, false);
                if tok == "}" {
                    out.new_line();
                }
            }
            ";" => {
                out.place(tok, true);
                out.new_line();
            }
            "," => {
                out.place(tok, true);
                let top = stack.last().copied();
                let inline = (arrow_params.contains(&i) && top == Some("("))
                    || (generics.contains(&i) && top == Some("<"));
                if !inline && matches!(top, Some("{" | "[" | "(" | "<")) {
                    out.new_line();
                }
            }
            _ => out.place(tok, false),
        }
    }

    out.finish()
}

fn closing_for(open: &str) -> &'static str {
    match open {
        "(" => ")",
        "[" => "]",
        "<" => ">",
        _ => "}",
    }
}

fn tokenize(code: &str) -> Vec<String> {
    let chars: Vec<char> = code.split_whitespace().collect::<Vec<_>>().join(" ").chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            tokens.push(trimmed.to_string());
        }
        current.clear();
    };

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '=' && chars.get(i + 1) == Some(&'>') {
            flush(&mut current, &mut tokens);
            tokens.push("=>".to_string());
            i += 2;
            continue;
        }
        if PUNCTUATION.contains(&c) {
            flush(&mut current, &mut tokens);
            tokens.push(c.to_string());
        } else if c.is_whitespace() {
            flush(&mut current, &mut tokens);
        } else {
            current.push(c);
        }
        i += 1;
    }
    flush(&mut current, &mut tokens);
    tokens
}

fn merge_empty_pairs(raw: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter().peekable();
    while let Some(tok) = iter.next() {
        let pairs_with_next = matches!(
            (tok.as_str(), iter.peek().map(String::as_str)),
            ("(", Some(")")) | ("[", Some("]")) | ("{", Some("}")) | ("<", Some(">"))
        );
        if pairs_with_next {
            let close = iter.next().unwrap_or_default();
            merged.push(tok + &close);
        } else {
            merged.push(tok);
        }
    }
    merged
}

fn matching_close(tokens: &[String], open: &str, close: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (j, tok) in tokens.iter().enumerate().skip(start) {
        if tok == open {
            depth += 1;
        } else if tok == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(j);
            }
        }
    }
    None
}

/// Indices of tokens inside `( ... )` lists directly followed by `=>`.
fn arrow_parameter_tokens(tokens: &[String]) -> HashSet<usize> {
    let mut set = HashSet::new();
    for (i, tok) in tokens.iter().enumerate() {
        if tok != "(" {
            continue;
        }
        if let Some(close) = matching_close(tokens, "(", ")", i)
            && tokens.get(close + 1).is_some_and(|t| t == "=>")
        {
            set.extend(i..=close);
        }
    }
    set
}

/// Indices of tokens inside `<...>` lists that follow an identifier.
fn generic_tokens(tokens: &[String]) -> HashSet<usize> {
    let mut set = HashSet::new();
    for i in 1..tokens.len() {
        let is_ident = tokens[i - 1]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        if is_ident
            && tokens[i] == "<"
            && let Some(close) = matching_close(tokens, "<", ">", i)
        {
            set.extend(i..=close);
        }
    }
    set
}

#[derive(Default)]
struct LineWriter {
    lines: Vec<String>,
    line: String,
    indent: usize,
}

impl LineWriter {
    fn place(&mut self, tok: &str, no_space_before: bool) {
        if self.line.trim().is_empty() || no_space_before {
            self.line.push_str(tok);
            return;
        }

        let hugs_previous = matches!(tok, ")" | "," | ";" | ":" | "]" | "." | "}" | ">");
        let last = self.line.chars().last().unwrap_or(' ');
        let after_opener = matches!(last, '(' | '[' | '<');
        let call_or_index =
            matches!(tok, "(" | "[") && (last.is_alphanumeric() || last == '_' || last == '$');
        if !hugs_previous && !after_opener && !call_or_index {
            self.line.push(' ');
        }
        self.line.push_str(tok);
    }

    fn push_line(&mut self) {
        if !self.line.trim().is_empty() {
            self.lines.push(self.line.trim_end().to_string());
        }
        self.line.clear();
    }

    fn new_line(&mut self) {
        self.push_line();
        self.line = INDENT.repeat(self.indent);
    }

    fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    fn finish(mut self) -> String {
        self.push_line();
        self.lines.join("\n").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_with_block_body() {
        let source = "(a, b) => { const sum = a + b; return sum; }";
        insta::assert_snapshot!(format_function_source(source), @r"
        (a, b) => {
          const sum = a + b;
          return sum;
        }
        ");
    }

    #[test]
    fn call_arguments_go_multiline() {
        let source = "() => { setCount(count + 1, true); }";
        insta::assert_snapshot!(format_function_source(source), @r"
        () => {
          setCount(
            count + 1,
            true
          );
        }
        ");
    }

    #[test]
    fn empty_pairs_stay_together() {
        assert_eq!(format_function_source("() => {}"), "() => {}");
    }
}
