use crate::block::{BlockKind, BlockNode, Workspace};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Logical,
    Comparison,
    Unary,
    Atomic,
}

#[derive(Debug, Clone)]
pub struct Fragment {
    pub text: String,
    pub precedence: Precedence,
}

impl Fragment {
    fn new(text: String, precedence: Precedence) -> Self {
        Self { text, precedence }
    }

    fn atomic(text: String) -> Self {
        Self::new(text, Precedence::Atomic)
    }

    fn empty() -> Self {
        Self::new(String::new(), Precedence::None)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EmitOptions {
    pub indent_width: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

struct BinarySpec {
    token: &'static str,
    precedence: Precedence,
}

// The token is always spelled out here, never derived from the kind name.
fn binary_spec(kind: BlockKind) -> Option<BinarySpec> {
    let spec = match kind {
        BlockKind::And => BinarySpec {
            token: "and",
            precedence: Precedence::Logical,
        },
        BlockKind::Or => BinarySpec {
            token: "or",
            precedence: Precedence::Logical,
        },
        BlockKind::Equals => BinarySpec {
            token: "==",
            precedence: Precedence::Comparison,
        },
        BlockKind::NotEquals => BinarySpec {
            token: "!=",
            precedence: Precedence::Comparison,
        },
        BlockKind::Less => BinarySpec {
            token: "<",
            precedence: Precedence::Comparison,
        },
        BlockKind::LessEqual => BinarySpec {
            token: "<=",
            precedence: Precedence::Comparison,
        },
        BlockKind::Greater => BinarySpec {
            token: ">",
            precedence: Precedence::Comparison,
        },
        BlockKind::GreaterEqual => BinarySpec {
            token: ">=",
            precedence: Precedence::Comparison,
        },
        BlockKind::StringConcat => BinarySpec {
            token: "+",
            precedence: Precedence::Atomic,
        },
        _ => return None,
    };
    Some(spec)
}

pub fn emit(root: &BlockNode) -> String {
    emit_stmt(root, EmitOptions::default())
}

pub fn emit_stmt(root: &BlockNode, options: EmitOptions) -> String {
    join_lines(emit_lines(root, 0, options))
}

pub fn emit_workspace(workspace: &Workspace, options: EmitOptions) -> String {
    let mut lines = Vec::new();
    for block in &workspace.blocks {
        lines.extend(emit_lines(block, 0, options));
    }
    join_lines(lines)
}

pub fn emit_expr(node: &BlockNode) -> Fragment {
    match node.kind {
        BlockKind::TextLiteral => Fragment::atomic(quote_py(node.field("TEXT").unwrap_or(""))),
        BlockKind::NumberLiteral => Fragment::atomic(number_text(node.field("NUM"))),
        BlockKind::Variable => {
            Fragment::atomic(sanitize_identifier(node.field("VAR").unwrap_or("")))
        }
        BlockKind::Not => {
            let operand = operand_text(node, "VALUE", Precedence::Unary);
            Fragment::new(format!("not {}", operand), Precedence::Unary)
        }
        BlockKind::Range => {
            let from = operand_text(node, "FROM", Precedence::None);
            let to = operand_text(node, "TO", Precedence::None);
            Fragment::atomic(format!("range({}, {})", from, to))
        }
        kind => match binary_spec(kind) {
            Some(spec) => {
                let left = operand_text(node, "A", spec.precedence);
                let right = operand_text(node, "B", spec.precedence);
                Fragment::new(
                    format!("{} {} {}", left, spec.token, right),
                    spec.precedence,
                )
            }
            // Statement-producing kind wired into a value socket.
            None => Fragment::new(String::new(), Precedence::Atomic),
        },
    }
}

fn operand_text(node: &BlockNode, slot: &str, min: Precedence) -> String {
    let fragment = match node.value(slot) {
        Some(child) => emit_expr(child),
        None => Fragment::empty(),
    };
    if fragment.precedence < min {
        format!("({})", fragment.text)
    } else {
        fragment.text
    }
}

fn emit_lines(node: &BlockNode, indent: usize, options: EmitOptions) -> Vec<String> {
    let pad = spaces(indent * options.indent_width);
    let mut out = Vec::new();
    match node.kind {
        BlockKind::If => {
            out.push(format!("{}if {}:", pad, slot_expr(node, "IF0")));
            out.extend(body_lines(node, "DO0", indent + 1, options));
            for clause in 1..=node.elif_count() {
                out.push(format!(
                    "{}elif {}:",
                    pad,
                    slot_expr(node, &format!("IF{}", clause))
                ));
                out.extend(body_lines(node, &format!("DO{}", clause), indent + 1, options));
            }
            if node.has_else() {
                out.push(format!("{}else:", pad));
                out.extend(body_lines(node, "ELSE", indent + 1, options));
            }
        }
        BlockKind::While => {
            out.push(format!("{}while {}:", pad, slot_expr(node, "CONDITION")));
            out.extend(body_lines(node, "BODY", indent + 1, options));
        }
        BlockKind::For => {
            out.push(format!(
                "{}for {} in {}:",
                pad,
                slot_expr(node, "VAR"),
                slot_expr(node, "ITERABLE")
            ));
            out.extend(body_lines(node, "BODY", indent + 1, options));
        }
        BlockKind::VariableAssign => {
            out.push(format!(
                "{}{} = {}",
                pad,
                slot_expr(node, "TARGET"),
                slot_expr(node, "VALUE")
            ));
        }
        BlockKind::Print => {
            let mut parts = Vec::new();
            for index in 1..=node.parameter_count() {
                let arg = slot_expr(node, &format!("ARG{}", index));
                if !arg.is_empty() {
                    parts.push(arg);
                }
            }
            if node.has_end_parameter() {
                parts.push(format!("end={}", slot_expr(node, "END")));
            }
            out.push(format!("{}print({})", pad, parts.join(", ")));
        }
        BlockKind::ImportList => {
            for name in node.lines() {
                let name = name.trim();
                if !name.is_empty() {
                    out.push(format!("{}import {}", pad, sanitize_module(name)));
                }
            }
        }
        BlockKind::Comment => {
            for text in node.lines() {
                if text.is_empty() {
                    out.push(format!("{}#", pad));
                } else {
                    out.push(format!("{}# {}", pad, text));
                }
            }
        }
        BlockKind::BlankLine => out.push(String::new()),
        // Expression block wired into a statement socket.
        _ => {
            let fragment = emit_expr(node);
            if !fragment.text.is_empty() {
                out.push(format!("{}{}", pad, fragment.text));
            }
        }
    }
    out
}

fn body_lines(node: &BlockNode, slot: &str, indent: usize, options: EmitOptions) -> Vec<String> {
    let mut lines = Vec::new();
    for block in node.statements(slot) {
        lines.extend(emit_lines(block, indent, options));
    }
    // Python requires a non-empty suite.
    if !lines.iter().any(|line| !line.trim().is_empty()) {
        lines.push(format!("{}pass", spaces(indent * options.indent_width)));
    }
    lines
}

fn slot_expr(node: &BlockNode, slot: &str) -> String {
    node.value(slot)
        .map(|child| emit_expr(child).text)
        .unwrap_or_default()
}

fn join_lines(lines: Vec<String>) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

pub fn quote_py(text: &str) -> String {
    format!(
        "'{}'",
        text.replace('\\', "\\\\")
            .replace('\'', "\\'")
            .replace('\n', "\\n")
    )
}

fn number_text(field: Option<&str>) -> String {
    let raw = field.unwrap_or("").trim();
    let plain = raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if !raw.is_empty() && plain && raw.parse::<f64>().is_ok() {
        raw.to_string()
    } else {
        "0".to_string()
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").expect("identifier pattern is valid"))
}

pub fn sanitize_identifier(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let cleaned = identifier_pattern().replace_all(trimmed, "_").into_owned();
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", cleaned)
    } else {
        cleaned
    }
}

fn sanitize_module(name: &str) -> String {
    name.split('.')
        .filter(|segment| !segment.is_empty())
        .map(sanitize_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

fn spaces(n: usize) -> String {
    " ".repeat(n)
}
