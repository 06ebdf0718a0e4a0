use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    TextLiteral,
    NumberLiteral,
    Variable,
    And,
    Or,
    Not,
    Equals,
    NotEquals,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    StringConcat,
    Range,
    If,
    While,
    For,
    VariableAssign,
    Print,
    ImportList,
    Comment,
    BlankLine,
}

impl BlockKind {
    pub fn parse(tag: &str) -> Option<Self> {
        let kind = match tag {
            "text" => BlockKind::TextLiteral,
            "number" => BlockKind::NumberLiteral,
            "variable" => BlockKind::Variable,
            "and" => BlockKind::And,
            "or" => BlockKind::Or,
            "not" => BlockKind::Not,
            "equals" => BlockKind::Equals,
            "notEquals" => BlockKind::NotEquals,
            "less" => BlockKind::Less,
            "lessEqual" => BlockKind::LessEqual,
            "greater" => BlockKind::Greater,
            "greaterEqual" => BlockKind::GreaterEqual,
            "stringConcat" => BlockKind::StringConcat,
            "range" => BlockKind::Range,
            "if" => BlockKind::If,
            "while" => BlockKind::While,
            "for" => BlockKind::For,
            "variableAssign" => BlockKind::VariableAssign,
            "print" => BlockKind::Print,
            "importList" => BlockKind::ImportList,
            "comment" => BlockKind::Comment,
            "blankLine" => BlockKind::BlankLine,
            _ => return None,
        };
        Some(kind)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::TextLiteral => "text",
            BlockKind::NumberLiteral => "number",
            BlockKind::Variable => "variable",
            BlockKind::And => "and",
            BlockKind::Or => "or",
            BlockKind::Not => "not",
            BlockKind::Equals => "equals",
            BlockKind::NotEquals => "notEquals",
            BlockKind::Less => "less",
            BlockKind::LessEqual => "lessEqual",
            BlockKind::Greater => "greater",
            BlockKind::GreaterEqual => "greaterEqual",
            BlockKind::StringConcat => "stringConcat",
            BlockKind::Range => "range",
            BlockKind::If => "if",
            BlockKind::While => "while",
            BlockKind::For => "for",
            BlockKind::VariableAssign => "variableAssign",
            BlockKind::Print => "print",
            BlockKind::ImportList => "importList",
            BlockKind::Comment => "comment",
            BlockKind::BlankLine => "blankLine",
        }
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            BlockKind::If
                | BlockKind::While
                | BlockKind::For
                | BlockKind::VariableAssign
                | BlockKind::Print
                | BlockKind::ImportList
                | BlockKind::Comment
                | BlockKind::BlankLine
        )
    }

    fn line_slot_prefix(&self) -> &'static str {
        match self {
            BlockKind::ImportList => "NAME",
            _ => "LINE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlockNode {
    pub kind: BlockKind,
    values: BTreeMap<String, BlockNode>,
    statements: BTreeMap<String, Vec<BlockNode>>,
    fields: BTreeMap<String, String>,
    elif_count: usize,
    has_else: bool,
    parameter_count: usize,
    has_end_parameter: bool,
    line_slots: Vec<String>,
}

impl BlockNode {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            values: BTreeMap::new(),
            statements: BTreeMap::new(),
            fields: BTreeMap::new(),
            elif_count: 0,
            has_else: false,
            parameter_count: 0,
            has_end_parameter: false,
            line_slots: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn with_value(mut self, slot: &str, child: BlockNode) -> Self {
        self.set_value(slot, child);
        self
    }

    pub fn with_statements(mut self, slot: &str, blocks: Vec<BlockNode>) -> Self {
        self.set_statements(slot, blocks);
        self
    }

    pub fn set_field(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn set_value(&mut self, slot: &str, child: BlockNode) {
        self.values.insert(slot.to_string(), child);
    }

    pub fn value(&self, slot: &str) -> Option<&BlockNode> {
        self.values.get(slot)
    }

    pub fn set_statements(&mut self, slot: &str, blocks: Vec<BlockNode>) {
        self.statements.insert(slot.to_string(), blocks);
    }

    pub fn push_statement(&mut self, slot: &str, block: BlockNode) {
        self.statements
            .entry(slot.to_string())
            .or_default()
            .push(block);
    }

    pub fn statements(&self, slot: &str) -> &[BlockNode] {
        self.statements.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn elif_count(&self) -> usize {
        self.elif_count
    }

    pub fn has_else(&self) -> bool {
        self.has_else
    }

    pub fn set_has_else(&mut self, has_else: bool) {
        self.has_else = has_else;
    }

    // Adds one elif clause; the host fills slots IF{n} and DO{n} afterwards.
    pub fn add_elif(&mut self) -> usize {
        self.elif_count += 1;
        self.elif_count
    }

    pub fn remove_elif(&mut self) {
        if self.elif_count == 0 {
            return;
        }
        let index = self.elif_count;
        self.values.remove(&format!("IF{}", index));
        self.statements.remove(&format!("DO{}", index));
        self.elif_count -= 1;
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    pub fn has_end_parameter(&self) -> bool {
        self.has_end_parameter
    }

    pub fn set_has_end_parameter(&mut self, has_end: bool) {
        self.has_end_parameter = has_end;
        if !has_end {
            self.values.remove("END");
        }
    }

    pub fn add_parameter(&mut self) -> String {
        self.parameter_count += 1;
        format!("ARG{}", self.parameter_count)
    }

    pub fn remove_parameter(&mut self) {
        if self.parameter_count == 0 {
            return;
        }
        self.values.remove(&format!("ARG{}", self.parameter_count));
        self.parameter_count -= 1;
    }

    pub fn line_count(&self) -> usize {
        self.line_slots.len()
    }

    pub fn add_line(&mut self) -> String {
        let slot = format!("{}{}", self.kind.line_slot_prefix(), self.line_slots.len());
        self.fields.entry(slot.clone()).or_default();
        self.line_slots.push(slot.clone());
        slot
    }

    pub fn remove_line(&mut self) -> Option<String> {
        let slot = self.line_slots.pop()?;
        self.fields.remove(&slot)
    }

    pub fn push_line(&mut self, text: &str) {
        let slot = self.add_line();
        self.set_field(&slot, text);
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.line_slots
            .iter()
            .map(|slot| self.field(slot).unwrap_or(""))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub blocks: Vec<BlockNode>,
}

impl Workspace {
    pub fn new(blocks: Vec<BlockNode>) -> Self {
        Self { blocks }
    }
}
