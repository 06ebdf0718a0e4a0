use crate::block::{BlockKind, BlockNode, Workspace};
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use xmltree::{Element, XMLNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceFormat {
    Xml,
    Json,
}

impl WorkspaceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xml" => Some(WorkspaceFormat::Xml),
            "json" => Some(WorkspaceFormat::Json),
            _ => None,
        }
    }

    fn sniff(source: &str) -> Self {
        match source.trim_start().chars().next() {
            Some('{') | Some('[') => WorkspaceFormat::Json,
            _ => WorkspaceFormat::Xml,
        }
    }
}

pub fn load_workspace_file(path: &Path, format: Option<WorkspaceFormat>) -> Result<Workspace> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read workspace file '{}'.", path.display()))?;
    let format = format
        .or_else(|| WorkspaceFormat::from_path(path))
        .unwrap_or_else(|| WorkspaceFormat::sniff(&source));
    match format {
        WorkspaceFormat::Xml => parse_xml_workspace(&source),
        WorkspaceFormat::Json => parse_json_workspace(&source),
    }
}

pub fn parse_xml_workspace(source: &str) -> Result<Workspace> {
    let root = Element::parse(source.as_bytes())
        .map_err(|e| anyhow!("Workspace is not valid XML: {}.", e))?;
    let mut blocks = Vec::new();
    if root.name == "block" {
        blocks.extend(xml_block_chain(&root));
    } else {
        for child in child_elements(&root) {
            if child.name == "block" {
                blocks.extend(xml_block_chain(child));
            }
        }
    }
    Ok(Workspace::new(blocks))
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(XMLNode::as_element)
}

fn xml_block_chain(head: &Element) -> Vec<BlockNode> {
    let mut out = Vec::new();
    let mut current = Some(head);
    while let Some(element) = current {
        let (node, next) = xml_block(element);
        out.push(node);
        current = next;
    }
    out
}

fn xml_block(element: &Element) -> (BlockNode, Option<&Element>) {
    let next = element
        .get_child("next")
        .and_then(|wrapper| child_elements(wrapper).find(|c| c.name == "block"));
    let tag = element
        .attributes
        .get("type")
        .map(String::as_str)
        .unwrap_or("");
    let Some(kind) = BlockKind::parse(tag) else {
        return (unsupported_block(tag), next);
    };

    let mut node = BlockNode::new(kind);
    if let Some(mutation) = element.get_child("mutation") {
        apply_xml_mutation(&mut node, mutation);
    }
    for child in child_elements(element) {
        let slot = child
            .attributes
            .get("name")
            .map(String::as_str)
            .unwrap_or("");
        match child.name.as_str() {
            "field" => {
                let text = child.get_text().map(|t| t.into_owned()).unwrap_or_default();
                node.set_field(slot, &text);
            }
            "value" => {
                if let Some(inner) = child_elements(child).find(|c| c.name == "block") {
                    let (value_node, _) = xml_block(inner);
                    node.set_value(slot, value_node);
                }
            }
            "statement" => {
                if let Some(inner) = child_elements(child).find(|c| c.name == "block") {
                    node.set_statements(slot, xml_block_chain(inner));
                }
            }
            _ => {}
        }
    }
    (node, next)
}

fn apply_xml_mutation(node: &mut BlockNode, mutation: &Element) {
    for _ in 0..attr_usize(mutation, "elifCount") {
        node.add_elif();
    }
    if attr_bool(mutation, "hasElse") {
        node.set_has_else(true);
    }
    for _ in 0..attr_usize(mutation, "parameterCount") {
        node.add_parameter();
    }
    if attr_bool(mutation, "hasEndParameter") {
        node.set_has_end_parameter(true);
    }
    for _ in 0..attr_usize(mutation, "lineCount") {
        node.add_line();
    }
}

fn attr_usize(element: &Element, name: &str) -> usize {
    element
        .attributes
        .get(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0)
}

fn attr_bool(element: &Element, name: &str) -> bool {
    element
        .attributes
        .get(name)
        .map(|v| {
            let v = v.trim();
            v.eq_ignore_ascii_case("true") || v == "1"
        })
        .unwrap_or(false)
}

pub fn parse_json_workspace(source: &str) -> Result<Workspace> {
    let doc: Value =
        serde_json::from_str(source).map_err(|e| anyhow!("Workspace is not valid JSON: {}.", e))?;
    let blocks_val = doc
        .get("blocks")
        .ok_or_else(|| anyhow!("Workspace JSON is missing the 'blocks' array."))?;
    let top = blocks_val
        .as_array()
        .or_else(|| blocks_val.get("blocks").and_then(Value::as_array))
        .ok_or_else(|| anyhow!("Workspace JSON 'blocks' is not an array."))?;

    let mut blocks = Vec::new();
    for entry in top {
        blocks.extend(json_block_chain(entry));
    }
    Ok(Workspace::new(blocks))
}

fn json_block_chain(head: &Value) -> Vec<BlockNode> {
    let mut out = Vec::new();
    let mut current = Some(head);
    while let Some(value) = current {
        let (node, next) = json_block(value);
        out.push(node);
        current = next;
    }
    out
}

fn json_block(value: &Value) -> (BlockNode, Option<&Value>) {
    let next = value.get("next").and_then(|n| n.get("block"));
    let tag = value.get("type").and_then(Value::as_str).unwrap_or("");
    let Some(kind) = BlockKind::parse(tag) else {
        return (unsupported_block(tag), next);
    };

    let mut node = BlockNode::new(kind);
    if let Some(state) = value.get("extraState") {
        apply_json_state(&mut node, state);
    }
    if let Some(fields) = value.get("fields").and_then(Value::as_object) {
        for (name, field_value) in fields {
            node.set_field(name, &json_field_text(field_value));
        }
    }
    if let Some(inputs) = value.get("inputs").and_then(Value::as_object) {
        for (slot, input) in inputs {
            if let Some(child) = input.get("block") {
                let (child_node, _) = json_block(child);
                node.set_value(slot, child_node);
            }
        }
    }
    if let Some(statements) = value.get("statements").and_then(Value::as_object) {
        for (slot, input) in statements {
            if let Some(list) = input.as_array() {
                let mut chain = Vec::new();
                for entry in list {
                    let (child_node, _) = json_block(entry);
                    chain.push(child_node);
                }
                node.set_statements(slot, chain);
            } else if let Some(child) = input.get("block") {
                node.set_statements(slot, json_block_chain(child));
            }
        }
    }
    (node, next)
}

fn apply_json_state(node: &mut BlockNode, state: &Value) {
    for _ in 0..state_usize(state, "elifCount") {
        node.add_elif();
    }
    if state_bool(state, "hasElse") {
        node.set_has_else(true);
    }
    for _ in 0..state_usize(state, "parameterCount") {
        node.add_parameter();
    }
    if state_bool(state, "hasEndParameter") {
        node.set_has_end_parameter(true);
    }
    for _ in 0..state_usize(state, "lineCount") {
        node.add_line();
    }
}

fn state_usize(state: &Value, name: &str) -> usize {
    state
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(0)
}

fn state_bool(state: &Value, name: &str) -> bool {
    state.get(name).and_then(Value::as_bool).unwrap_or(false)
}

fn json_field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn unsupported_block(tag: &str) -> BlockNode {
    let mut node = BlockNode::new(BlockKind::Comment);
    if tag.is_empty() {
        node.push_line("unsupported block");
    } else {
        node.push_line(&format!("unsupported block type: {}", tag));
    }
    node
}
