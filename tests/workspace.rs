use pyblocks_rs_core::emit::{emit_workspace, EmitOptions};
use pyblocks_rs_core::workspace::{
    load_workspace_file, parse_json_workspace, parse_xml_workspace, WorkspaceFormat,
};
use pyblocks_rs_core::{generate_from_file, generate_from_json, generate_from_xml};

const IF_ELSE_XML: &str = r#"<xml>
  <block type="if">
    <mutation hasElse="true"/>
    <value name="IF0">
      <block type="equals">
        <value name="A">
          <block type="variable"><field name="VAR">x</field></block>
        </value>
        <value name="B">
          <block type="number"><field name="NUM">3</field></block>
        </value>
      </block>
    </value>
    <statement name="DO0">
      <block type="print">
        <mutation parameterCount="1"/>
        <value name="ARG1">
          <block type="text"><field name="TEXT">hi</field></block>
        </value>
        <next>
          <block type="variableAssign">
            <value name="TARGET">
              <block type="variable"><field name="VAR">x</field></block>
            </value>
            <value name="VALUE">
              <block type="number"><field name="NUM">4</field></block>
            </value>
          </block>
        </next>
      </block>
    </statement>
    <statement name="ELSE">
      <block type="print">
        <mutation parameterCount="1"/>
        <value name="ARG1">
          <block type="variable"><field name="VAR">x</field></block>
        </value>
      </block>
    </statement>
  </block>
</xml>"#;

const IF_ELSE_EXPECTED: &str =
    "if x == 3:\n    print('hi')\n    x = 4\nelse:\n    print(x)\n";

#[test]
fn xml_if_else_round_trips_to_python() {
    let workspace = parse_xml_workspace(IF_ELSE_XML).expect("workspace parses");
    assert_eq!(emit_workspace(&workspace, EmitOptions::default()), IF_ELSE_EXPECTED);
}

#[test]
fn xml_top_level_next_chains_in_order() {
    let source = r#"<xml>
  <block type="importList">
    <mutation lineCount="1"/>
    <field name="NAME0">math</field>
    <next>
      <block type="blankLine">
        <next>
          <block type="variableAssign">
            <value name="TARGET">
              <block type="variable"><field name="VAR">x</field></block>
            </value>
            <value name="VALUE">
              <block type="number"><field name="NUM">1</field></block>
            </value>
          </block>
        </next>
      </block>
    </next>
  </block>
</xml>"#;
    assert_eq!(
        generate_from_xml(source).expect("workspace parses"),
        "import math\n\nx = 1\n"
    );
}

#[test]
fn xml_comment_lines_come_from_mutation_slots() {
    let source = r#"<xml>
  <block type="comment">
    <mutation lineCount="2"/>
    <field name="LINE0">setup</field>
    <field name="LINE1">teardown</field>
  </block>
</xml>"#;
    assert_eq!(
        generate_from_xml(source).expect("workspace parses"),
        "# setup\n# teardown\n"
    );
}

#[test]
fn xml_elif_mutation_builds_extra_clauses() {
    let source = r#"<xml>
  <block type="if">
    <mutation elifCount="1"/>
    <value name="IF0">
      <block type="variable"><field name="VAR">a</field></block>
    </value>
    <value name="IF1">
      <block type="variable"><field name="VAR">b</field></block>
    </value>
  </block>
</xml>"#;
    assert_eq!(
        generate_from_xml(source).expect("workspace parses"),
        "if a:\n    pass\nelif b:\n    pass\n"
    );
}

#[test]
fn unknown_xml_block_becomes_placeholder_comment() {
    let source = r#"<xml><block type="mystery"/></xml>"#;
    assert_eq!(
        generate_from_xml(source).expect("workspace parses"),
        "# unsupported block type: mystery\n"
    );
}

#[test]
fn invalid_xml_is_a_hard_error() {
    assert!(parse_xml_workspace("not xml at all").is_err());
}

#[test]
fn json_workspace_round_trips_to_python() {
    let source = r#"{
  "blocks": [
    {
      "type": "while",
      "inputs": {
        "CONDITION": {
          "block": {
            "type": "not",
            "inputs": {
              "VALUE": {
                "block": {
                  "type": "or",
                  "inputs": {
                    "A": {"block": {"type": "variable", "fields": {"VAR": "a"}}},
                    "B": {"block": {"type": "variable", "fields": {"VAR": "b"}}}
                  }
                }
              }
            }
          }
        }
      },
      "statements": {
        "BODY": {
          "block": {
            "type": "print",
            "extraState": {"parameterCount": 1},
            "inputs": {
              "ARG1": {"block": {"type": "number", "fields": {"NUM": 1}}}
            }
          }
        }
      }
    }
  ]
}"#;
    assert_eq!(
        generate_from_json(source).expect("workspace parses"),
        "while not (a or b):\n    print(1)\n"
    );
}

#[test]
fn json_statement_arrays_are_accepted() {
    let source = r#"{
  "blocks": [
    {
      "type": "if",
      "extraState": {"hasElse": true},
      "inputs": {
        "IF0": {"block": {"type": "variable", "fields": {"VAR": "ready"}}}
      },
      "statements": {
        "DO0": [
          {
            "type": "print",
            "extraState": {"parameterCount": 1, "hasEndParameter": true},
            "inputs": {
              "ARG1": {"block": {"type": "text", "fields": {"TEXT": "go"}}},
              "END": {"block": {"type": "text", "fields": {"TEXT": ""}}}
            }
          }
        ],
        "ELSE": []
      }
    }
  ]
}"#;
    assert_eq!(
        generate_from_json(source).expect("workspace parses"),
        "if ready:\n    print('go', end='')\nelse:\n    pass\n"
    );
}

#[test]
fn invalid_json_is_a_hard_error() {
    assert!(parse_json_workspace("{").is_err());
    assert!(parse_json_workspace("{\"targets\": []}").is_err());
}

#[test]
fn file_format_follows_extension() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("program.xml");
    std::fs::write(&path, IF_ELSE_XML).expect("write workspace");

    let workspace = load_workspace_file(&path, None).expect("workspace loads");
    assert_eq!(emit_workspace(&workspace, EmitOptions::default()), IF_ELSE_EXPECTED);
}

#[test]
fn unrecognized_extension_sniffs_content() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("program.workspace");
    std::fs::write(&path, r#"{"blocks": [{"type": "blankLine"}]}"#).expect("write workspace");

    let workspace = load_workspace_file(&path, None).expect("workspace loads");
    assert_eq!(emit_workspace(&workspace, EmitOptions::default()), "\n");
}

#[test]
fn explicit_format_overrides_extension() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("program.xml");
    std::fs::write(&path, r#"{"blocks": [{"type": "blankLine"}]}"#).expect("write workspace");

    assert!(load_workspace_file(&path, Some(WorkspaceFormat::Xml)).is_err());
    let workspace =
        load_workspace_file(&path, Some(WorkspaceFormat::Json)).expect("workspace loads");
    assert_eq!(workspace.blocks.len(), 1);
}

#[test]
fn generate_from_file_applies_options() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("program.xml");
    std::fs::write(
        &path,
        r#"<xml>
  <block type="if">
    <value name="IF0">
      <block type="variable"><field name="VAR">a</field></block>
    </value>
  </block>
</xml>"#,
    )
    .expect("write workspace");

    let options = EmitOptions { indent_width: 2 };
    assert_eq!(
        generate_from_file(&path, None, options).expect("generation succeeds"),
        "if a:\n  pass\n"
    );
}

#[test]
fn missing_file_is_reported() {
    let err = generate_from_file(
        std::path::Path::new("no-such-workspace.xml"),
        None,
        EmitOptions::default(),
    )
    .expect_err("missing file errors");
    assert!(err.to_string().contains("no-such-workspace.xml"));
}
