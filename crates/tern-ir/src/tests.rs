// ===================================================================
// FILE: tests.rs (tern-ir crate)
//
// DESC: Tests for the IR lowering module, covering declarations,
//       functions, temporaries and the unsupported shapes.
// ===================================================================

use crate::*;
use tern_ast::{Node, NodeKind, Program};
use tern_parser::parse_program;

fn lower_source(source: &str) -> Vec<Instruction> {
    let program = parse_program(source).unwrap();
    lower_program(&program).unwrap()
}

fn render(instructions: &[Instruction]) -> Vec<String> {
    instructions.iter().map(|i| i.to_string()).collect()
}

#[test]
fn test_lower_let_with_addition() {
    let ir = lower_source("let x = 3 + 4");
    assert_eq!(
        ir,
        vec![
            Instruction::load("t0", "3"),
            Instruction::load("t1", "4"),
            Instruction::binary(Opcode::Add, "t2", "t0", "t1"),
            Instruction::alloca("x"),
            Instruction::store("x", "t2"),
        ]
    );
}

#[test]
fn test_number_operand_uses_decimal_text() {
    for n in [0, 7, 42, 2147483647, -5, i32::MIN] {
        let program = Program {
            items: vec![Node::Number(n)],
        };
        let ir = lower_program(&program).unwrap();
        assert_eq!(ir, vec![Instruction::load("t0", &n.to_string())]);
    }
}

#[test]
fn test_operator_mapping() {
    let ir = lower_source("a - b c * d e / f");
    let opcodes: Vec<_> = ir
        .iter()
        .filter(|i| i.opcode != Opcode::Load)
        .map(|i| i.opcode)
        .collect();
    assert_eq!(opcodes, vec![Opcode::Sub, Opcode::Mul, Opcode::Div]);
}

#[test]
fn test_let_from_literal_and_identifier() {
    assert_eq!(
        render(&lower_source("let flag = True let y = flag")),
        vec![
            "Load t0, true",
            "Alloca flag",
            "Store flag, t0",
            "Load t1, flag",
            "Alloca y",
            "Store y, t1",
        ]
    );
}

#[test]
fn test_function_body_then_return() {
    assert_eq!(
        render(&lower_source("def f(a) { let b = a * 2 a }")),
        vec![
            "Load t0, a",
            "Load t1, 2",
            "Mul t2, t0, t1",
            "Alloca b",
            "Store b, t2",
            "Load t3, a",
            "Return",
        ]
    );
}

#[test]
fn test_temporaries_shared_across_functions() {
    let ir = lower_source("def f() { 1 } def g() { 2 }");
    assert_eq!(
        ir,
        vec![
            Instruction::load("t0", "1"),
            Instruction::ret(),
            Instruction::load("t1", "2"),
            Instruction::ret(),
        ]
    );
}

#[test]
fn test_assignment_stores_without_alloca() {
    assert_eq!(
        render(&lower_source("let x = 1 x = x + 1")),
        vec![
            "Load t0, 1",
            "Alloca x",
            "Store x, t0",
            "Load t1, x",
            "Load t2, 1",
            "Add t3, t1, t2",
            "Store x, t3",
        ]
    );
}

#[test]
fn test_standalone_boolean_is_loaded() {
    assert_eq!(render(&lower_source("False")), vec!["Load t0, false"]);
}

#[test]
fn test_unsupported_operator() {
    let program = Program {
        items: vec![Node::binary("%", Node::Number(1), Node::Number(2))],
    };
    assert_eq!(
        lower_program(&program),
        Err(LoweringError::UnsupportedOperator("%".to_string()))
    );
}

#[test]
fn test_nested_expression_not_flattened() {
    let program = parse_program("let x = 1 + 2 * 3").unwrap();
    assert_eq!(
        lower_program(&program),
        Err(LoweringError::UnsupportedOperand {
            kind: NodeKind::BinaryOp
        })
    );
}

#[test]
fn test_every_temporary_defined_before_use() {
    let ir = lower_source("let a = 1 let b = a + 2 def f(p) { let c = p / b c } let d = b - a");
    let mut defined = std::collections::HashSet::new();
    for instruction in &ir {
        let sources = [Some(instruction.src1.as_str()), instruction.src2.as_deref()];
        for source in sources.into_iter().flatten() {
            if source.starts_with('t') && source[1..].parse::<usize>().is_ok() {
                assert!(defined.contains(source), "{} used before definition", source);
            }
        }
        if instruction.dest.starts_with('t') {
            assert!(defined.insert(instruction.dest.clone()), "temporary reused");
        }
    }
}

#[test]
fn test_display_and_json() {
    let instruction = Instruction::binary(Opcode::Div, "t2", "t0", "t1");
    assert_eq!(instruction.to_string(), "Div t2, t0, t1");
    assert_eq!(Instruction::ret().to_string(), "Return");

    let json = serde_json::to_value([Instruction::alloca("x")]).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{ "opcode": "Alloca", "dest": "x", "src1": "", "src2": null }])
    );
}

#[test]
fn test_opcode_names() {
    let names: Vec<String> = [
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Load,
        Opcode::Store,
        Opcode::Alloca,
        Opcode::Return,
    ]
    .iter()
    .map(|opcode| opcode.to_string())
    .collect();
    assert_eq!(
        names,
        vec!["Add", "Sub", "Mul", "Div", "Load", "Store", "Alloca", "Return"]
    );

    let json = serde_json::to_value(Instruction::binary(Opcode::Mul, "t2", "t0", "t1")).unwrap();
    assert_eq!(json["opcode"], "Mul");
    assert_eq!(json["src2"], "t1");
}
