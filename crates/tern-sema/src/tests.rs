// ===================================================================
// FILE: tests.rs (tern-sema crate)
//
// DESC: Tests for the scoped symbol table and the semantic analyzer,
//       covering scoping, shadowing and every diagnostic.
// ===================================================================

use crate::*;
use tern_ast::{Node, NodeKind, Program};
use tern_parser::parse_program;

fn analyze_source(source: &str) -> Analysis {
    let program = parse_program(source).unwrap();
    SemanticAnalyzer::new().analyze(&program).unwrap()
}

// --- symbol table ---------------------------------------------------

#[test]
fn test_inner_name_visible_only_while_scope_active() {
    let mut table = SymbolTable::new();
    table.enter_scope();
    table.insert("outer", SymbolKind::Variable, DataType::Int).unwrap();

    table.enter_scope();
    table.insert("inner", SymbolKind::Variable, DataType::Bool).unwrap();
    assert_eq!(table.lookup("inner").unwrap().ty, DataType::Bool);
    assert_eq!(table.lookup("outer").unwrap().ty, DataType::Int);

    table.exit_scope().unwrap();
    assert_eq!(
        table.lookup("inner"),
        Err(SymbolError::NotFound {
            name: "inner".to_string()
        })
    );
    assert!(table.lookup("outer").is_ok());
}

#[test]
fn test_duplicate_in_same_scope_fails() {
    let mut table = SymbolTable::new();
    table.enter_scope();
    table.insert("x", SymbolKind::Variable, DataType::Int).unwrap();
    assert_eq!(
        table.insert("x", SymbolKind::Variable, DataType::Bool),
        Err(SymbolError::DuplicateSymbol {
            name: "x".to_string()
        })
    );
}

#[test]
fn test_shadowing_in_new_scope() {
    let mut table = SymbolTable::new();
    table.enter_scope();
    table.insert("x", SymbolKind::Variable, DataType::Int).unwrap();

    table.enter_scope();
    table.insert("x", SymbolKind::Parameter, DataType::Bool).unwrap();
    assert_eq!(table.lookup("x").unwrap().kind, SymbolKind::Parameter);

    table.exit_scope().unwrap();
    assert_eq!(table.lookup("x").unwrap().kind, SymbolKind::Variable);
}

#[test]
fn test_exit_scope_underflow() {
    let mut table = SymbolTable::new();
    assert_eq!(table.exit_scope(), Err(SymbolError::ScopeUnderflow));

    table.enter_scope();
    assert!(table.exit_scope().is_ok());
    assert_eq!(table.exit_scope(), Err(SymbolError::ScopeUnderflow));
}

#[test]
fn test_insert_without_scope() {
    let mut table = SymbolTable::new();
    assert_eq!(
        table.insert("x", SymbolKind::Variable, DataType::Int),
        Err(SymbolError::ScopeUnderflow)
    );
}

#[test]
fn test_scope_preserves_insertion_order() {
    let mut table = SymbolTable::new();
    table.enter_scope();
    for name in ["c", "a", "b"] {
        table.insert(name, SymbolKind::Variable, DataType::Int).unwrap();
    }
    let names: Vec<_> = table.current_scope().unwrap().keys().cloned().collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn test_data_type_names() {
    assert_eq!(DataType::Int.to_string(), "int");
    assert_eq!(DataType::Bool.to_string(), "bool");
    assert_eq!(DataType::Unknown.to_string(), "unknown");
}

// --- analyzer -------------------------------------------------------

#[test]
fn test_function_with_parameter_is_clean() {
    let program = parse_program("def f(a) { a }").unwrap();
    let mut analyzer = SemanticAnalyzer::new();
    for item in &program.items {
        analyzer.analyze_node(item).unwrap();
    }

    assert!(analyzer.diagnostics().is_empty());
    assert!(analyzer.symbol_table().is_empty());

    let analysis = SemanticAnalyzer::new().analyze(&program).unwrap();
    let scope = analysis.function_scope("f").unwrap();
    let param = &scope["a"];
    assert_eq!(param.kind, SymbolKind::Parameter);
    assert_eq!(param.ty, DataType::Int);
}

#[test]
fn test_function_names_are_not_declared() {
    let analysis = analyze_source("def f(a) { a } def f(b) { b }");
    assert!(analysis.is_ok(), "{:?}", analysis.diagnostics);
    assert!(analysis.globals.is_empty());
    assert_eq!(analysis.functions.len(), 2);

    let analysis = analyze_source("let f = 1 def f(a) { a }");
    assert!(analysis.is_ok(), "{:?}", analysis.diagnostics);
    assert_eq!(analysis.globals["f"].kind, SymbolKind::Variable);

    let analysis = analyze_source("def f(a) { a } f");
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::UndeclaredIdentifier {
            name: "f".to_string()
        }]
    );
}

#[test]
fn test_let_infers_types() {
    let analysis = analyze_source("let a = 1 let b = True let c = a let d = a + 2");
    assert!(analysis.is_ok(), "{:?}", analysis.diagnostics);

    let types: Vec<_> = analysis
        .globals
        .values()
        .map(|symbol| (symbol.name.as_str(), symbol.ty))
        .collect();
    assert_eq!(
        types,
        vec![
            ("a", DataType::Int),
            ("b", DataType::Bool),
            ("c", DataType::Unknown),
            ("d", DataType::Unknown),
        ]
    );
}

#[test]
fn test_undeclared_identifier() {
    let analysis = analyze_source("let x = y + 1");
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::UndeclaredIdentifier {
            name: "y".to_string()
        }]
    );
    // The declaration itself still goes through.
    assert!(analysis.globals.contains_key("x"));
}

#[test]
fn test_let_from_undeclared_identifier_reports_on_each_visit() {
    let analysis = analyze_source("let x = y");
    assert_eq!(analysis.diagnostics.len(), 2);
    assert!(analysis
        .diagnostics
        .iter()
        .all(|d| matches!(d, Diagnostic::UndeclaredIdentifier { name } if name == "y")));
}

#[test]
fn test_nested_binary_operand_rejected() {
    let analysis = analyze_source("let a = 1 let x = a + 2 * 3");
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::InvalidOperand {
            side: Side::Right,
            found: NodeKind::BinaryOp,
        }]
    );
}

#[test]
fn test_boolean_operand_rejected() {
    let analysis = analyze_source("True + 1");
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::InvalidOperand {
            side: Side::Left,
            found: NodeKind::Boolean,
        }]
    );
}

#[test]
fn test_assignment_target_must_be_identifier() {
    let analysis = analyze_source("let x = 1 x = 2");
    assert!(analysis.is_ok());

    let analysis = analyze_source("3 = 4");
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::InvalidAssignmentTarget {
            found: NodeKind::Number
        }]
    );
}

#[test]
fn test_invalid_let_target_skips_declaration() {
    let program = Program {
        items: vec![Node::let_binding(Node::Number(1), Node::Number(2))],
    };
    let analysis = SemanticAnalyzer::new().analyze(&program).unwrap();
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::InvalidLetTarget {
            found: NodeKind::Number
        }]
    );
    assert!(analysis.globals.is_empty());
}

#[test]
fn test_unsupported_declaration_type() {
    let program = Program {
        items: vec![Node::let_binding(
            Node::Identifier("x"),
            Node::function("g", vec![], vec![]),
        )],
    };
    let analysis = SemanticAnalyzer::new().analyze(&program).unwrap();
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::UnsupportedDeclarationType {
            name: "x".to_string(),
            found: NodeKind::Function,
        }]
    );
    assert!(analysis.globals.is_empty());
}

#[test]
fn test_invalid_parameter_closes_scope() {
    let program = Program {
        items: vec![Node::function(
            "f",
            vec![Node::Identifier("a"), Node::Number(3)],
            vec![Node::Identifier("a")],
        )],
    };
    let mut analyzer = SemanticAnalyzer::new();
    analyzer.symbol_table_mut().enter_scope();
    analyzer.analyze_node(&program.items[0]).unwrap();

    assert_eq!(
        analyzer.diagnostics(),
        &[Diagnostic::InvalidParameter {
            function: "f".to_string(),
            found: NodeKind::Number,
        }]
    );
    // Only the scope opened by the test is left.
    assert_eq!(analyzer.symbol_table().depth(), 1);
}

#[test]
fn test_duplicate_declaration_is_recoverable() {
    let analysis = analyze_source("let x = 1 let x = True x");
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::DuplicateSymbol {
            name: "x".to_string()
        }]
    );
    assert_eq!(analysis.globals["x"].ty, DataType::Int);
}

#[test]
fn test_shadowing_parameter_over_global() {
    let analysis = analyze_source("let a = True def f(a) { let b = a }");
    assert!(analysis.is_ok());
    assert_eq!(analysis.globals["a"].kind, SymbolKind::Variable);

    let scope = analysis.function_scope("f").unwrap();
    assert_eq!(scope["a"].kind, SymbolKind::Parameter);
    assert_eq!(scope["b"].ty, DataType::Unknown);
}

#[test]
fn test_function_locals_not_visible_after_function() {
    let analysis = analyze_source("def f() { let local = 1 } local");
    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::UndeclaredIdentifier {
            name: "local".to_string()
        }]
    );
}

#[test]
fn test_let_without_scope_is_fatal() {
    let mut analyzer = SemanticAnalyzer::new();
    let node = Node::let_binding(Node::Identifier("x"), Node::Number(1));
    assert_eq!(analyzer.analyze_node(&node), Err(SymbolError::ScopeUnderflow));
}

#[test]
fn test_diagnostic_messages() {
    let diagnostic = Diagnostic::InvalidOperand {
        side: Side::Left,
        found: NodeKind::BinaryOp,
    };
    assert_eq!(
        diagnostic.to_string(),
        "Left side of binary operator is not a number or identifier (found binary expression)"
    );
    assert_eq!(
        Diagnostic::UndeclaredIdentifier {
            name: "q".to_string()
        }
        .to_string(),
        "identifier 'q' not found"
    );
}
