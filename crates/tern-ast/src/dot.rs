// ===================================================================
// FILE: dot.rs (tern-ast crate)
//
// DESC: Graphviz dump of the syntax tree, for eyeballing what the
//       parser produced (`ternc --emit dot | dot -Tpng`).
// ===================================================================

use std::fmt::Write;

use crate::{Node, Program};

/// Render the program as a `digraph`. Node ids are assigned in
/// pre-order, so the output is stable for a given tree.
pub fn to_dot(program: &Program) -> String {
    let mut writer = DotWriter {
        out: String::from("digraph ast {\n"),
        next_id: 0,
    };
    let root = writer.vertex("program");
    for item in &program.items {
        let child = writer.node(item);
        writer.edge(root, child);
    }
    writer.out.push_str("}\n");
    writer.out
}

struct DotWriter {
    out: String,
    next_id: usize,
}

impl DotWriter {
    fn vertex(&mut self, label: &str) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        let _ = writeln!(self.out, "  node{} [label=\"{}\"];", id, escape(label));
        id
    }

    fn edge(&mut self, from: usize, to: usize) {
        let _ = writeln!(self.out, "  node{} -> node{};", from, to);
    }

    fn node(&mut self, node: &Node) -> usize {
        match node {
            Node::Number(value) => self.vertex(&value.to_string()),
            Node::Boolean(value) => self.vertex(if *value { "true" } else { "false" }),
            Node::Identifier(name) => self.vertex(name),
            Node::BinaryOp { op, left, right } => self.branch(op, &[&**left, &**right]),
            Node::Assignment { target, value } => self.branch("=", &[&**target, &**value]),
            Node::Let { target, value } => self.branch("let", &[&**target, &**value]),
            Node::Function { name, params, body } => {
                let id = self.vertex(&format!("def {}", name));
                for child in params.iter().chain(body) {
                    let child_id = self.node(child);
                    self.edge(id, child_id);
                }
                id
            }
        }
    }

    fn branch(&mut self, label: &str, children: &[&Node]) -> usize {
        let id = self.vertex(label);
        for child in children {
            let child_id = self.node(child);
            self.edge(id, child_id);
        }
        id
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
