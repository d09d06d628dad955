// ===================================================================
// FILE: lowering.rs (tern-ir crate)
//
// DESC: The IR generator. Walks an already validated syntax tree and
//       emits the flat instruction list, minting temporaries from a
//       single counter shared by the whole pass.
// ===================================================================

use tern_ast::{Node, Program};

use crate::*;

/// Main entry point for lowering a program to IR
pub fn lower_program(program: &Program) -> Result<Vec<Instruction>, LoweringError> {
    let mut generator = IrGenerator::new();
    generator.lower_program(program)?;
    Ok(generator.finish())
}

#[derive(Debug, Default)]
pub struct IrGenerator {
    instructions: Vec<Instruction>,
    /// Next temporary number. Never reset, never reused.
    next_temp: usize,
}

impl IrGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lower_program(&mut self, program: &Program) -> Result<(), LoweringError> {
        for item in &program.items {
            self.lower_node(item)?;
        }
        tracing::debug!(
            instructions = self.instructions.len(),
            temporaries = self.next_temp,
            "lowered program"
        );
        Ok(())
    }

    /// Lower one statement-level node.
    pub fn lower_node(&mut self, node: &Node) -> Result<(), LoweringError> {
        match node {
            // Standalone expression statements: the loaded value is discarded.
            Node::Number(_) | Node::Boolean(_) | Node::Identifier(_) => {
                self.lower_operand(node)?;
            }
            Node::BinaryOp { op, left, right } => {
                self.lower_binary(op, left, right)?;
            }
            Node::Let { target, value } => {
                let name = binding_name(target)?;
                let value = self.lower_value(value)?;
                self.emit(Instruction::alloca(name));
                self.emit(Instruction::store(name, &value));
            }
            Node::Assignment { target, value } => {
                let name = binding_name(target)?;
                let value = self.lower_value(value)?;
                self.emit(Instruction::store(name, &value));
            }
            Node::Function { name, body, .. } => {
                tracing::trace!(function = *name, "lowering function");
                for statement in body {
                    self.lower_node(statement)?;
                }
                self.emit(Instruction::ret());
            }
        }
        Ok(())
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn finish(self) -> Vec<Instruction> {
        self.instructions
    }

    fn new_temp(&mut self) -> String {
        let temp = format!("t{}", self.next_temp);
        self.next_temp += 1;
        temp
    }

    fn emit(&mut self, instruction: Instruction) {
        tracing::trace!(%instruction, "emit");
        self.instructions.push(instruction);
    }

    /// The value of a declaration's right-hand side
    fn lower_value(&mut self, value: &Node) -> Result<String, LoweringError> {
        match value {
            Node::BinaryOp { op, left, right } => self.lower_binary(op, left, right),
            _ => self.lower_operand(value),
        }
    }

    /// Load a literal or identifier into a fresh temporary.
    ///
    /// Does not recurse: a nested expression is rejected rather than flattened.
    fn lower_operand(&mut self, node: &Node) -> Result<String, LoweringError> {
        let source = match node {
            Node::Number(value) => value.to_string(),
            Node::Boolean(value) => (if *value { "true" } else { "false" }).to_string(),
            Node::Identifier(name) => name.to_string(),
            other => return Err(LoweringError::UnsupportedOperand { kind: other.kind() }),
        };
        let temp = self.new_temp();
        self.emit(Instruction::load(&temp, &source));
        Ok(temp)
    }

    fn lower_binary(&mut self, op: &str, left: &Node, right: &Node) -> Result<String, LoweringError> {
        let lhs = self.lower_operand(left)?;
        let rhs = self.lower_operand(right)?;
        let result = self.new_temp();
        let opcode = Opcode::from_operator(op)?;
        self.emit(Instruction::binary(opcode, &result, &lhs, &rhs));
        Ok(result)
    }
}

fn binding_name<'a>(target: &Node<'a>) -> Result<&'a str, LoweringError> {
    target
        .as_identifier()
        .ok_or(LoweringError::UnsupportedOperand { kind: target.kind() })
}
