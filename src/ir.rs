//! Lowering of the AST into linear three-address code.
//!
//! Temporaries (`tN`) and labels (`LN`) are numbered from one shared
//! counter, so a label never reuses a temporary's number.

use std::fmt;

use crate::ast::{Call, For, FuncDef, If, Node, While};
use crate::token::{TokenKind, Value};

/// A generated temporary, printed as `tN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Temp(pub usize);

/// A generated jump target, printed as `LN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(pub usize);

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// One line of intermediate code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `tN = <literal or name>`
    Load { dest: Temp, value: String },
    /// `<name> = tN`
    Store { name: String, source: Temp },
    /// `tN = tA <op> tB`
    Binary {
        dest: Temp,
        left: Temp,
        op: &'static str,
        right: Temp,
    },
    /// `tN = !tA`
    Not { dest: Temp, operand: Temp },
    /// `tN = uminus tA`
    Negate { dest: Temp, operand: Temp },
    /// `if !tN goto LM`
    JumpUnless { condition: Temp, target: Label },
    /// `goto LM`
    Jump(Label),
    /// `LM:`
    Label(Label),
    /// `call <name> tA, tB, ...`
    Call { callee: String, args: Vec<Temp> },
    /// `<name>:`
    Function(String),
    /// `ret`
    Return,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { dest, value } => write!(f, "{dest} = {value}"),
            Self::Store { name, source } => write!(f, "{name} = {source}"),
            Self::Binary {
                dest,
                left,
                op,
                right,
            } => write!(f, "{dest} = {left} {op} {right}"),
            Self::Not { dest, operand } => write!(f, "{dest} = !{operand}"),
            Self::Negate { dest, operand } => write!(f, "{dest} = uminus {operand}"),
            Self::JumpUnless { condition, target } => {
                write!(f, "if !{condition} goto {target}")
            }
            Self::Jump(target) => write!(f, "goto {target}"),
            Self::Label(label) => write!(f, "{label}:"),
            Self::Call { callee, args } => {
                write!(f, "call {callee}")?;
                for (i, arg) in args.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{arg}")?;
                }
                Ok(())
            }
            Self::Function(name) => write!(f, "{name}:"),
            Self::Return => write!(f, "ret"),
        }
    }
}

/// Lower `root` into intermediate-code text, one instruction per line.
#[must_use]
pub fn lower(root: &Node) -> String {
    generate(root)
        .iter()
        .map(|instruction| format!("{instruction}\n"))
        .collect()
}

/// Lower `root` into a list of instructions with a fresh counter.
#[must_use]
pub fn generate(root: &Node) -> Vec<Instruction> {
    let mut generator = Generator::new();
    generator.lower(root);
    generator.finish()
}

/// Operator spelling in intermediate code.
///
/// Kinds the grammar never produces as binary operators fall back to `%`.
#[must_use]
pub const fn operator_symbol(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Minus => "-",
        TokenKind::Plus => "+",
        TokenKind::Div => "/",
        TokenKind::Mul => "*",
        TokenKind::Ee => "==",
        TokenKind::Gt => ">",
        TokenKind::Gte => ">=",
        TokenKind::Lt => "<",
        TokenKind::Lte => "<=",
        TokenKind::Ne => "!=",
        TokenKind::And => "&&",
        TokenKind::Or => "||",
        _ => "%",
    }
}

/// Traversal state: the shared temp/label counter and the code so far.
#[derive(Debug, Default)]
pub struct Generator {
    next: usize,
    code: Vec<Instruction>,
}

impl Generator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the generator, returning the emitted code.
    #[must_use]
    pub fn finish(self) -> Vec<Instruction> {
        self.code
    }

    fn next_temp(&mut self) -> usize {
        let n = self.next;
        self.next += 1;
        n
    }

    /// Most recently allocated number.
    const fn current_temp(&self) -> Temp {
        Temp(self.next.saturating_sub(1))
    }

    fn emit(&mut self, instruction: Instruction) {
        self.code.push(instruction);
    }

    /// Lower `node` into a side buffer, keeping the counter shared.
    fn detached(&mut self, node: &Node) -> Vec<Instruction> {
        let outer = std::mem::take(&mut self.code);
        self.lower(node);
        std::mem::replace(&mut self.code, outer)
    }

    /// Lower `node`, appending its code.
    pub fn lower(&mut self, node: &Node) {
        match node {
            Node::Number(tok) => {
                let value = tok.value.as_ref().map(Value::to_string).unwrap_or_default();
                self.load(value);
            }
            Node::String(tok) => {
                let value = format!("\"{}\"", tok.text().unwrap_or_default());
                self.load(value);
            }
            Node::VarAccess(tok) => {
                self.load(tok.text().unwrap_or_default().to_string());
            }
            Node::VarAssign(assign) => {
                self.lower(&assign.value);
                let source = self.current_temp();
                self.emit(Instruction::Store {
                    name: assign.name().to_string(),
                    source,
                });
            }
            Node::BinaryOp(bin) => {
                self.lower(&bin.left);
                let left = self.current_temp();
                self.lower(&bin.right);
                let right = self.current_temp();
                let dest = Temp(self.next_temp());
                self.emit(Instruction::Binary {
                    dest,
                    left,
                    op: operator_symbol(bin.op.kind),
                    right,
                });
            }
            Node::UnaryOp(unary) => {
                self.lower(&unary.operand);
                let operand = self.current_temp();
                match unary.op.kind {
                    TokenKind::Plus => {}
                    TokenKind::Not => {
                        let dest = Temp(self.next_temp());
                        self.emit(Instruction::Not { dest, operand });
                    }
                    _ => {
                        let dest = Temp(self.next_temp());
                        self.emit(Instruction::Negate { dest, operand });
                    }
                }
            }
            Node::If(node) => self.lower_if(node),
            Node::For(node) => self.lower_for(node),
            Node::While(node) => self.lower_while(node),
            Node::FuncDef(node) => self.lower_func_def(node),
            Node::Call(node) => self.lower_call(node),
            Node::StatementList(list) => {
                for statement in &list.statements {
                    self.lower(statement);
                }
            }
        }
    }

    fn load(&mut self, value: String) {
        let dest = Temp(self.next_temp());
        self.emit(Instruction::Load { dest, value });
    }

    /// Condition, skip-forward jump, body, label.
    fn conditional_skip(&mut self, condition: &Node, body: &Node) {
        self.lower(condition);
        let condition = self.current_temp();
        let target = Label(self.next_temp());
        self.emit(Instruction::JumpUnless { condition, target });
        self.lower(body);
        self.emit(Instruction::Label(target));
    }

    // Only the first case is lowered; `else` bodies produce no code.
    fn lower_if(&mut self, node: &If) {
        if let Some(case) = node.cases.first() {
            self.conditional_skip(&case.condition, &case.body);
        }
    }

    // No back-edge: the body runs at most once.
    fn lower_while(&mut self, node: &While) {
        self.conditional_skip(&node.condition, &node.body);
    }

    fn lower_for(&mut self, node: &For) {
        self.lower(&node.init.value);
        let var = node.init.name().to_string();
        let init = self.current_temp();
        self.emit(Instruction::Store {
            name: var.clone(),
            source: init,
        });

        // The update is numbered before the labels and body but
        // emitted after the body.
        let condition_code = self.detached(&node.condition);
        let condition = self.current_temp();
        let update_code = self.detached(&node.update);
        let update = self.current_temp();
        let top = Label(self.next_temp());
        let exit = Label(self.next_temp());

        self.emit(Instruction::Label(top));
        self.code.extend(condition_code);
        self.emit(Instruction::JumpUnless {
            condition,
            target: exit,
        });
        self.lower(&node.body);
        self.code.extend(update_code);
        self.emit(Instruction::Store {
            name: var,
            source: update,
        });
        self.emit(Instruction::Jump(top));
        self.emit(Instruction::Label(exit));
    }

    fn lower_func_def(&mut self, node: &FuncDef) {
        self.emit(Instruction::Function(node.name().to_string()));
        self.lower(&node.body);
        self.emit(Instruction::Return);
    }

    fn lower_call(&mut self, node: &Call) {
        let callee = match node.callee.name() {
            Some(name) => name.to_string(),
            None => {
                self.lower(&node.callee);
                self.current_temp().to_string()
            }
        };

        let mut args = Vec::with_capacity(node.args.len());
        for arg in &node.args {
            self.lower(arg);
            args.push(self.current_temp());
        }

        self.emit(Instruction::Call { callee, args });
    }
}
