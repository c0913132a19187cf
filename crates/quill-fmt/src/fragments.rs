//! Flattening of operator chains into fragment lists.
//!
//! `a + b + c` parses as `(a + b) + c`; the walker wants the three operands
//! and two operators side by side so one alignment can wrap between any of
//! them. Parenthesized operands and any other operator, even one of the same
//! precedence, stay opaque fragments.

use quill_parser::ast::expr::{BinaryExpr, CallExpr, Expr, Literal, StringConcat};
use quill_parser::SyntaxKind;

/// Operands of a same-precedence operator run, in source order.
#[derive(Debug, Clone)]
pub(crate) struct BinaryFragments {
    pub operands: Vec<Expr>,
    /// `operators[i]` sits between `operands[i]` and `operands[i + 1]`.
    pub operators: Vec<SyntaxKind>,
}

impl BinaryFragments {
    pub(crate) fn len(&self) -> usize {
        self.operands.len()
    }

    /// Operands worth wrapping for: anything but number, boolean, null,
    /// `undefined` and regex literals.
    pub(crate) fn real_len(&self) -> usize {
        self.operands.iter().filter(|e| !is_small_fragment(e)).count()
    }

    /// Whether the run deserves its own wrapping alignment.
    pub(crate) fn wants_alignment(&self) -> bool {
        self.real_len() > 1 || self.len() > 4
    }
}

fn is_small_fragment(expr: &Expr) -> bool {
    let Expr::Literal(literal) = expr else {
        return false;
    };
    literal.token().is_some_and(|token| {
        matches!(
            token.kind(),
            SyntaxKind::NUMBER
                | SyntaxKind::TRUE_KW
                | SyntaxKind::FALSE_KW
                | SyntaxKind::NULL_KW
                | SyntaxKind::UNDEFINED_KW
                | SyntaxKind::REGEX
        )
    })
}

/// Flatten the left spine of `root` while it repeats `root`'s operator.
pub(crate) fn flatten_binary(root: &BinaryExpr) -> Option<BinaryFragments> {
    let operator = root.op_kind()?;
    let mut operands = Vec::new();
    let mut operators = Vec::new();
    let mut current = root.clone();
    loop {
        operands.push(current.rhs()?);
        operators.push(current.op_kind()?);
        let lhs = current.lhs()?;
        match lhs {
            Expr::BinaryExpr(inner) if inner.op_kind() == Some(operator) => {
                current = inner;
            }
            other => {
                operands.push(other);
                break;
            }
        }
    }
    operands.reverse();
    operators.reverse();
    Some(BinaryFragments {
        operands,
        operators,
    })
}

/// The pre-flattened operands of a string-literal concatenation.
pub(crate) fn flatten_string_concat(concat: &StringConcat) -> Vec<Literal> {
    concat.literals().collect()
}

/// A `receiver.a(..).b(..)` chain: the receiver, then each selector call.
#[derive(Debug, Clone)]
pub(crate) struct Cascade {
    pub receiver: Expr,
    /// Outermost call last.
    pub calls: Vec<CallExpr>,
}

impl Cascade {
    /// Receiver plus one fragment per call.
    pub(crate) fn fragment_count(&self) -> usize {
        self.calls.len() + 1
    }
}

/// Collect the selector calls of a chain ending at `call`. `None` unless the
/// chain has at least two member calls.
pub(crate) fn flatten_cascade(call: &CallExpr) -> Option<Cascade> {
    let mut calls = Vec::new();
    let mut current = call.clone();
    let receiver = loop {
        let Some(Expr::MemberExpr(member)) = current.callee() else {
            break Expr::CallExpr(current);
        };
        let object = member.object()?;
        calls.push(current);
        match object {
            Expr::CallExpr(inner) if matches!(inner.callee(), Some(Expr::MemberExpr(_))) => {
                current = inner;
            }
            other => break other,
        }
    };
    if calls.len() < 2 {
        return None;
    }
    calls.reverse();
    Some(Cascade { receiver, calls })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expression(source: &str) -> Expr {
        let parse = quill_parser::parse_expression(source);
        assert!(parse.ok(), "{:?}", parse.errors());
        parse
            .syntax()
            .children()
            .find_map(Expr::cast)
            .expect("expression root")
    }

    fn binary(source: &str) -> BinaryFragments {
        match expression(source) {
            Expr::BinaryExpr(b) => flatten_binary(&b).expect("flattened"),
            other => panic!("not binary: {other:?}"),
        }
    }

    fn texts(exprs: &[Expr]) -> Vec<String> {
        exprs
            .iter()
            .map(|e| e.syntax().text().to_string().trim().to_string())
            .collect()
    }

    #[test]
    fn same_precedence_run_flattens_in_source_order() {
        let run = binary("a+b+c+d+e+f+g+h+i+j");
        assert_eq!(run.len(), 10);
        assert_eq!(run.operators.len(), 9);
        assert!(run.operators.iter().all(|op| *op == SyntaxKind::PLUS));
        assert_eq!(texts(&run.operands)[0], "a");
        assert_eq!(texts(&run.operands)[9], "j");
    }

    #[test]
    fn another_operator_of_equal_precedence_ends_the_run() {
        let run = binary("a - b + c");
        assert_eq!(run.operators, vec![SyntaxKind::PLUS]);
        assert_eq!(texts(&run.operands), vec!["a - b", "c"]);

        let run = binary("a * b * c / d");
        assert_eq!(run.operators, vec![SyntaxKind::SLASH]);
        assert_eq!(texts(&run.operands), vec!["a * b * c", "d"]);
    }

    #[test]
    fn tighter_operators_stay_opaque() {
        let run = binary("a + b * c + d");
        assert_eq!(texts(&run.operands), vec!["a", "b * c", "d"]);
    }

    #[test]
    fn parentheses_are_a_chain_boundary() {
        let run = binary("(a + b) + c");
        assert_eq!(run.len(), 2);
        assert!(matches!(run.operands[0], Expr::ParenExpr(_)));
    }

    #[test]
    fn literal_operands_are_not_real_fragments() {
        let run = binary("x + 1 + 2");
        assert_eq!(run.real_len(), 1);
        assert!(!run.wants_alignment());
        assert!(binary("x + y").wants_alignment());
        assert!(binary("1 + 2 + 3 + 4 + 5").wants_alignment());
    }

    #[test]
    fn cascade_needs_two_member_calls() {
        let Expr::CallExpr(call) = expression("a.f().g().h()") else {
            panic!("not a call");
        };
        let cascade = flatten_cascade(&call).expect("cascade");
        assert_eq!(cascade.fragment_count(), 4);
        assert_eq!(cascade.receiver.syntax().text().to_string(), "a");

        let Expr::CallExpr(single) = expression("a.f(1)") else {
            panic!("not a call");
        };
        assert!(flatten_cascade(&single).is_none());
    }

    #[test]
    fn plain_call_receiver_is_one_fragment() {
        let Expr::CallExpr(call) = expression("make().f().g()") else {
            panic!("not a call");
        };
        let cascade = flatten_cascade(&call).expect("cascade");
        assert_eq!(cascade.calls.len(), 2);
        assert_eq!(cascade.receiver.syntax().text().to_string(), "make()");
    }
}
