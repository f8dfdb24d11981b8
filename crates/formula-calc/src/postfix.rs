//! Infix to postfix conversion (shunting-yard).

use std::fmt;

use formula_bignum::{BigDecimal, CalculatorRef};

use crate::error::{CalcError, CalcResult};
use crate::lexer::{Operator, Token, TokenKind};

/// One step of a postfix program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostfixItem {
    Number(BigDecimal),
    Operator(Operator),
    /// A call written with `args` arguments between its parentheses.
    Function { name: String, args: usize },
}

impl fmt::Display for PostfixItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostfixItem::Number(value) => write!(f, "{value}"),
            PostfixItem::Operator(op) => write!(f, "{op}"),
            PostfixItem::Function { name, .. } => f.write_str(name),
        }
    }
}

enum StackEntry {
    Operator(Operator),
    Function(String),
    /// `args` is `Some` for the parenthesis that opens a function call, counting the
    /// separators seen so far at that depth.
    LeftParen { args: Option<usize> },
}

/// Reorder `tokens` into postfix order, parsing literals with `calculator`.
///
/// Operands and operators must alternate, so every operator and every call only ever
/// consumes values produced between its own delimiters.
pub fn to_postfix(tokens: &[Token], calculator: &CalculatorRef) -> CalcResult<Vec<PostfixItem>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut expect_operand = true;

    for (index, token) in tokens.iter().enumerate() {
        match &token.kind {
            TokenKind::Number(text) => {
                if !expect_operand {
                    return Err(missing_operator(text));
                }
                output.push(PostfixItem::Number(BigDecimal::of_with(
                    text.as_str(),
                    calculator,
                )?));
                expect_operand = false;
            }
            TokenKind::Function(name) => {
                if !expect_operand {
                    return Err(missing_operator(name));
                }
                if !matches!(
                    tokens.get(index + 1).map(|t| &t.kind),
                    Some(TokenKind::LeftParen)
                ) {
                    return Err(CalcError::Syntax(format!(
                        "function {name} must be followed by '('"
                    )));
                }
                stack.push(StackEntry::Function(name.clone()));
            }
            TokenKind::ArgSeparator => {
                if expect_operand {
                    return Err(CalcError::Syntax("missing function argument".to_string()));
                }
                loop {
                    match stack.last() {
                        Some(StackEntry::Operator(_)) => pop_into(&mut stack, &mut output),
                        Some(StackEntry::LeftParen { args: Some(_) }) => break,
                        _ => {
                            return Err(CalcError::Syntax(
                                "argument separator outside of a function call".to_string(),
                            ))
                        }
                    }
                }
                if let Some(StackEntry::LeftParen { args: Some(args) }) = stack.last_mut() {
                    *args += 1;
                }
                expect_operand = true;
            }
            TokenKind::Operator(current) => {
                if expect_operand {
                    return Err(CalcError::Syntax(format!(
                        "operator {current} is missing its left operand"
                    )));
                }
                while let Some(StackEntry::Operator(top)) = stack.last() {
                    let binds_tighter = top.precedence() > current.precedence()
                        || (top.precedence() == current.precedence()
                            && !current.is_right_associative());
                    if !binds_tighter {
                        break;
                    }
                    pop_into(&mut stack, &mut output);
                }
                stack.push(StackEntry::Operator(*current));
                expect_operand = true;
            }
            TokenKind::LeftParen => {
                if !expect_operand {
                    return Err(missing_operator("("));
                }
                let args = matches!(stack.last(), Some(StackEntry::Function(_))).then_some(0);
                stack.push(StackEntry::LeftParen { args });
            }
            TokenKind::RightParen => {
                let args = loop {
                    match stack.pop() {
                        Some(StackEntry::LeftParen { args }) => break args,
                        Some(StackEntry::Operator(op)) => output.push(PostfixItem::Operator(op)),
                        Some(StackEntry::Function(name)) => {
                            output.push(PostfixItem::Function { name, args: 0 })
                        }
                        None => {
                            return Err(CalcError::Syntax(
                                "unbalanced parentheses: unexpected ')'".to_string(),
                            ))
                        }
                    }
                };
                let empty_call = matches!(
                    index.checked_sub(1).map(|i| &tokens[i].kind),
                    Some(TokenKind::LeftParen)
                );
                match args {
                    Some(separators) => {
                        let args = if empty_call {
                            0
                        } else if expect_operand {
                            return Err(CalcError::Syntax(
                                "missing function argument".to_string(),
                            ));
                        } else {
                            separators + 1
                        };
                        if let Some(StackEntry::Function(name)) = stack.pop() {
                            output.push(PostfixItem::Function { name, args });
                        }
                    }
                    None if expect_operand => {
                        return Err(CalcError::Syntax("missing operand before ')'".to_string()))
                    }
                    None => {}
                }
                expect_operand = false;
            }
        }
    }

    if expect_operand && !tokens.is_empty() {
        return Err(CalcError::Syntax(
            "missing operand at end of expression".to_string(),
        ));
    }

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::LeftParen { .. } => {
                return Err(CalcError::Syntax(
                    "unbalanced parentheses: missing ')'".to_string(),
                ))
            }
            StackEntry::Operator(op) => output.push(PostfixItem::Operator(op)),
            StackEntry::Function(name) => output.push(PostfixItem::Function { name, args: 0 }),
        }
    }

    log::trace!(
        "postfix: {}",
        output
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(output)
}

fn missing_operator(before: &str) -> CalcError {
    CalcError::Syntax(format!("missing operator before {before}"))
}

/// Move the top operator to the output. Only called with an operator on top.
fn pop_into(stack: &mut Vec<StackEntry>, output: &mut Vec<PostfixItem>) {
    if let Some(StackEntry::Operator(op)) = stack.last() {
        output.push(PostfixItem::Operator(*op));
        stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use formula_bignum::default_calculator;
    use pretty_assertions::assert_eq;

    fn rpn(expression: &str) -> String {
        let tokens = tokenize(expression, ["max", "sqrt"]).unwrap();
        to_postfix(&tokens, &default_calculator())
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn syntax_error(expression: &str) -> String {
        let tokens = tokenize(expression, ["max"]).unwrap();
        match to_postfix(&tokens, &default_calculator()) {
            Err(CalcError::Syntax(message)) => message,
            other => panic!("expected a syntax error for {expression:?}, got {other:?}"),
        }
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(rpn("3+4*2"), "3 4 2 * +");
        assert_eq!(rpn("(3+4)*2"), "3 4 + 2 *");
        assert_eq!(rpn("2^3^2"), "2 3 2 ^ ^");
        assert_eq!(rpn("8-3-2"), "8 3 - 2 -");
        assert_eq!(rpn("7%4+1"), "7 4 % 1 +");
        assert_eq!(rpn("1+7%4*2"), "1 7 4 2 * % +");
    }

    #[test]
    fn functions_bind_to_their_closing_paren() {
        assert_eq!(rpn("max(1, 2+3)*2"), "1 2 3 + max 2 *");
        assert_eq!(rpn("sqrt(max(4, 9))"), "4 9 max sqrt");
        assert_eq!(rpn("3sqrt(16)"), "3 16 sqrt *");
    }

    #[test]
    fn unbalanced_input_is_a_syntax_error() {
        assert_eq!(syntax_error("(1+2"), "unbalanced parentheses: missing ')'");
        assert_eq!(syntax_error("1+2)"), "unbalanced parentheses: unexpected ')'");
        assert_eq!(syntax_error("1,2"), "argument separator outside of a function call");
        assert_eq!(syntax_error("max 1"), "function max must be followed by '('");
        assert_eq!(syntax_error("(1, 2)"), "argument separator outside of a function call");
    }

    #[test]
    fn calls_record_their_argument_count() {
        let tokens = tokenize("max(1, max(2, 3)) + max()", ["max"]).unwrap();
        let calls: Vec<(String, usize)> = to_postfix(&tokens, &default_calculator())
            .unwrap()
            .into_iter()
            .filter_map(|item| match item {
                PostfixItem::Function { name, args } => Some((name, args)),
                _ => None,
            })
            .collect();
        assert_eq!(
            calls,
            vec![("max".to_string(), 2), ("max".to_string(), 2), ("max".to_string(), 0)]
        );
    }

    #[test]
    fn operands_and_operators_must_alternate() {
        assert_eq!(syntax_error("(5)max(2)"), "missing operator before max");
        assert_eq!(syntax_error("(2)3"), "missing operator before 3");
        assert_eq!(syntax_error("*2"), "operator * is missing its left operand");
        assert_eq!(syntax_error("(1+)"), "missing operand before ')'");
        assert_eq!(syntax_error("()"), "missing operand before ')'");
        assert_eq!(syntax_error("1+"), "missing operand at end of expression");
        assert_eq!(syntax_error("max(1,)"), "missing function argument");
        assert_eq!(syntax_error("max(,1)"), "missing function argument");
        assert_eq!(syntax_error("max(1,*2)"), "operator * is missing its left operand");
    }
}
