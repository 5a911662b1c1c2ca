use crate::{
    ast::BinaryOperator,
    environment::Environment,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, ExecutionContext},
        value::core::Value,
    },
    util::num::{decimal_from_bytes, decimal_to_bytes, integer_from_bytes, integer_to_bytes},
};

/// Decimal divisors closer to zero than this raise
/// [`RuntimeError::DivisionByZero`].
const DIVISION_EPSILON: f64 = 0.000_000_001;

/// Reads a value through the sign-extended 64-bit integer lane.
///
/// The value's buffer width selects the source type; 1-byte values (`bool`,
/// `char`, `uint8_t`) go through `i8`, and so on up to 8 bytes.
#[must_use]
pub fn value_as_integer(value: &Value) -> i64 {
    integer_from_bytes(&value.read_bytes())
}

/// Reads a value through the `f64` decimal lane.
#[must_use]
pub fn value_as_decimal(value: &Value) -> f64 {
    decimal_from_bytes(&value.read_bytes())
}

/// Writes an integer into a value, narrowing to the value's buffer width.
pub fn set_value_as_integer(result: i64, value: &Value) {
    value.write_bytes(&integer_to_bytes(result, value.size()));
}

/// Writes a decimal into a value, narrowing to the value's buffer width.
pub fn set_value_as_decimal(result: f64, value: &Value) {
    value.write_bytes(&decimal_to_bytes(result, value.size()));
}

impl Environment {
    /// Applies a binary operator to two evaluated operands.
    ///
    /// The left operand's type drives everything: built-in types are
    /// classified as integer or decimal and computed through the matching
    /// lane (64-bit sign-extended integers, or `f64`), with comparison and
    /// logical operators producing `bool` and arithmetic producing the left
    /// operand's type. A user-typed left operand dispatches to its
    /// `operator<op>` method with the right operand as the single argument.
    ///
    /// # Errors
    /// Returns [`RuntimeError::DivisionByZero`] for an integer division by
    /// zero or a decimal division by a near-zero divisor.
    #[allow(clippy::float_cmp)]
    pub(crate) fn apply_binary_operator(&mut self,
                                        ctx: &mut ExecutionContext,
                                        left: &Value,
                                        right: &Value,
                                        op: BinaryOperator)
                                        -> EvalResult<Value> {
        let built_in = left.type_usage.ty.borrow().is_built_in();

        if !built_in && !left.type_usage.is_pointer() {
            return Ok(self.apply_operator_method(left, right, op));
        }

        let integer_operands = !left.type_usage.ty.borrow().is_decimal();

        let left_integer = value_as_integer(left);
        let right_integer = value_as_integer(right);
        let left_decimal = value_as_decimal(left);
        let right_decimal = value_as_decimal(right);

        if op.is_comparison() {
            let result = match op {
                BinaryOperator::Equal => {
                    if integer_operands {
                        left_integer == right_integer
                    } else {
                        // exact IEEE comparison, like the other lanes
                        left_decimal == right_decimal
                    }
                },
                BinaryOperator::NotEqual => {
                    if integer_operands {
                        left_integer != right_integer
                    } else {
                        left_decimal != right_decimal
                    }
                },
                BinaryOperator::Less => {
                    if integer_operands {
                        left_integer < right_integer
                    } else {
                        left_decimal < right_decimal
                    }
                },
                BinaryOperator::Greater => {
                    if integer_operands {
                        left_integer > right_integer
                    } else {
                        left_decimal > right_decimal
                    }
                },
                BinaryOperator::LessEqual => {
                    if integer_operands {
                        left_integer <= right_integer
                    } else {
                        left_decimal <= right_decimal
                    }
                },
                BinaryOperator::GreaterEqual => {
                    if integer_operands {
                        left_integer >= right_integer
                    } else {
                        left_decimal >= right_decimal
                    }
                },
                // both sides were already evaluated; no short-circuit
                BinaryOperator::And => left_integer != 0 && right_integer != 0,
                BinaryOperator::Or => left_integer != 0 || right_integer != 0,
                _ => unreachable!(),
            };

            return Ok(self.bool_literal(result));
        }

        let output = Value::on_heap(&left.type_usage);

        match op {
            BinaryOperator::Add => {
                if integer_operands {
                    set_value_as_integer(left_integer.wrapping_add(right_integer), &output);
                } else {
                    set_value_as_decimal(left_decimal + right_decimal, &output);
                }
            },
            BinaryOperator::Sub => {
                if integer_operands {
                    set_value_as_integer(left_integer.wrapping_sub(right_integer), &output);
                } else {
                    set_value_as_decimal(left_decimal - right_decimal, &output);
                }
            },
            BinaryOperator::Mul => {
                if integer_operands {
                    set_value_as_integer(left_integer.wrapping_mul(right_integer), &output);
                } else {
                    set_value_as_decimal(left_decimal * right_decimal, &output);
                }
            },
            BinaryOperator::Div => {
                if integer_operands {
                    if right_integer == 0 {
                        return Err(RuntimeError::DivisionByZero { line: ctx.current_line });
                    }

                    set_value_as_integer(left_integer.wrapping_div(right_integer), &output);
                } else {
                    if right_decimal.abs() <= DIVISION_EPSILON {
                        return Err(RuntimeError::DivisionByZero { line: ctx.current_line });
                    }

                    set_value_as_decimal(left_decimal / right_decimal, &output);
                }
            },
            BinaryOperator::BitAnd => {
                set_value_as_integer(left_integer & right_integer, &output);
            },
            BinaryOperator::BitOr => {
                set_value_as_integer(left_integer | right_integer, &output);
            },
            BinaryOperator::BitXor => {
                set_value_as_integer(left_integer ^ right_integer, &output);
            },
            _ => unreachable!(),
        }

        Ok(output)
    }

    /// Dispatches a binary operator on a user type to its `operator<op>`
    /// method, invoked on the left operand with the right operand as the
    /// single argument.
    ///
    /// # Panics
    /// Panics when no matching operator method exists; the parser validated
    /// this, so a miss is a registration inconsistency.
    fn apply_operator_method(&self, left: &Value, right: &Value, op: BinaryOperator) -> Value {
        let method = left.type_usage.ty.borrow().find_method(&op.method_name());

        let Some(method) = method else {
            panic!("no method named '{}' on type '{}'",
                   op.method_name(),
                   left.type_usage.ty.borrow().identifier);
        };

        let Some(return_type) = &method.return_type else {
            panic!("operator method '{}' must return a value", op.method_name());
        };

        let output = Value::on_heap(return_type);
        (method.body)(left, &[right.clone()], Some(&output));

        output
    }
}
