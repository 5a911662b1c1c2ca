use crate::{
    ast::{Expression, UnaryOperator},
    environment::Environment,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::{set_value_as_decimal, set_value_as_integer, value_as_decimal, value_as_integer},
            core::{EvalResult, ExecutionContext},
        },
        symbols::identifier::Identifier,
        value::{
            core::Value,
            memory::{Address, BufferView},
        },
    },
};

impl Environment {
    /// Evaluates an expression to its value.
    ///
    /// Variable and member reads are shallow: the returned value aliases the
    /// instance's storage, and callers that need isolation copy explicitly.
    /// Calls to `void` functions yield `None`.
    ///
    /// # Errors
    /// Returns the [`RuntimeError`] that aborted evaluation.
    pub(crate) fn get_value(&mut self,
                            ctx: &mut ExecutionContext,
                            expression: &Expression)
                            -> EvalResult<Option<Value>> {
        match expression {
            Expression::Literal { value, .. } => Ok(Some(value.clone())),
            Expression::NullPointer { .. } => Ok(Some(self.null_pointer_value())),
            Expression::VariableAccess { identifier, .. } => {
                let value = self.retrieve_instance_value(identifier);
                assert!(value.is_some(), "unresolved variable '{identifier}'");
                Ok(value)
            },
            Expression::MemberAccess { .. } => self.get_instance_data_value(ctx, expression),
            Expression::UnaryOp { op, operand, .. } => {
                let value = self.expect_value(ctx, operand)?;
                Ok(Some(self.apply_unary_operator(*op, &value)))
            },
            Expression::BinaryOp { op, left, right, .. } => {
                let left_value = self.expect_value(ctx, left)?;
                let right_value = self.expect_value(ctx, right)?;

                self.apply_binary_operator(ctx, &left_value, &right_value, *op)
                    .map(Some)
            },
            Expression::Parenthesized { inner, .. } => self.get_value(ctx, inner),
            Expression::AddressOf { inner, .. } => self.get_address_of_value(inner).map(Some),
            Expression::Conditional { condition,
                                      then_expr,
                                      else_expr,
                                      .. } => {
                let condition_met = self.expect_value(ctx, condition)?.as_bool();

                if condition_met {
                    self.get_value(ctx, then_expr)
                } else {
                    self.get_value(ctx, else_expr)
                }
            },
            Expression::FunctionCall { identifier, arguments, .. } => {
                self.call_function_expression(ctx, identifier, arguments)
            },
            Expression::MethodCall { member_access, arguments, .. } => {
                self.call_method_expression(ctx, member_access, arguments)
            },
        }
    }

    /// Evaluates an expression that must produce a value.
    ///
    /// # Panics
    /// Panics when a `void` call is used where a value is required; the
    /// parser cannot rule this out, so it is a documented runtime
    /// assertion.
    pub(crate) fn expect_value(&mut self,
                               ctx: &mut ExecutionContext,
                               expression: &Expression)
                               -> EvalResult<Value> {
        match self.get_value(ctx, expression)? {
            Some(value) => Ok(value),
            None => panic!("expression produced no value (line {})", ctx.current_line),
        }
    }

    /// Resolves an expression to addressable instance storage.
    ///
    /// Variable accesses yield the instance's value; member access chains
    /// walk member offsets, dereferencing pointers on `->` steps. A chain
    /// segment that is not a member (a method name) stops the walk, leaving
    /// the receiver as the result. Expressions that do not name storage
    /// yield `None`.
    ///
    /// # Errors
    /// Returns [`RuntimeError::NullPointerAccess`] when an `->` step reads a
    /// null or dangling pointer.
    pub(crate) fn get_instance_data_value(&mut self,
                                          ctx: &mut ExecutionContext,
                                          expression: &Expression)
                                          -> EvalResult<Option<Value>> {
        match expression {
            Expression::VariableAccess { identifier, .. } => {
                let value = self.retrieve_instance_value(identifier);
                assert!(value.is_some(), "unresolved variable '{identifier}'");
                Ok(value)
            },
            Expression::MemberAccess { identifiers, .. } => {
                let first = &identifiers[0];
                let Some(mut current) = self.retrieve_instance_value(first) else {
                    panic!("unresolved variable '{first}'");
                };

                // a chain starting at a null pointer fails before any
                // member resolves
                if current.type_usage.is_pointer()
                   && Address::from_bytes(&current.read_bytes()).is_null()
                {
                    return Err(RuntimeError::NullPointerAccess { name: first.name.clone(),
                                                                 line: ctx.current_line, });
                }

                for index in 1..identifiers.len() {
                    let member_identifier = &identifiers[index];

                    let member = current.type_usage
                                        .ty
                                        .borrow()
                                        .find_member(member_identifier)
                                        .cloned();

                    // a chain segment that is not a member names a method;
                    // the receiver resolved so far is the result
                    let Some(member) = member else {
                        break;
                    };

                    let base = if current.type_usage.is_pointer() {
                        self.deref_pointer_value(ctx, &current, &identifiers[index - 1].name)?
                    } else {
                        current.clone()
                    };

                    let Some(base_view) = base.view() else {
                        break;
                    };

                    let member_view =
                        base_view.sub_view(member.offset, member.type_usage.size());
                    current = Value::external(member.type_usage.clone(), member_view);
                }

                Ok(Some(current))
            },
            _ => Ok(None),
        }
    }

    /// Follows a pointer value to its pointee's storage.
    ///
    /// # Errors
    /// Returns [`RuntimeError::NullPointerAccess`] naming `name` when the
    /// pointer is null or no longer resolves.
    pub(crate) fn deref_pointer_value(&self,
                                      ctx: &ExecutionContext,
                                      value: &Value,
                                      name: &str)
                                      -> EvalResult<Value> {
        let address = Address::from_bytes(&value.read_bytes());

        let Some((alloc, offset)) = self.memory_resolve(address) else {
            return Err(RuntimeError::NullPointerAccess { name: name.to_string(),
                                                         line: ctx.current_line, });
        };

        let type_usage = value.type_usage.dereferenced();
        let len = type_usage.size();
        let view = BufferView { alloc,
                                offset,
                                len,
                                address };

        Ok(Value::external(type_usage, view))
    }

    /// Evaluates `&expr`: the operand must resolve to a variable, whose
    /// storage address becomes a pointer value one level deeper.
    fn get_address_of_value(&mut self, inner: &Expression) -> EvalResult<Value> {
        let Some(identifier) = address_of_target(inner) else {
            panic!("the address-of operand must be a variable");
        };

        let Some(instance_value) = self.retrieve_instance_value(&identifier) else {
            panic!("unresolved variable '{identifier}'");
        };

        let pointer = Value::on_heap(&instance_value.type_usage.referenced());
        pointer.write_bytes(&instance_value.address().to_bytes());

        Ok(pointer)
    }

    fn apply_unary_operator(&self, op: UnaryOperator, value: &Value) -> Value {
        match op {
            UnaryOperator::Negate => {
                let result = Value::on_heap(&value.type_usage);

                if value.type_usage.ty.borrow().is_decimal() {
                    set_value_as_decimal(-value_as_decimal(value), &result);
                } else {
                    set_value_as_integer(-value_as_integer(value), &result);
                }

                result
            },
            UnaryOperator::Not => self.bool_literal(value_as_integer(value) == 0),
        }
    }
}

/// Unwraps the variable an address-of operand names, looking through
/// parentheses.
fn address_of_target(expression: &Expression) -> Option<Identifier> {
    match expression {
        Expression::VariableAccess { identifier, .. } => Some(identifier.clone()),
        Expression::Parenthesized { inner, .. } => address_of_target(inner),
        _ => None,
    }
}
