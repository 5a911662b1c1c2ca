use std::rc::Rc;

use crate::{
    ast::{AssignmentOperator, Expression, Statement},
    environment::Environment,
    error::RuntimeError,
    interpreter::{
        evaluator::binary::{set_value_as_integer, value_as_integer},
        symbols::{function::Function, identifier::Identifier, types::TypeUsage},
        value::{
            core::Value,
            memory::{EXECUTION_STACK_CAPACITY, Memory, MemoryPool},
        },
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or the
/// [`RuntimeError`] that aborted execution.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The execution context's one-shot control signal.
///
/// `break`, `continue` and `return` all travel through this flag rather
/// than through native control flow: statements set it, loops and function
/// calls consume it, and block execution short-circuits while it is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpFlag {
    /// Normal sequential execution.
    #[default]
    None,
    /// A `break` is unwinding to the nearest loop.
    Break,
    /// A `continue` is unwinding to the nearest loop head.
    Continue,
    /// A `return` is unwinding to the nearest function call.
    Return,
}

/// Mutable state threaded through program execution.
///
/// Carries the scope depth, the line currently executing (decorating any
/// runtime error), the stack pool instance storage is carved from, the
/// return slot, the jump flag, and the namespaces brought in by executed
/// `using` directives.
#[derive(Debug)]
pub struct ExecutionContext {
    /// Current scope depth; the program scope is level 1.
    pub scope_level:      u32,
    /// The source line of the statement being executed.
    pub current_line:     usize,
    /// The pool instance storage is carved from, rewound on scope exit.
    pub stack:            MemoryPool,
    /// The return slot `return` statements write and calls read.
    pub return_value:     Option<Value>,
    /// The pending jump, if any.
    pub jump_flag:        JumpFlag,
    /// Namespace paths named by executed `using namespace` directives.
    pub using_namespaces: Vec<String>,
    watermarks:           Vec<usize>,
}

impl ExecutionContext {
    /// Creates a fresh context whose stack pool is registered in `memory`.
    #[must_use]
    pub fn new(memory: &mut Memory) -> Self {
        Self { scope_level:      1,
               current_line:     0,
               stack:            MemoryPool::new(memory, EXECUTION_STACK_CAPACITY),
               return_value:     None,
               jump_flag:        JumpFlag::None,
               using_namespaces: Vec::new(),
               watermarks:       Vec::new(), }
    }

    /// Opens a scope: bumps the level and records the stack watermark the
    /// matching close will rewind to.
    pub fn increment_scope_level(&mut self) {
        self.scope_level += 1;
        self.watermarks.push(self.stack.watermark());
    }
}

impl Environment {
    /// Closes a scope: releases every instance at the current level, rewinds
    /// the stack pool, and drops the level.
    pub(crate) fn decrement_scope_level(&mut self, ctx: &mut ExecutionContext) {
        self.release_instances(ctx.scope_level);

        if let Some(watermark) = ctx.watermarks.pop() {
            ctx.stack.rewind(watermark);
        }

        ctx.scope_level -= 1;
    }

    /// Executes a single statement.
    ///
    /// # Errors
    /// Returns the [`RuntimeError`] that aborted execution, decorated with
    /// the statement's line.
    pub(crate) fn execute_statement(&mut self,
                                    ctx: &mut ExecutionContext,
                                    statement: &Statement)
                                    -> EvalResult<()> {
        ctx.current_line = statement.line_number();

        match statement {
            Statement::Expression { expression, .. } => {
                self.get_value(ctx, expression)?;
                Ok(())
            },
            Statement::Block { statements, .. } => {
                ctx.increment_scope_level();

                let mut result = Ok(());

                for child in statements {
                    result = self.execute_statement(ctx, child);

                    if result.is_err() || ctx.jump_flag != JumpFlag::None {
                        break;
                    }
                }

                self.decrement_scope_level(ctx);
                result
            },
            Statement::UsingDirective { namespace, .. } => {
                ctx.using_namespaces.push(namespace.name.clone());
                Ok(())
            },
            Statement::NamespaceDeclaration { statements, .. } => {
                // lookup is still flat; the declarations simply run in order
                for child in statements {
                    self.execute_statement(ctx, child)?;
                }

                Ok(())
            },
            Statement::VariableDeclaration { type_usage,
                                             identifier,
                                             initial_value,
                                             .. } => {
                self.execute_variable_declaration(ctx, type_usage, identifier, initial_value.as_ref())
            },
            Statement::FunctionDeclaration { return_type,
                                             identifier,
                                             parameter_types,
                                             parameter_names,
                                             body,
                                             .. } => {
                let function = Function::script(identifier.clone(),
                                                parameter_types.clone(),
                                                parameter_names.clone(),
                                                return_type.clone(),
                                                Rc::clone(body));
                self.root_namespace.register_function(function);
                Ok(())
            },
            Statement::Assignment { target, op, value, .. } => {
                let Some(instance_data) = self.get_instance_data_value(ctx, target)? else {
                    return Ok(());
                };

                let Some(right) = self.get_value(ctx, value)? else {
                    return Ok(());
                };

                // only plain assignment stores; compound operators parse
                // but are not executed in this revision
                if *op == AssignmentOperator::Assign {
                    instance_data.set_from(&right);
                }

                Ok(())
            },
            Statement::Increment { identifier, .. } => {
                let instance_value = self.retrieve_instance_value(identifier);
                debug_assert!(instance_value.is_some());

                if let Some(value) = instance_value {
                    set_value_as_integer(value_as_integer(&value) + 1, &value);
                }

                Ok(())
            },
            Statement::Decrement { identifier, .. } => {
                let instance_value = self.retrieve_instance_value(identifier);
                debug_assert!(instance_value.is_some());

                if let Some(value) = instance_value {
                    set_value_as_integer(value_as_integer(&value) - 1, &value);
                }

                Ok(())
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                let condition_met = self.evaluate_condition(ctx, condition)?;

                if condition_met {
                    self.execute_statement(ctx, then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_statement(ctx, else_branch)
                } else {
                    Ok(())
                }
            },
            Statement::While { condition, body, .. } => {
                loop {
                    if ctx.jump_flag == JumpFlag::Continue {
                        ctx.jump_flag = JumpFlag::None;
                    }

                    if !self.evaluate_condition(ctx, condition)? {
                        break;
                    }

                    self.execute_statement(ctx, body)?;

                    match ctx.jump_flag {
                        JumpFlag::Break => {
                            ctx.jump_flag = JumpFlag::None;
                            break;
                        },
                        JumpFlag::Return => break,
                        JumpFlag::None | JumpFlag::Continue => {},
                    }
                }

                Ok(())
            },
            Statement::For { initialization,
                             condition,
                             step,
                             body,
                             .. } => {
                ctx.increment_scope_level();
                let result = self.execute_for(ctx,
                                              initialization.as_deref(),
                                              condition.as_ref(),
                                              step.as_deref(),
                                              body);
                self.decrement_scope_level(ctx);
                result
            },
            Statement::Break { .. } => {
                ctx.jump_flag = JumpFlag::Break;
                Ok(())
            },
            Statement::Continue { .. } => {
                ctx.jump_flag = JumpFlag::Continue;
                Ok(())
            },
            Statement::Return { expression, .. } => {
                ctx.return_value = match expression {
                    Some(expression) => {
                        // the returned value may live in storage the scope
                        // unwind is about to reclaim
                        self.get_value(ctx, expression)?.map(|value| value.to_heap_copy())
                    },
                    None => None,
                };

                ctx.jump_flag = JumpFlag::Return;
                Ok(())
            },
        }
    }

    fn execute_variable_declaration(&mut self,
                                    ctx: &mut ExecutionContext,
                                    type_usage: &TypeUsage,
                                    identifier: &Identifier,
                                    initial_value: Option<&Expression>)
                                    -> EvalResult<()> {
        let value = if type_usage.is_reference {
            Value::uninitialized(type_usage.clone())
        } else {
            Value::on_stack(type_usage, &mut ctx.stack)
        };

        self.register_instance_at(ctx.scope_level,
                                  type_usage.clone(),
                                  identifier.clone(),
                                  value.clone());

        if let Some(expression) = initial_value {
            if let Some(initial) = self.get_value(ctx, expression)? {
                value.set_from(&initial);
            }

            return Ok(());
        }

        // no initializer: structs and classes run their default constructor
        if !type_usage.ty.borrow().is_built_in() && !type_usage.is_pointer() {
            let constructor = type_usage.ty.borrow().default_constructor();
            debug_assert!(constructor.is_some());

            if let Some(constructor) = constructor {
                (constructor.body)(&value, &[], None);
            }
        }

        Ok(())
    }

    fn execute_for(&mut self,
                   ctx: &mut ExecutionContext,
                   initialization: Option<&Statement>,
                   condition: Option<&Expression>,
                   step: Option<&Statement>,
                   body: &Statement)
                   -> EvalResult<()> {
        if let Some(initialization) = initialization {
            self.execute_statement(ctx, initialization)?;
        }

        loop {
            if ctx.jump_flag == JumpFlag::Continue {
                ctx.jump_flag = JumpFlag::None;
            }

            let condition_met = match condition {
                Some(condition) => self.evaluate_condition(ctx, condition)?,
                None => true,
            };

            if !condition_met {
                break;
            }

            self.execute_statement(ctx, body)?;

            match ctx.jump_flag {
                JumpFlag::Break => {
                    ctx.jump_flag = JumpFlag::None;
                    break;
                },
                JumpFlag::Return => break,
                JumpFlag::None | JumpFlag::Continue => {},
            }

            // the step also runs after a continue, like the head of a
            // native for loop
            if let Some(step) = step {
                self.execute_statement(ctx, step)?;
            }
        }

        Ok(())
    }

    fn evaluate_condition(&mut self,
                          ctx: &mut ExecutionContext,
                          condition: &Expression)
                          -> EvalResult<bool> {
        Ok(self.get_value(ctx, condition)?.is_some_and(|value| value.as_bool()))
    }
}
