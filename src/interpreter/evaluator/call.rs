use crate::{
    ast::{Expression, Statement},
    environment::Environment,
    interpreter::{
        evaluator::core::{EvalResult, ExecutionContext, JumpFlag},
        symbols::{
            function::{Function, FunctionBody},
            identifier::Identifier,
            types::TypeUsage,
        },
        value::core::Value,
    },
};

impl Environment {
    /// Evaluates a free (possibly `::`-qualified) function call expression.
    ///
    /// # Panics
    /// Panics when no function is registered under the name; the registries
    /// are consulted at call time, so this is a runtime assertion rather
    /// than a compile error.
    pub(crate) fn call_function_expression(&mut self,
                                           ctx: &mut ExecutionContext,
                                           identifier: &Identifier,
                                           arguments: &[Expression])
                                           -> EvalResult<Option<Value>> {
        let function = self.lookup_function_named(&identifier.name, &ctx.using_namespaces);

        let Some(function) = function else {
            panic!("no function named '{identifier}'");
        };

        let argument_values = self.get_argument_values(ctx, &function.parameters, arguments)?;
        self.call_function(ctx, &function, &argument_values)
    }

    /// Evaluates a method call expression.
    ///
    /// The receiver chain resolves to addressable storage; pointer
    /// receivers are followed to their pointee (the `this` pointer), value
    /// receivers pass their own storage. The method's return value is also
    /// stashed in the context return slot.
    pub(crate) fn call_method_expression(&mut self,
                                         ctx: &mut ExecutionContext,
                                         member_access: &Expression,
                                         arguments: &[Expression])
                                         -> EvalResult<Option<Value>> {
        let Expression::MemberAccess { identifiers, .. } = member_access else {
            panic!("a method call requires a member access receiver");
        };

        let method_identifier = &identifiers[identifiers.len() - 1];

        let Some(receiver) = self.get_instance_data_value(ctx, member_access)? else {
            panic!("unresolved method receiver");
        };

        let receiver_storage = if receiver.type_usage.is_pointer() {
            let receiver_name = &identifiers[identifiers.len() - 2].name;
            self.deref_pointer_value(ctx, &receiver, receiver_name)?
        } else {
            receiver
        };

        let method = receiver_storage.type_usage
                                     .ty
                                     .borrow()
                                     .find_method(&method_identifier.name);

        let Some(method) = method else {
            panic!("no method named '{}' on type '{}'",
                   method_identifier,
                   receiver_storage.type_usage.ty.borrow().identifier);
        };

        let argument_values = self.get_argument_values(ctx, &method.parameters, arguments)?;
        let output = method.return_type.as_ref().map(Value::on_heap);

        (method.body)(&receiver_storage, &argument_values, output.as_ref());

        ctx.return_value = output.clone();
        Ok(output)
    }

    /// Invokes a function descriptor with already-marshalled arguments.
    pub(crate) fn call_function(&mut self,
                                ctx: &mut ExecutionContext,
                                function: &Function,
                                arguments: &[Value])
                                -> EvalResult<Option<Value>> {
        let output = function.return_type.as_ref().map(Value::on_heap);

        match &function.body {
            FunctionBody::Native(body) => body(arguments, output.as_ref()),
            FunctionBody::Script { parameter_names, body } => {
                self.execute_script_function(ctx,
                                             &function.parameters,
                                             parameter_names,
                                             body,
                                             arguments,
                                             output.as_ref())?;
            },
        }

        Ok(output)
    }

    /// Marshals call arguments against the parameter list.
    ///
    /// Reference parameters wrap the argument's storage in an External
    /// borrow, so callee writes reach the caller; value parameters receive
    /// an owned heap copy, so they cannot.
    ///
    /// # Panics
    /// Panics when the argument count does not match the parameter count;
    /// the counts are a runtime assertion.
    pub(crate) fn get_argument_values(&mut self,
                                      ctx: &mut ExecutionContext,
                                      parameters: &[TypeUsage],
                                      expressions: &[Expression])
                                      -> EvalResult<Vec<Value>> {
        assert!(parameters.len() == expressions.len(),
                "expected {} arguments, found {}",
                parameters.len(),
                expressions.len());

        let mut values = Vec::with_capacity(expressions.len());

        for (parameter, expression) in parameters.iter().zip(expressions) {
            let value = self.expect_value(ctx, expression)?;

            let marshalled = if parameter.is_reference {
                let mut wrapped = value.to_external_view();
                wrapped.type_usage.is_reference = true;
                wrapped
            } else {
                // an owned copy, so callee writes cannot reach the
                // caller's storage or a shared literal buffer
                value.to_heap_copy()
            };

            values.push(marshalled);
        }

        Ok(values)
    }

    /// Runs a script-defined function body.
    ///
    /// Parameters are registered one scope level in: reference parameters
    /// bind directly to the caller's storage, value parameters get stack
    /// storage initialized from the marshalled copy. After the body runs,
    /// the context return slot is copied into the output and the jump flag
    /// is cleared.
    fn execute_script_function(&mut self,
                               ctx: &mut ExecutionContext,
                               parameter_types: &[TypeUsage],
                               parameter_names: &[Identifier],
                               body: &Statement,
                               arguments: &[Value],
                               output: Option<&Value>)
                               -> EvalResult<()> {
        ctx.increment_scope_level();
        ctx.return_value = None;

        for ((parameter_type, parameter_name), argument) in
            parameter_types.iter().zip(parameter_names).zip(arguments)
        {
            let parameter_value = if parameter_type.is_reference {
                argument.clone()
            } else {
                let value = Value::on_stack(parameter_type, &mut ctx.stack);
                value.set_from(argument);
                value
            };

            self.register_instance_at(ctx.scope_level,
                                      parameter_type.clone(),
                                      parameter_name.clone(),
                                      parameter_value);
        }

        let result = self.execute_statement(ctx, body);

        if result.is_ok()
           && let (Some(output), Some(returned)) = (output, ctx.return_value.take())
        {
            output.set_from(&returned);
        }

        ctx.jump_flag = JumpFlag::None;
        self.decrement_scope_level(ctx);

        result
    }
}
