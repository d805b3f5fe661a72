//! Type checking (Pass B).
//!
//! A single recursive walk over every method body. Each expression either
//! yields its [`TypeId`], which is recorded in the context's `expr_types`
//! side table for the generator, or fails. The first failure aborts the
//! whole walk.
//!
//! ## Architecture
//!
//! ```text
//! TypeChecker::run
//!   └── per method: MethodChecker { env }
//!         ├── stmt.rs   statements, scopes threaded as a parameter
//!         ├── expr.rs   operators, references, arrays, allocation
//!         └── calls.rs  static and virtual calls, argument matching
//! ```
//!
//! The method environment replaces any per-node "enclosing scope" pointer:
//! each recursive call receives the scope it runs in, and the environment
//! carries what is fixed for the whole body (class, static-ness, return
//! type) plus the loop depth and the number of visible locals.

mod calls;
mod expr;
mod stmt;

use ic_ast::{ClassDecl, MethodDecl, MethodKind, Program};
use ic_core::{CompilationError, Result, Span};
use ic_registry::{ScopeId, TypeId};

use crate::context::CompilationContext;

/// Output of the type checker.
#[derive(Debug, Default)]
pub struct CheckOutput {
    pub methods_checked: usize,
    pub expressions_typed: usize,
}

/// Pass B: type-check every method body.
pub struct TypeChecker<'a, 'ast> {
    ctx: &'a mut CompilationContext<'ast>,
}

impl<'a, 'ast> TypeChecker<'a, 'ast> {
    pub fn new(ctx: &'a mut CompilationContext<'ast>) -> Self {
        Self { ctx }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, program: &'ast Program<'ast>) -> Result<CheckOutput> {
        let mut output = CheckOutput::default();
        for class in program.classes {
            for method in class.methods {
                // Library routines have no body.
                if method.kind == MethodKind::Library {
                    continue;
                }
                self.check_method(class, method)?;
                output.methods_checked += 1;
            }
        }
        output.expressions_typed = self.ctx.expr_types.len();

        tracing::debug!(
            methods = output.methods_checked,
            expressions = output.expressions_typed,
            "type checking complete"
        );
        Ok(output)
    }

    fn check_method(&mut self, class: &ClassDecl<'_>, method: &'ast MethodDecl<'ast>) -> Result<()> {
        let class_ty = self.ctx.types.class(class.name.name).ok_or_else(|| {
            CompilationError::internal(format!("class '{}' was not registered", class.name))
        })?;
        let class_scope = self.ctx.class_scope(class_ty)?;
        let scope = self.ctx.method_scope(method)?;
        let return_type = self
            .ctx
            .types
            .resolve(&method.return_type)
            .map_err(|e| e.at(method.return_type.span))?;

        let env = MethodEnv {
            class: class_ty,
            class_scope,
            is_static: method.is_static(),
            return_type,
            loop_depth: 0,
            visible: 0,
        };
        let mut checker = MethodChecker {
            ctx: &mut *self.ctx,
            env,
        };
        for stmt in method.body {
            checker.check_stmt(scope, stmt)?;
        }
        Ok(())
    }
}

/// What stays fixed while checking one method body, plus the loop depth and
/// the count of locals declared so far.
#[derive(Debug, Clone, Copy)]
struct MethodEnv {
    class: TypeId,
    class_scope: ScopeId,
    is_static: bool,
    return_type: TypeId,
    loop_depth: u32,
    /// Locals with an ordinal below this are in scope.
    visible: u32,
}

/// Checks one method body.
struct MethodChecker<'c, 'ast> {
    ctx: &'c mut CompilationContext<'ast>,
    env: MethodEnv,
}

impl<'ast> MethodChecker<'_, 'ast> {
    fn type_name(&self, ty: TypeId) -> String {
        self.ctx.types.name(ty)
    }

    fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        self.ctx.types.is_subtype(sub, sup)
    }

    /// `TypeMismatch` unless `actual` is a subtype of `expected`.
    fn expect_subtype(
        &self,
        actual: TypeId,
        expected: TypeId,
        message: &str,
        token: impl Into<String>,
        span: Span,
    ) -> Result<()> {
        if self.is_subtype(actual, expected) {
            Ok(())
        } else {
            Err(CompilationError::type_mismatch(message, token, span))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompilerOptions;
    use crate::passes::DefinitionPass;
    use bumpalo::Bump;
    use ic_ast::{AstBuilder, BinaryOp, NodeId, Stmt, UnaryOp};
    use ic_core::ErrorKind;
    use ic_registry::Resolution;

    fn check<'ast>(
        b: AstBuilder<'ast>,
        classes: &[ClassDecl<'ast>],
    ) -> Result<(CompilationContext<'ast>, &'ast Program<'ast>)> {
        let program: &'ast Program<'ast> = b.arena().alloc(b.program(classes));
        let mut ctx = CompilationContext::new(CompilerOptions::default());
        DefinitionPass::new(&mut ctx).run(program)?;
        TypeChecker::new(&mut ctx).run(program)?;
        Ok((ctx, program))
    }

    fn check_main<'ast>(b: AstBuilder<'ast>, body: &[Stmt<'ast>]) -> Result<CompilationContext<'ast>> {
        let main = b.class("Main", None, &[], &[b.entry_method(body)]);
        check(b, &[main]).map(|(ctx, _)| ctx)
    }

    fn kind_of(result: Result<CompilationContext<'_>>) -> ErrorKind {
        match result {
            Ok(_) => panic!("expected a rejection"),
            Err(err) => err.kind(),
        }
    }

    #[test]
    fn literal_sum_is_int() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let sum = b.binary(b.int(1), BinaryOp::Add, b.int(2));
        let body = [b.local(b.int_type(), "x", None), b.assign(b.var("x"), sum)];
        let ctx = check_main(b, &body).unwrap();
        assert_eq!(ctx.type_of(sum).unwrap(), TypeId::INT);
    }

    #[test]
    fn string_concatenation_is_string() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let cat = b.binary(b.string("a"), BinaryOp::Add, b.string("b"));
        let body = [b.local(b.string_type(), "s", Some(cat))];
        let ctx = check_main(b, &body).unwrap();
        assert_eq!(ctx.type_of(cat).unwrap(), TypeId::STRING);
    }

    #[test]
    fn assigning_string_to_int_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.local(b.int_type(), "x", None),
            b.at(4).assign(b.var("x"), b.string("no")),
        ];
        let err = check_main(b, &body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "Types mismatch, not of type int");
        assert_eq!(err.line(), 4);
    }

    #[test]
    fn null_assigns_to_objects_but_not_ints() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.local(b.class_type("Main"), "m", Some(b.null()))];
        assert!(check_main(b, &body).is_ok());

        let body = [b.local(b.int_type(), "x", Some(b.null()))];
        assert_eq!(kind_of(check_main(b, &body)), ErrorKind::TypeMismatch);
    }

    #[test]
    fn subclass_assigns_to_superclass() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.local(b.class_type("A"), "a", Some(b.new_object("B")))];
        let classes = [
            b.class("A", None, &[], &[]),
            b.class("B", Some("A"), &[], &[]),
            b.class("Main", None, &[], &[b.entry_method(&body)]),
        ];
        assert!(check(b, &classes).is_ok());

        let body = [b.local(b.class_type("B"), "x", Some(b.new_object("A")))];
        let classes = [
            b.class("A", None, &[], &[]),
            b.class("B", Some("A"), &[], &[]),
            b.class("Main", None, &[], &[b.entry_method(&body)]),
        ];
        assert_eq!(check(b, &classes).unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn arrays_are_not_covariant() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.local(
            b.array_type(b.class_type("A")),
            "xs",
            Some(b.new_array(b.class_type("B"), b.int(2))),
        )];
        let classes = [
            b.class("A", None, &[], &[]),
            b.class("B", Some("A"), &[], &[]),
            b.class("Main", None, &[], &[b.entry_method(&body)]),
        ];
        assert_eq!(check(b, &classes).unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn conditions_must_be_boolean() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.if_stmt(b.int(1), b.block(&[]), None)];
        let err = check_main(b, &body).unwrap_err();
        assert_eq!(err.message(), "Condition in if statement is not of type boolean");

        let body = [b.while_stmt(b.string("s"), b.block(&[]))];
        let err = check_main(b, &body).unwrap_err();
        assert_eq!(err.message(), "Condition in while statement is not of type boolean");
    }

    #[test]
    fn break_outside_loop_is_a_scope_error() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        assert_eq!(kind_of(check_main(b, &[b.break_stmt()])), ErrorKind::Scope);
        assert_eq!(kind_of(check_main(b, &[b.continue_stmt()])), ErrorKind::Scope);

        let in_if = [b.if_stmt(b.boolean(true), b.break_stmt(), None)];
        assert_eq!(kind_of(check_main(b, &in_if)), ErrorKind::Scope);
    }

    #[test]
    fn break_inside_nested_loop_is_accepted() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let inner = b.while_stmt(b.boolean(true), b.block(&[b.break_stmt()]));
        let outer = b.while_stmt(b.boolean(true), b.block(&[inner, b.continue_stmt()]));
        assert!(check_main(b, &[outer]).is_ok());
    }

    #[test]
    fn return_types_are_checked() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let get = b.method(MethodKind::Virtual, b.int_type(), "get", &[], &[b.ret(Some(b.boolean(true)))]);
        let classes = [b.class("A", None, &[], &[get]), b.class("Main", None, &[], &[b.entry_method(&[])])];
        assert_eq!(check(b, &classes).unwrap_err().kind(), ErrorKind::TypeMismatch);

        let get = b.method(MethodKind::Virtual, b.int_type(), "get", &[], &[b.ret(None)]);
        let classes = [b.class("A", None, &[], &[get]), b.class("Main", None, &[], &[b.entry_method(&[])])];
        assert_eq!(check(b, &classes).unwrap_err().kind(), ErrorKind::TypeMismatch);

        assert!(check_main(b, &[b.ret(None)]).is_ok());
    }

    #[test]
    fn this_in_static_method_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.local(b.class_type("Main"), "m", Some(b.this()))];
        let err = check_main(b, &body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Scope);
        assert_eq!(err.token(), "this");
    }

    #[test]
    fn field_from_static_method_is_a_scope_error() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.assign(b.var("count"), b.int(1))];
        let main = b.class(
            "Main",
            None,
            &[b.field_decl(b.int_type(), "count")],
            &[b.entry_method(&body)],
        );
        let err = check(b, &[main]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Scope);
        assert_eq!(err.token(), "count");
    }

    #[test]
    fn unknown_name_is_a_definition_error() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let err = check_main(b, &[b.assign(b.var("ghost"), b.int(1))]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Definition);
        assert_eq!(err.message(), "Symbol cannot be resolved");
    }

    #[test]
    fn implicit_field_resolves_in_instance_method() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let target = b.var("x");
        let set = b.method(MethodKind::Virtual, b.void_type(), "set", &[], &[b.assign(target, b.int(3))]);
        let a = b.class("A", None, &[b.field_decl(b.int_type(), "x")], &[]);
        let sub = b.class("B", Some("A"), &[], &[set]);
        let main = b.class("Main", None, &[], &[b.entry_method(&[])]);
        let (ctx, _) = check(b, &[a, sub, main]).unwrap();

        let a_scope = ctx.class_scope(ctx.types.class("A").unwrap()).unwrap();
        assert_eq!(
            ctx.scopes.resolution(NodeId::of(target)),
            Some(Resolution::Field { scope: a_scope })
        );
    }

    #[test]
    fn reference_before_inner_declaration_binds_outer_local() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let early = b.var("x");
        let inner = b.block(&[
            b.assign(early, b.int(1)),
            b.local(b.string_type(), "x", None),
        ]);
        let body = [b.local(b.int_type(), "x", None), inner];
        let main = b.class("Main", None, &[], &[b.entry_method(&body)]);
        let (ctx, program) = check(b, &[main]).unwrap();

        let method = &program.classes[0].methods[0];
        let method_scope = ctx.method_scope(method).unwrap();
        assert_eq!(ctx.type_of(early).unwrap(), TypeId::INT);
        assert_eq!(
            ctx.scopes.resolution(NodeId::of(early)),
            Some(Resolution::Local { scope: method_scope })
        );
    }

    #[test]
    fn local_used_before_declaration_is_unresolved() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.assign(b.var("y"), b.int(1)), b.local(b.int_type(), "y", None)];
        assert_eq!(kind_of(check_main(b, &body)), ErrorKind::Definition);
    }

    #[test]
    fn qualified_field_requires_declaring_class() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.local(b.class_type("A"), "a", Some(b.new_object("A"))),
            b.assign(b.field(b.var("a"), "missing"), b.int(1)),
        ];
        let classes = [
            b.class("A", None, &[b.field_decl(b.int_type(), "x")], &[]),
            b.class("Main", None, &[], &[b.entry_method(&body)]),
        ];
        let err = check(b, &classes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Definition);
        assert_eq!(err.token(), "missing");

        let body = [
            b.local(b.int_type(), "n", None),
            b.assign(b.field(b.var("n"), "x"), b.int(1)),
        ];
        assert_eq!(kind_of(check_main(b, &body)), ErrorKind::Definition);
    }

    #[test]
    fn array_rules() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let xs = || b.var("xs");
        let decl = b.local(b.array_type(b.int_type()), "xs", Some(b.new_array(b.int_type(), b.int(3))));

        let element = b.index(xs(), b.int(0));
        let ctx = check_main(b, &[decl, b.local(b.int_type(), "n", Some(element))]).unwrap();
        assert_eq!(ctx.type_of(element).unwrap(), TypeId::INT);

        let bad_index = [decl, b.assign(b.index(xs(), b.boolean(true)), b.int(1))];
        let err = check_main(b, &bad_index).unwrap_err();
        assert_eq!(err.message(), "The index of array must be of type int");

        let not_array = [b.local(b.int_type(), "n", None), b.assign(b.index(b.var("n"), b.int(0)), b.int(1))];
        let err = check_main(b, &not_array).unwrap_err();
        assert_eq!(err.message(), "Using [n] syntax on non-array type");

        let bad_size = [b.local(
            b.array_type(b.int_type()),
            "ys",
            Some(b.new_array(b.int_type(), b.string("3"))),
        )];
        let err = check_main(b, &bad_size).unwrap_err();
        assert_eq!(err.message(), "The size of array is not an integer");

        let length = b.length(xs());
        let ctx = check_main(b, &[decl, b.local(b.int_type(), "n", Some(length))]).unwrap();
        assert_eq!(ctx.type_of(length).unwrap(), TypeId::INT);

        let void_elements = [b.local(
            b.array_type(b.int_type()),
            "ys",
            Some(b.new_array(b.void_type(), b.int(3))),
        )];
        let err = check_main(b, &void_elements).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "Array elements cannot be of type void");

        let length_of_int = [
            b.local(b.int_type(), "n", Some(b.int(1))),
            b.local(b.int_type(), "k", Some(b.length(b.var("n")))),
        ];
        let err = check_main(b, &length_of_int).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "Length requested not on array type");
        assert_eq!(err.token(), "length");
    }

    #[test]
    fn new_of_undeclared_class_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.local(b.class_type("Main"), "m", Some(b.new_object("Ghost")))];
        let err = check_main(b, &body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Definition);
        assert_eq!(err.message(), "Class is undefined");
        assert_eq!(err.token(), "Ghost");
    }

    #[test]
    fn assignment_target_must_be_a_location() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let err = check_main(b, &[b.assign(b.int(1), b.int(2))]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "Assignment target is not a variable, field or array element");

        let err = check_main(b, &[b.call_stmt(b.int(1))]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "Only method calls can be used as statements");
    }

    #[test]
    fn operator_rules() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let cases = [
            (b.binary(b.int(1), BinaryOp::Add, b.string("s")), "Different operand types"),
            (b.binary(b.boolean(true), BinaryOp::Add, b.boolean(false)), "Plus operation on illegal types"),
            (b.binary(b.string("a"), BinaryOp::Mul, b.string("b")), "Math operation on non-int type"),
            (b.binary(b.int(1), BinaryOp::And, b.boolean(true)), "Logical operation on non boolean values"),
            (b.binary(b.int(1), BinaryOp::Less, b.boolean(true)), "Comparing non-int values"),
            (b.binary(b.int(1), BinaryOp::Equal, b.string("1")), "Comparing types that are not subtypes of one another"),
            (b.unary(UnaryOp::Neg, b.boolean(true)), "Math unary operation on a non-int type"),
            (b.unary(UnaryOp::Not, b.int(1)), "Logical unary operation on a non boolean type"),
        ];
        for (expr, message) in cases {
            let body = [b.local(b.bool_type(), "v", Some(expr))];
            let err = check_main(b, &body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TypeMismatch);
            assert_eq!(err.message(), message);
        }

        let nothing = || b.static_call("Main", "nothing", &[]);
        let body = [b.local(
            b.bool_type(),
            "v",
            Some(b.binary(nothing(), BinaryOp::Equal, nothing())),
        )];
        let main = b.class(
            "Main",
            None,
            &[],
            &[
                b.entry_method(&body),
                b.method(MethodKind::Static, b.void_type(), "nothing", &[], &[]),
            ],
        );
        let err = check(b, &[main]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "Cannot compare void values");
        assert_eq!(err.token(), "==");
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// `class Util { static int twice(int n) {..} int get() {..} }`
    fn util_class<'ast>(b: AstBuilder<'ast>) -> ClassDecl<'ast> {
        let twice = b.method(
            MethodKind::Static,
            b.int_type(),
            "twice",
            &[b.param(b.int_type(), "n")],
            &[b.ret(Some(b.var("n")))],
        );
        let get = b.method(MethodKind::Virtual, b.int_type(), "get", &[], &[b.ret(Some(b.int(1)))]);
        b.class("Util", None, &[], &[twice, get])
    }

    fn check_with_util<'ast>(b: AstBuilder<'ast>, body: &[Stmt<'ast>]) -> Result<CompilationContext<'ast>> {
        let main = b.class("Main", None, &[], &[b.entry_method(body)]);
        check(b, &[util_class(b), main]).map(|(ctx, _)| ctx)
    }

    #[test]
    fn well_formed_calls_are_typed_by_return_type() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let twice = b.static_call("Util", "twice", &[b.int(2)]);
        let get = b.call_on(b.var("u"), "get", &[]);
        let body = [
            b.local(b.class_type("Util"), "u", Some(b.new_object("Util"))),
            b.local(b.int_type(), "a", Some(twice)),
            b.local(b.int_type(), "c", Some(get)),
        ];
        let ctx = check_with_util(b, &body).unwrap();
        assert_eq!(ctx.type_of(twice).unwrap(), TypeId::INT);
        assert_eq!(ctx.type_of(get).unwrap(), TypeId::INT);
    }

    #[test]
    fn wrong_argument_count_is_an_arity_error() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.static_call("Util", "twice", &[b.int(1), b.int(2)]);
        let err = check_with_util(b, &[b.local(b.int_type(), "r", Some(call))]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
        assert_eq!(err.message(), "Wrong number of arguments passed to method");
        assert_eq!(err.token(), "twice");

        let call = b.call_on(b.new_object("Util"), "get", &[b.int(1)]);
        let err = check_with_util(b, &[b.local(b.int_type(), "r", Some(call))]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arity);
        assert_eq!(err.token(), "get");
    }

    #[test]
    fn argument_must_be_a_subtype_of_its_parameter() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.static_call("Util", "twice", &[b.string("s")]);
        let err = check_with_util(b, &[b.local(b.int_type(), "r", Some(call))]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.message(), "Wrong argument type passed to method");
        assert_eq!(err.token(), "\"s\"");
    }

    #[test]
    fn class_qualified_call_requires_a_static_method() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.static_call("Util", "get", &[]);
        let err = check_with_util(b, &[b.local(b.int_type(), "r", Some(call))]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Scope);
        assert_eq!(err.message(), "Method is not static");
        assert_eq!(err.token(), "get");
    }

    #[test]
    fn receiver_call_to_static_method_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.local(b.class_type("Util"), "u", Some(b.new_object("Util"))),
            b.local(b.int_type(), "r", Some(b.call_on(b.var("u"), "twice", &[b.int(1)]))),
        ];
        let err = check_with_util(b, &body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Scope);
        assert_eq!(err.message(), "External call to static method");
        assert_eq!(err.token(), "twice");
    }

    #[test]
    fn unqualified_virtual_call_from_static_body_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.local(b.int_type(), "r", Some(b.call("get", &[])))];
        let get = b.method(MethodKind::Virtual, b.int_type(), "get", &[], &[b.ret(Some(b.int(1)))]);
        let main = b.class("Main", None, &[], &[b.entry_method(&body), get]);
        let err = check(b, &[main]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Scope);
        assert_eq!(err.message(), "Calling virtual method from static scope");
        assert_eq!(err.token(), "get");
    }

    #[test]
    fn unknown_method_or_class_is_a_definition_error() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.static_call("Util", "missing", &[]);
        let err = check_with_util(b, &[b.call_stmt(call)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Definition);
        assert_eq!(err.message(), "Method not found");
        assert_eq!(err.token(), "missing");

        let call = b.static_call("Ghost", "twice", &[b.int(1)]);
        let err = check_with_util(b, &[b.call_stmt(call)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Definition);
        assert_eq!(err.message(), "Class does not exist");
        assert_eq!(err.token(), "Ghost");
    }
}
