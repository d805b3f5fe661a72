//! LIR code generation.
//!
//! Translates the checked program into LIR text. Every statement starts at
//! register `R0`; an expression evaluated at base register `d` may use `Rd`
//! and above and returns an [`Operand`] saying where its value is.
//!
//! ## Strategies
//!
//! - [`Strategy::Baseline`]: a binary node always evaluates its left operand
//!   at `d` and its right at `d + 1`, loading both into registers.
//! - [`Strategy::PressureAware`]: the operand with the larger register
//!   weight goes first (at `d`), and a literal or local right operand is used
//!   in place instead of being loaded.
//!
//! ## Output
//!
//! ```text
//! # string literals       fixed error strings, then str0, str1, ...
//! # class dispatch tables _DV_<Class>: [...] and field offsets
//! # runtime checks        __checkNullRef, __checkArrayAccess, ...
//! # methods               _<Class>_<method>: ...
//! # main method           _ic_main: ...
//! _error_exit:
//! ```

mod calls;
mod expr;
mod stmt;

use std::fmt::Write;

use ic_ast::{BaseType, ClassDecl, MethodDecl, MethodKind, Program};
use ic_core::{CompilationError, Result};
use ic_registry::TypeId;

use crate::context::CompilationContext;
use crate::lir::{LabelCounter, LirEmitter, LoopStack, Op, Operand, RuntimeCheck, StringTable};
use crate::lir::runtime::ERROR_EXIT;
use crate::weights::WeightTable;

/// Label of the entry method.
pub const ENTRY_LABEL: &str = "_ic_main";

/// Operand evaluation order for binary nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Baseline,
    PressureAware,
}

/// The generated program.
#[derive(Debug, Clone)]
pub struct LirProgram {
    pub text: String,
    pub methods: usize,
    pub instructions: usize,
    pub string_literals: usize,
}

/// Generates LIR for one checked program.
pub struct CodeGenerator<'a, 'ast> {
    ctx: &'a CompilationContext<'ast>,
    strategy: Strategy,
    weights: WeightTable,
    strings: StringTable,
    labels: LabelCounter,
    loops: LoopStack,
    out: LirEmitter,
    /// Class whose method is being generated.
    class: TypeId,
    instructions: usize,
}

impl<'a, 'ast> CodeGenerator<'a, 'ast> {
    pub fn new(ctx: &'a CompilationContext<'ast>, strategy: Strategy) -> Self {
        Self {
            ctx,
            strategy,
            weights: WeightTable::default(),
            strings: StringTable::new(),
            labels: LabelCounter::default(),
            loops: LoopStack::new(),
            out: LirEmitter::new(),
            class: TypeId::VOID,
            instructions: 0,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(strategy = ?self.strategy))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(mut self, program: &'ast Program<'ast>) -> Result<LirProgram> {
        if self.strategy == Strategy::PressureAware {
            self.weights = WeightTable::estimate(program);
        }

        let mut methods = Vec::new();
        let mut main = None;
        for class in program.classes.iter().filter(|class| !class.is_library()) {
            self.class = self.class_id(class)?;
            for method in class.methods {
                if method.kind == MethodKind::Library {
                    continue;
                }
                let text = self.method(class, method)?;
                if self.ctx.is_entry(method) {
                    main = Some(text);
                } else {
                    methods.push(text);
                }
            }
        }
        let main = main.ok_or_else(|| CompilationError::internal("entry method was not generated"))?;

        let mut text = String::new();
        if self.strategy == Strategy::PressureAware {
            text.push_str("# optimized translation\n");
        }
        text.push_str("# string literals\n");
        for check in RuntimeCheck::ALL {
            check.render_message(&mut text);
        }
        self.strings.render(&mut text);
        text.push('\n');

        text.push_str("# class dispatch tables\n");
        self.render_dispatch_tables(program, &mut text)?;

        text.push_str("# runtime checks\n");
        for check in RuntimeCheck::ALL {
            check.render(&mut text);
        }

        text.push_str("# methods\n");
        for method in &methods {
            text.push_str(method);
            text.push('\n');
        }
        text.push_str("# main method\n");
        text.push_str(&main);
        let _ = write!(text, "\n{}:\n", ERROR_EXIT);

        let output = LirProgram {
            text,
            methods: methods.len() + 1,
            instructions: self.instructions,
            string_literals: self.strings.len(),
        };
        tracing::debug!(
            methods = output.methods,
            instructions = output.instructions,
            labels = self.labels.issued(),
            "code generation complete"
        );
        Ok(output)
    }

    fn class_id(&self, class: &ClassDecl<'_>) -> Result<TypeId> {
        self.ctx.types.class(class.name.name).ok_or_else(|| {
            CompilationError::internal(format!("class '{}' was not registered", class.name))
        })
    }

    fn render_dispatch_tables(&self, program: &Program<'_>, text: &mut String) -> Result<()> {
        for class in program.classes.iter().filter(|class| !class.is_library()) {
            let layout = self.ctx.layouts.require(self.class_id(class)?)?;
            let _ = writeln!(
                text,
                "{}: [{}]",
                layout.dispatch_label(),
                layout.dispatch_table().join(",")
            );
            text.push_str("# fields offsets:\n");
            for (name, offset) in layout.fields() {
                let _ = writeln!(text, "# {}: {}", name, offset);
            }
            text.push('\n');
        }
        Ok(())
    }

    fn method(&mut self, class: &ClassDecl<'_>, method: &'ast MethodDecl<'ast>) -> Result<String> {
        let scope = self.ctx.method_scope(method)?;
        self.out = LirEmitter::new();
        if self.ctx.is_entry(method) {
            self.out.label(ENTRY_LABEL);
        } else {
            self.out.label(&format!("_{}_{}", class.name, method.name));
        }

        for stmt in method.body {
            self.stmt(scope, stmt)?;
        }
        let returns_void =
            matches!(method.return_type.base, BaseType::Void) && !method.return_type.is_array();
        if returns_void && !method.ends_with_return() {
            self.out.emit(Op::Return, 9999);
        }

        self.instructions += self.out.instruction_count();
        Ok(std::mem::take(&mut self.out).finish())
    }

    // ========================================================================
    // Shared emission helpers
    // ========================================================================

    /// `StaticCall <check>(<formal>=R<n>,...),Rdummy`
    fn runtime_check(&mut self, check: RuntimeCheck, registers: &[u32]) {
        let bindings: Vec<String> = check
            .formals()
            .iter()
            .zip(registers)
            .map(|(formal, reg)| format!("{}=R{}", formal, reg))
            .collect();
        self.out.emit(
            Op::StaticCall,
            format_args!("{}({}),{}", check.routine(), bindings.join(","), crate::lir::DISCARD),
        );
    }

    /// A value usable as the source of a store.
    ///
    /// Stores take a register or an immediate; the pressure-aware strategy
    /// keeps literals in place, everything else is loaded into `Rd`.
    fn store_source(&mut self, value: Operand, d: u32) -> Operand {
        match value {
            Operand::Literal(_) if self.strategy == Strategy::PressureAware => value,
            _ => self.out.materialize(&value, d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::TypeChecker;
    use crate::layout::LayoutTable;
    use crate::options::CompilerOptions;
    use crate::passes::DefinitionPass;
    use bumpalo::Bump;
    use ic_ast::{AstBuilder, BinaryOp, Stmt};
    use pretty_assertions::assert_eq;

    fn lower<'ast>(b: AstBuilder<'ast>, classes: &[ClassDecl<'ast>], strategy: Strategy) -> LirProgram {
        let program: &'ast Program<'ast> = b.arena().alloc(b.program(classes));
        let mut ctx = CompilationContext::new(CompilerOptions::default());
        DefinitionPass::new(&mut ctx).run(program).unwrap();
        TypeChecker::new(&mut ctx).run(program).unwrap();
        ctx.layouts = LayoutTable::build(&ctx.types, &ctx.scopes).unwrap();
        CodeGenerator::new(&ctx, strategy).generate(program).unwrap()
    }

    /// The entry method's text.
    fn main_text(text: &str) -> String {
        let start = text.find("_ic_main:\n").unwrap();
        let end = text.rfind("\n_error_exit:").unwrap();
        text[start..end].to_string()
    }

    fn lower_main<'ast>(b: AstBuilder<'ast>, body: &[Stmt<'ast>], strategy: Strategy) -> String {
        let main = b.class("Main", None, &[], &[b.entry_method(body)]);
        main_text(&lower(b, &[main], strategy).text)
    }

    #[test]
    fn literal_sum_is_stored_then_default_return() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.local(b.int_type(), "x", None),
            b.assign(b.var("x"), b.binary(b.int(1), BinaryOp::Add, b.int(2))),
        ];
        assert_eq!(
            lower_main(b, &body, Strategy::Baseline),
            "_ic_main:\nMove 1,R0\nMove 2,R1\nAdd R1,R0\nMove R0,x2\nReturn 9999\n"
        );
        assert_eq!(
            lower_main(b, &body, Strategy::PressureAware),
            "_ic_main:\nMove 1,R0\nAdd 2,R0\nMove R0,x2\nReturn 9999\n"
        );
    }

    #[test]
    fn literal_division_by_zero_keeps_guard() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [b.local(
            b.int_type(),
            "y",
            Some(b.binary(b.int(1), BinaryOp::Div, b.int(0))),
        )];
        for strategy in [Strategy::Baseline, Strategy::PressureAware] {
            let text = lower_main(b, &body, strategy);
            assert!(
                text.contains("Move 0,R1\nStaticCall __checkZero(b=R1),Rdummy\nDiv R1,R0\n"),
                "{strategy:?}: {text}"
            );
        }
    }

    #[test]
    fn heavier_operand_is_evaluated_first() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let product = b.paren(b.binary(b.var("a"), BinaryOp::Mul, b.var("a")));
        let body = [
            b.local(b.int_type(), "a", Some(b.int(1))),
            b.local(b.int_type(), "r", Some(b.binary(b.var("a"), BinaryOp::Sub, product))),
        ];
        assert_eq!(
            lower_main(b, &body, Strategy::PressureAware),
            "_ic_main:\nMove 1,a2\nMove a2,R0\nMul a2,R0\nMove a2,R1\nSub R0,R1\nMove R1,R0\nMove R0,r2\nReturn 9999\n"
        );
    }

    #[test]
    fn if_else_jumps_over_branches() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.local(b.int_type(), "x", None),
            b.local(b.bool_type(), "c", Some(b.boolean(true))),
            b.if_stmt(
                b.var("c"),
                b.assign(b.var("x"), b.int(1)),
                Some(b.assign(b.var("x"), b.int(2))),
            ),
        ];
        assert_eq!(
            lower_main(b, &body, Strategy::Baseline),
            "_ic_main:\n\
             Move 1,R0\n\
             Move R0,c2\n\
             Move c2,R0\n\
             Compare 0,R0\n\
             JumpTrue _false_label0\n\
             Move 1,R0\n\
             Move R0,x2\n\
             Jump _end_label0\n\
             _false_label0:\n\
             Move 2,R0\n\
             Move R0,x2\n\
             _end_label0:\n\
             Return 9999\n"
        );
    }

    #[test]
    fn break_and_continue_bind_innermost_loop() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let inner = b.while_stmt(b.boolean(true), b.block(&[b.break_stmt()]));
        let body = [b.while_stmt(b.boolean(true), b.block(&[inner, b.continue_stmt()]))];
        assert_eq!(
            lower_main(b, &body, Strategy::Baseline),
            "_ic_main:\n\
             _while_cond_label0:\n\
             Move 1,R0\n\
             Compare 0,R0\n\
             JumpTrue _end_label0\n\
             _while_cond_label1:\n\
             Move 1,R0\n\
             Compare 0,R0\n\
             JumpTrue _end_label1\n\
             Jump _end_label1\n\
             Jump _while_cond_label1\n\
             _end_label1:\n\
             Jump _while_cond_label0\n\
             Jump _while_cond_label0\n\
             _end_label0:\n\
             Return 9999\n"
        );
    }

    #[test]
    fn comparison_inside_short_circuit_and() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let less = b.binary(b.int(1), BinaryOp::Less, b.int(2));
        let body = [b.local(
            b.bool_type(),
            "t",
            Some(b.binary(less, BinaryOp::And, b.boolean(true))),
        )];
        assert_eq!(
            lower_main(b, &body, Strategy::Baseline),
            "_ic_main:\n\
             Move 1,R0\n\
             Move 2,R1\n\
             Compare R1,R0\n\
             JumpL _true_label1\n\
             Move 0,R0\n\
             Jump _end_label1\n\
             _true_label1:\n\
             Move 1,R0\n\
             _end_label1:\n\
             Compare 0,R0\n\
             JumpTrue _false_label0\n\
             Move 1,R0\n\
             Compare 0,R0\n\
             JumpTrue _false_label0\n\
             Move 1,R0\n\
             Jump _end_label0\n\
             _false_label0:\n\
             Move 0,R0\n\
             _end_label0:\n\
             Move R0,t2\n\
             Return 9999\n"
        );
    }

    #[test]
    fn string_literals_are_deduplicated() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let cat = b.binary(b.string("a"), BinaryOp::Add, b.string("b"));
        let again = b.binary(b.string("b"), BinaryOp::Add, b.string("a"));
        let body = [
            b.local(b.string_type(), "s", Some(cat)),
            b.local(b.string_type(), "t", Some(again)),
        ];
        let main = b.class("Main", None, &[], &[b.entry_method(&body)]);
        let output = lower(b, &[main], Strategy::Baseline);
        assert_eq!(output.string_literals, 2);
        assert!(output.text.contains("str_zero: \"Runtime Error: Division by zero!\"\nstr0: \"a\"\nstr1: \"b\"\n\n"));
        assert!(
            main_text(&output.text)
                .contains("Move str1,R0\nMove str0,R1\nLibrary __stringCat(R0,R1),R0\nMove R0,t2\n")
        );
    }

    #[test]
    fn arrays_are_guarded() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.local(
                b.array_type(b.int_type()),
                "arr",
                Some(b.new_array(b.int_type(), b.int(3))),
            ),
            b.assign(b.index(b.var("arr"), b.int(0)), b.length(b.var("arr"))),
        ];
        assert_eq!(
            lower_main(b, &body, Strategy::Baseline),
            "_ic_main:\n\
             Move 3,R0\n\
             Mul 4,R0\n\
             StaticCall __checkSize(n=R0),Rdummy\n\
             Library __allocateArray(R0),R0\n\
             Move R0,arr2\n\
             Move arr2,R0\n\
             StaticCall __checkNullRef(a=R0),Rdummy\n\
             ArrayLength R0,R0\n\
             Move arr2,R1\n\
             StaticCall __checkNullRef(a=R1),Rdummy\n\
             Move 0,R2\n\
             StaticCall __checkArrayAccess(a=R1,i=R2),Rdummy\n\
             MoveArray R0,R1[R2]\n\
             Return 9999\n"
        );
    }

    #[test]
    fn heavier_index_is_evaluated_before_the_array() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let body = [
            b.local(
                b.array_type(b.int_type()),
                "arr",
                Some(b.new_array(b.int_type(), b.int(3))),
            ),
            b.local(b.int_type(), "i", Some(b.int(1))),
            b.local(
                b.int_type(),
                "n",
                Some(b.index(b.var("arr"), b.binary(b.var("i"), BinaryOp::Mul, b.var("i")))),
            ),
        ];

        let optimized = lower_main(b, &body, Strategy::PressureAware);
        assert!(
            optimized.contains(
                "Move i2,R0\n\
                 Mul i2,R0\n\
                 Move arr2,R1\n\
                 StaticCall __checkNullRef(a=R1),Rdummy\n\
                 StaticCall __checkArrayAccess(a=R1,i=R0),Rdummy\n\
                 MoveArray R1[R0],R0\n\
                 Move R0,n2\n"
            ),
            "{optimized}"
        );

        let baseline = lower_main(b, &body, Strategy::Baseline);
        assert!(
            baseline.contains(
                "Move arr2,R0\n\
                 StaticCall __checkNullRef(a=R0),Rdummy\n\
                 Move i2,R1\n\
                 Move i2,R2\n\
                 Mul R2,R1\n\
                 StaticCall __checkArrayAccess(a=R0,i=R1),Rdummy\n\
                 MoveArray R0[R1],R0\n\
                 Move R0,n2\n"
            ),
            "{baseline}"
        );
    }

    #[test]
    fn objects_fields_and_virtual_calls() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let get = b.method(
            MethodKind::Virtual,
            b.int_type(),
            "get",
            &[],
            &[b.ret(Some(b.var("x")))],
        );
        let a = b.class("A", None, &[b.field_decl(b.int_type(), "x")], &[get]);
        let body = [
            b.local(b.class_type("A"), "a", Some(b.new_object("A"))),
            b.local(b.int_type(), "v", Some(b.call_on(b.var("a"), "get", &[]))),
            b.assign(b.field(b.var("a"), "x"), b.int(5)),
        ];
        let main = b.class("Main", None, &[], &[b.entry_method(&body)]);
        let output = lower(b, &[a, main], Strategy::Baseline);

        assert!(output.text.contains(
            "# class dispatch tables\n_DV_A: [_A_get]\n# fields offsets:\n# x: 1\n\n_DV_Main: []\n# fields offsets:\n\n"
        ));
        assert!(output.text.contains(
            "# methods\n_A_get:\nMove this,R0\nMoveField R0.1,R0\nReturn R0\n\n# main method\n"
        ));
        assert_eq!(
            main_text(&output.text),
            "_ic_main:\n\
             Library __allocateObject(8),R0\n\
             MoveField _DV_A,R0.0\n\
             Move R0,a2\n\
             Move a2,R0\n\
             StaticCall __checkNullRef(a=R0),Rdummy\n\
             VirtualCall R0.0(),R0\n\
             Move R0,v2\n\
             Move 5,R0\n\
             Move a2,R1\n\
             StaticCall __checkNullRef(a=R1),Rdummy\n\
             MoveField R0,R1.1\n\
             Return 9999\n"
        );
        assert_eq!(output.methods, 2);
    }

    #[test]
    fn overrides_dispatch_through_inherited_slot() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let f = b.method(MethodKind::Virtual, b.void_type(), "f", &[], &[]);
        let a = b.class("A", None, &[], &[f]);
        let sub = b.class("B", Some("A"), &[], &[f]);
        let body = [
            b.local(b.class_type("A"), "a", Some(b.new_object("B"))),
            b.call_stmt(b.call_on(b.var("a"), "f", &[])),
        ];
        let main = b.class("Main", None, &[], &[b.entry_method(&body)]);
        let output = lower(b, &[a, sub, main], Strategy::Baseline);

        assert!(output.text.contains("_DV_A: [_A_f]\n"));
        assert!(output.text.contains("_DV_B: [_B_f]\n"));
        assert!(output.text.contains("_A_f:\nReturn 9999\n\n_B_f:\nReturn 9999\n\n"));
        assert!(output.text.contains("MoveField _DV_B,R0.0\n"));
        assert!(output.text.contains("VirtualCall R0.0(),Rdummy\n"));
    }

    #[test]
    fn static_calls_bind_formals_by_name() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let n = b.param(b.int_type(), "n");
        let twice = b.method(
            MethodKind::Static,
            b.int_type(),
            "twice",
            &[n],
            &[b.ret(Some(b.binary(b.var("n"), BinaryOp::Add, b.var("n"))))],
        );
        let one = b.method(MethodKind::Static, b.int_type(), "one", &[], &[b.ret(Some(b.int(1)))]);
        let g = b.method(MethodKind::Virtual, b.int_type(), "g", &[], &[b.ret(Some(b.call("one", &[])))]);
        let util = b.class("Util", None, &[], &[twice, one, g]);
        let body = [b.local(
            b.int_type(),
            "r",
            Some(b.static_call("Util", "twice", &[b.int(3)])),
        )];
        let main = b.class("Main", None, &[], &[b.entry_method(&body)]);
        let output = lower(b, &[util, main], Strategy::PressureAware);

        assert!(output.text.starts_with("# optimized translation\n# string literals\n"));
        assert!(output.text.contains("_Util_twice:\nMove n2,R0\nAdd n2,R0\nReturn R0\n\n"));
        assert!(output.text.contains("_Util_g:\nStaticCall _Util_one(),R0\nReturn R0\n\n"));
        assert!(output.text.contains("_DV_Util: [_Util_g]\n"));
        assert_eq!(
            main_text(&output.text),
            "_ic_main:\nMove 3,R0\nStaticCall _Util_twice(n2=R0),R0\nMove R0,r2\nReturn 9999\n"
        );
    }

    #[test]
    fn library_routines_lower_to_library_calls() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let s = b.param(b.string_type(), "s");
        let println = b.method(MethodKind::Library, b.void_type(), "println", &[s], &[]);
        let library = b.class("Library", None, &[], &[println]);
        let body = [b.call_stmt(b.static_call("Library", "println", &[b.string("hi")]))];
        let main = b.class("Main", None, &[], &[b.entry_method(&body)]);
        let output = lower(b, &[library, main], Strategy::Baseline);

        assert!(!output.text.contains("_DV_Library"));
        assert!(output.text.contains("str0: \"hi\"\n"));
        assert_eq!(
            main_text(&output.text),
            "_ic_main:\nMove str0,R0\nLibrary __println(R0),Rdummy\nReturn 9999\n"
        );
    }

    #[test]
    fn program_sections_in_order() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let main = b.class("Main", None, &[], &[b.entry_method(&[])]);
        let output = lower(b, &[main], Strategy::Baseline);
        let text = &output.text;

        assert!(text.starts_with(
            "# string literals\nstr_null_ref: \"Runtime Error: Null pointer dereference!\"\n"
        ));
        assert!(text.contains(
            "str_zero: \"Runtime Error: Division by zero!\"\n\n# class dispatch tables\n_DV_Main: []\n# fields offsets:\n\n# runtime checks\n__checkNullRef:\n"
        ));
        assert!(text.ends_with("# methods\n# main method\n_ic_main:\nReturn 9999\n\n_error_exit:\n"));
        let checks = text.find("# runtime checks").unwrap();
        assert!(checks < text.find("__checkZero:").unwrap());
        assert!(text.find("__checkZero:").unwrap() < text.find("# methods").unwrap());
        assert_eq!(output.methods, 1);
        assert_eq!(output.instructions, 1);
    }
}
