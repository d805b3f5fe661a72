//! IC compiler front door.
//!
//! Takes a parsed program tree and either rejects it with a single
//! [`CompilationError`] or returns the complete LIR text.
//!
//! ```
//! use bumpalo::Bump;
//! use ic_ast::{AstBuilder, BinaryOp};
//! use icc::{Compiler, CompilerOptions};
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let sum = b.binary(b.int(1), BinaryOp::Add, b.int(2));
//! let body = [b.local(b.int_type(), "x", None), b.assign(b.var("x"), sum)];
//! let program = b.program(&[b.class("Main", None, &[], &[b.entry_method(&body)])]);
//!
//! let compilation = Compiler::new(CompilerOptions::default()).compile(&program).unwrap();
//! assert!(compilation.lir.contains("Move R0,x2\nReturn 9999\n"));
//! ```
//!
//! Parsing, pretty-printing and file handling belong to the caller.

pub use ic_ast as ast;
pub use ic_compiler::{CompilationError, CompilerOptions, ErrorKind, Result, Strategy};

use ic_ast::Program;
use ic_compiler::CompilationContext;

/// Everything produced for an accepted program.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// The LIR program text.
    pub lir: String,
    /// Numbered type table dump.
    pub type_table: String,
    /// Scope tree dump.
    pub symbol_tables: String,
    pub stats: CompilationStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilationStats {
    pub classes: usize,
    pub methods: usize,
    pub instructions: usize,
    pub string_literals: usize,
}

/// Result of analysis alone.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub type_table: String,
    pub symbol_tables: String,
    /// `Class.method` of the entry method.
    pub entry: String,
}

/// Runs the pipeline with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Analyze `program` without generating code.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn analyze<'ast>(&self, program: &'ast Program<'ast>) -> Result<Analysis> {
        let mut ctx = CompilationContext::new(self.options.clone());
        ic_compiler::analyze(&mut ctx, program)?;
        let entry = match ctx.entry {
            Some(entry) => format!("{}.{}", ctx.types.name(entry.class), entry.method.name),
            None => {
                return Err(CompilationError::internal(
                    "analysis accepted a program without an entry method",
                ));
            }
        };
        Ok(Analysis {
            type_table: ctx.types.to_string(),
            symbol_tables: ctx.scopes.dump(&ctx.types),
            entry,
        })
    }

    /// Analyze `program` and generate its LIR.
    #[tracing::instrument(level = "debug", skip_all, fields(optimize = self.options.optimize))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile<'ast>(&self, program: &'ast Program<'ast>) -> Result<Compilation> {
        let mut ctx = CompilationContext::new(self.options.clone());
        ic_compiler::analyze(&mut ctx, program)?;
        let output = ic_compiler::generate(&ctx, program)?;

        let stats = CompilationStats {
            classes: ctx.layouts.len(),
            methods: output.methods,
            instructions: output.instructions,
            string_literals: output.string_literals,
        };
        tracing::debug!(
            classes = stats.classes,
            methods = stats.methods,
            instructions = stats.instructions,
            "compilation complete"
        );
        Ok(Compilation {
            lir: output.text,
            type_table: ctx.types.to_string(),
            symbol_tables: ctx.scopes.dump(&ctx.types),
            stats,
        })
    }
}

/// Compile `program` with `options`.
pub fn compile<'ast>(program: &'ast Program<'ast>, options: CompilerOptions) -> Result<Compilation> {
    Compiler::new(options).compile(program)
}

/// Analyze `program` with `options` without generating code.
pub fn analyze<'ast>(program: &'ast Program<'ast>, options: CompilerOptions) -> Result<Analysis> {
    Compiler::new(options).analyze(program)
}
