//! IC Compiler
//!
//! Semantic analysis and LIR generation for IC programs.
//!
//! ## Architecture
//!
//! - **Pass A (Definition)**: register every class, build the scope tree,
//!   check declarations and signatures, find the entry method
//! - **Pass B (Type checking)**: type every expression and resolve every
//!   reference inside method bodies
//! - **Layout**: field offsets and dispatch slots per class
//! - **Generation**: LIR text, baseline or pressure-aware
//!
//! Each stage reads and extends one [`CompilationContext`]; the first error
//! stops the pipeline.
//!
//! ## Modules
//!
//! - [`context`]: per-run compilation context
//! - [`passes`]: Pass A
//! - [`check`]: Pass B
//! - [`layout`]: class layouts and dispatch tables
//! - [`weights`]: register-pressure estimates
//! - [`lir`]: LIR operands, instructions, labels, strings, runtime checks
//! - [`codegen`]: LIR generation
//! - [`options`]: compiler options

pub mod check;
pub mod codegen;
pub mod context;
pub mod layout;
pub mod lir;
pub mod options;
pub mod passes;
pub mod weights;

pub use check::{CheckOutput, TypeChecker};
pub use codegen::{CodeGenerator, LirProgram, Strategy};
pub use context::{CompilationContext, EntryPoint};
pub use layout::{ClassLayout, LayoutTable, MethodEntry};
pub use options::CompilerOptions;
pub use passes::{DefinitionOutput, DefinitionPass};
pub use weights::{RegisterWeight, WeightTable};

pub use ic_core::{CompilationError, ErrorKind, Result};

use ic_ast::Program;

/// Run both analysis passes and build the class layouts.
///
/// On success `ctx` holds the type registry, scope tree, expression types
/// and layouts the generator needs.
#[tracing::instrument(level = "debug", skip_all)]
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn analyze<'ast>(ctx: &mut CompilationContext<'ast>, program: &'ast Program<'ast>) -> Result<()> {
    let result = run_analysis(ctx, program);
    if let Err(err) = &result {
        tracing::debug!(kind = ?err.kind(), line = err.line(), "program rejected: {}", err);
    }
    result
}

fn run_analysis<'ast>(ctx: &mut CompilationContext<'ast>, program: &'ast Program<'ast>) -> Result<()> {
    let defined = DefinitionPass::new(ctx).run(program)?;
    let checked = TypeChecker::new(ctx).run(program)?;
    ctx.layouts = LayoutTable::build(&ctx.types, &ctx.scopes)?;
    tracing::debug!(
        classes = defined.classes_defined,
        methods = checked.methods_checked,
        scopes = ctx.scopes.len(),
        "analysis complete"
    );
    Ok(())
}

/// Generate LIR for an analyzed program, with the strategy the context's
/// options select.
pub fn generate<'ast>(ctx: &CompilationContext<'ast>, program: &'ast Program<'ast>) -> Result<LirProgram> {
    let strategy = if ctx.options.optimize {
        Strategy::PressureAware
    } else {
        Strategy::Baseline
    };
    CodeGenerator::new(ctx, strategy).generate(program)
}
