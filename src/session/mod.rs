/// Compile and export entry points.
pub mod compile_session;

pub use compile_session::{CompileReport, CompileSession, CompiledSequence};
