//! Seam to the external navigation compiler.
//!
//! Cell, pre and post programs are opaque text in the data model. Turning
//! them into VM instructions is the job of a [`NavCompiler`]; the table
//! builders only need the resulting byte sequence, which must consist of
//! whole 8-byte instructions.

use std::fmt;

use dvdforged_common::GroupRole;

use crate::{Error, Result};

/// Size of one VM instruction.
pub const COMMAND_LEN: usize = 8;

/// Source text of a navigation program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(transparent))]
pub struct NavProgram(String);

impl NavProgram {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Where a compiled program will be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSlot {
    Pre,
    Post,
    /// Command executed at the end of the given cell (0-based within the PGC).
    Cell(usize),
}

/// What the compiler knows about the program being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileContext {
    pub role: GroupRole,
    /// 0-based PGC index within its group.
    pub pgc: usize,
    pub slot: CommandSlot,
    pub num_buttons: usize,
}

impl fmt::Display for CompileContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = match self.slot {
            CommandSlot::Pre => "pre commands".to_string(),
            CommandSlot::Post => "post commands".to_string(),
            CommandSlot::Cell(c) => format!("cell {} command", c + 1),
        };
        write!(f, "{} of {} PGC {}", slot, self.role, self.pgc + 1)
    }
}

/// `compile(programText, context) -> bytes | error`.
pub trait NavCompiler {
    fn compile(&self, program: &NavProgram, ctx: &CompileContext) -> Result<Vec<u8>>;
}

/// Compile `program` and check the result is whole instructions.
pub(crate) fn compile_checked(
    compiler: &dyn NavCompiler,
    program: &NavProgram,
    ctx: &CompileContext,
) -> Result<Vec<u8>> {
    let code = compiler.compile(program, ctx)?;
    if code.len() % COMMAND_LEN != 0 {
        return Err(Error::compile(
            ctx.to_string(),
            format!("{} bytes is not a whole number of instructions", code.len()),
        ));
    }
    Ok(code)
}

/// Compiler for programs that are already assembled.
///
/// The text is a sequence of hex bytes; whitespace, `;` and `,` separate
/// instructions and are ignored.
///
/// ```
/// use dvdforged_common::GroupRole;
/// use dvdforged_ifo::nav::{CommandSlot, CompileContext, NavCompiler, NavProgram, RawCommandCompiler};
///
/// let ctx = CompileContext { role: GroupRole::VideoManagerMenu, pgc: 0, slot: CommandSlot::Pre, num_buttons: 0 };
/// let code = RawCommandCompiler.compile(&NavProgram::new("30 02 00 00 00 01 00 00"), &ctx).unwrap();
/// assert_eq!(code, vec![0x30, 0x02, 0, 0, 0, 0x01, 0, 0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCommandCompiler;

impl NavCompiler for RawCommandCompiler {
    fn compile(&self, program: &NavProgram, ctx: &CompileContext) -> Result<Vec<u8>> {
        let digits: String = program
            .text()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ';' && *c != ',')
            .collect();
        let code =
            hex::decode(&digits).map_err(|e| Error::compile(ctx.to_string(), e.to_string()))?;
        if code.len() % COMMAND_LEN != 0 {
            return Err(Error::compile(
                ctx.to_string(),
                format!("expected 8-byte instructions, got {} bytes", code.len()),
            ));
        }
        Ok(code)
    }
}
