use std::io::{Read, Write};

use crate::{
    config::CompilerConfig,
    lexer::{lexer::Lexer, Position, TokenKind},
};

use super::{label::LabelAllocator, loop_stack::LoopStack, CodegenError, CompileSummary};

/*
    Generated programs follow the i386 linux `int $0x80` ABI:

    - EDI: Data Pointer, the only register the program logic touches
    - EAX/EBX/ECX/EDX: syscall number and arguments, clobbered by read/write/exit

    Loops are emitted as `if (*dp != 0) do { ... } while (*dp != 0);`
    so each side of the loop costs a single conditional jump.
*/

const SYS_EXIT: u32 = 1;
const SYS_READ: u32 = 3;
const SYS_WRITE: u32 = 4;

const STDIN: u32 = 0;
const STDOUT: u32 = 1;

pub struct Codegen<W: Write> {
    out: W,
    labels: LabelAllocator,
    loops: LoopStack,
    summary: CompileSummary,
}

impl<W: Write> Codegen<W> {
    pub fn new(out: W) -> Result<Codegen<W>, CodegenError> {
        Ok(Codegen {
            out,
            labels: LabelAllocator::new(),
            loops: LoopStack::new()?,
            summary: CompileSummary::default(),
        })
    }

    /// Reserves the cell buffer and points EDI at it
    pub fn prologue(&mut self, config: &CompilerConfig) -> Result<(), CodegenError> {
        writeln!(self.out, ".section .bss")?;
        writeln!(self.out, "\t.lcomm buffer, {}", config.cell_count)?;
        writeln!(self.out, ".section .text")?;
        writeln!(self.out, ".globl _start")?;
        writeln!(self.out, "_start:")?;
        writeln!(self.out, "\tmovl $buffer, %edi")?;
        Ok(())
    }

    fn syscall(&mut self, number: u32, fd: u32) -> Result<(), CodegenError> {
        writeln!(self.out, "\tmovl ${}, %eax", number)?;
        writeln!(self.out, "\tmovl ${}, %ebx", fd)?;
        writeln!(self.out, "\tmovl %edi, %ecx")?;
        // one cell per call, never batched
        writeln!(self.out, "\tmovl $1, %edx")?;
        writeln!(self.out, "\tint $0x80")?;
        Ok(())
    }

    /// `position` is only used to report a stray loop end
    pub fn emit(&mut self, token: TokenKind, position: Position) -> Result<(), CodegenError> {
        match token {
            TokenKind::MoveRight => writeln!(self.out, "\tincl %edi")?,
            TokenKind::MoveLeft => writeln!(self.out, "\tdecl %edi")?,
            TokenKind::Increment => writeln!(self.out, "\tincb (%edi)")?,
            TokenKind::Decrement => writeln!(self.out, "\tdecb (%edi)")?,
            TokenKind::Write => self.syscall(SYS_WRITE, STDOUT)?,
            TokenKind::Read => self.syscall(SYS_READ, STDIN)?,
            TokenKind::LoopStart => {
                let label = self.labels.next();
                self.loops.push(label)?;
                self.summary.max_depth = self.summary.max_depth.max(self.loops.depth());

                writeln!(self.out, "\tcmpb $0, (%edi)")?;
                writeln!(self.out, "\tjz {}", label.end())?;
                writeln!(self.out, "{}:", label.begin())?;
            }
            TokenKind::LoopEnd => {
                let label = self.loops.pop().ok_or(CodegenError::UnmatchedLoopEnd {
                    line: position.line,
                    column: position.column,
                })?;

                writeln!(self.out, "\tcmpb $0, (%edi)")?;
                writeln!(self.out, "\tjnz {}", label.begin())?;
                writeln!(self.out, "{}:", label.end())?;
            }
        }

        self.summary.tokens += 1;
        Ok(())
    }

    /// Process exit with status 0
    pub fn epilogue(&mut self) -> Result<(), CodegenError> {
        writeln!(self.out, "\tmovl ${}, %eax", SYS_EXIT)?;
        writeln!(self.out, "\tmovl $0, %ebx")?;
        writeln!(self.out, "\tint $0x80")?;
        Ok(())
    }

    /// Fails if any loop is still open, otherwise flushes and hands back the sink
    pub fn finish(mut self) -> Result<(CompileSummary, W), CodegenError> {
        if !self.loops.is_empty() {
            return Err(CodegenError::UnmatchedLoopStart {
                labels: self.loops.into_labels(),
            });
        }

        self.epilogue()?;
        self.out.flush()?;

        self.summary.loops = self.labels.allocated();
        Ok((self.summary, self.out))
    }
}

/// Translates all of `source` into a complete assembly unit on `out`
pub fn compile<R: Read, W: Write>(
    source: R,
    out: W,
    config: &CompilerConfig,
) -> Result<CompileSummary, CodegenError> {
    let mut lexer = Lexer::new(source);
    let mut codegen = Codegen::new(out)?;

    codegen.prologue(config)?;
    while let Some(token) = lexer.next_token()? {
        codegen.emit(token, lexer.position())?;
    }

    let (mut summary, _) = codegen.finish()?;
    summary.bytes_scanned = lexer.byte_offset;
    Ok(summary)
}
