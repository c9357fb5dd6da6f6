use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use goblin::{elf, mach, pe, Object};
use tracing::debug;

use crate::engine::{AnalysisEngine, BinaryView, EngineError};
use crate::model::FunctionRef;

/// Symbol-table based engine for ELF, PE, and Mach-O binaries.
pub struct GoblinEngine;

/// Container format recognized by [`GoblinEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFormat {
    Elf,
    Pe,
    MachO,
}

/// Owned view over a parsed binary; the file bytes are not retained.
#[derive(Debug, Clone)]
pub struct GoblinView {
    path: PathBuf,
    format: BinaryFormat,
    functions: Vec<FunctionRef>,
    libraries: Vec<String>,
    cpp: bool,
}

impl GoblinView {
    pub fn format(&self) -> BinaryFormat {
        self.format
    }

    /// Shared libraries the binary links against.
    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }
}

impl BinaryView for GoblinView {
    fn path(&self) -> &Path {
        &self.path
    }

    fn functions(&self) -> &[FunctionRef] {
        &self.functions
    }

    fn is_cpp(&self) -> bool {
        self.cpp
    }
}

const CPP_RUNTIMES: &[&str] = &["libstdc++", "libc++", "msvcp"];

fn links_cpp_runtime(libraries: &[String]) -> bool {
    libraries.iter().any(|lib| {
        let lib = lib.to_ascii_lowercase();
        CPP_RUNTIMES.iter().any(|rt| lib.contains(rt))
    })
}

/// Itanium (`_Z`) or MSVC (`?`) mangled symbol.
fn is_mangled(name: &str) -> bool {
    name.starts_with("_Z") || name.starts_with('?')
}

fn elf_functions(elf: &elf::Elf) -> Vec<FunctionRef> {
    let mut functions = Vec::new();
    let tables = [(&elf.syms, &elf.strtab), (&elf.dynsyms, &elf.dynstrtab)];
    for (syms, strtab) in tables {
        for sym in syms.iter() {
            if !sym.is_function() || sym.st_shndx == elf::section_header::SHN_UNDEF as usize {
                continue;
            }
            let name = strtab.get_at(sym.st_name).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            functions.push(FunctionRef::new(name, sym.st_value));
        }
    }
    functions
}

fn pe_functions(pe: &pe::PE) -> Vec<FunctionRef> {
    let mut functions = Vec::new();
    for exp in &pe.exports {
        if exp.rva == 0 {
            continue;
        }
        let name = exp.name.unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        functions.push(FunctionRef::new(name, pe.image_base as u64 + exp.rva as u64));
    }
    functions
}

fn mach_functions(bin: &mach::MachO) -> Vec<FunctionRef> {
    let mut functions = Vec::new();
    for sym in bin.symbols() {
        let Ok((name, nlist)) = sym else { continue };
        if nlist.is_stab() || nlist.is_undefined() || nlist.n_value == 0 {
            continue;
        }
        // C symbols carry one leading underscore on Mach-O.
        let name = name.strip_prefix('_').unwrap_or(name);
        if name.is_empty() {
            continue;
        }
        functions.push(FunctionRef::new(name, nlist.n_value));
    }
    functions
}

/// Sort by address and drop exact duplicates (symtab and dynsym overlap).
fn normalize(functions: Vec<FunctionRef>) -> Vec<FunctionRef> {
    functions.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

impl GoblinEngine {
    fn load_bytes(path: &Path) -> Result<Vec<u8>, EngineError> {
        if !path.is_file() {
            return Err(EngineError::MissingBinary(path.to_path_buf()));
        }
        fs::read(path).map_err(|source| EngineError::Io { path: path.to_path_buf(), source })
    }

    /// Parse raw bytes into a view; `path` is only recorded for reporting.
    pub fn parse(path: &Path, bytes: &[u8]) -> Result<GoblinView, EngineError> {
        let object = Object::parse(bytes).map_err(|e| EngineError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let (format, functions, libraries) = match object {
            Object::Elf(elf) => (
                BinaryFormat::Elf,
                elf_functions(&elf),
                elf.libraries.iter().map(|l| l.to_string()).collect::<Vec<_>>(),
            ),
            Object::PE(pe) => (
                BinaryFormat::Pe,
                pe_functions(&pe),
                pe.libraries.iter().map(|l| l.to_string()).collect(),
            ),
            Object::Mach(mach::Mach::Binary(bin)) => (
                BinaryFormat::MachO,
                mach_functions(&bin),
                bin.libs.iter().map(|l| l.to_string()).collect(),
            ),
            _ => return Err(EngineError::Unsupported(path.to_path_buf())),
        };

        let functions = normalize(functions);
        let cpp = links_cpp_runtime(&libraries) || functions.iter().any(|f| is_mangled(&f.name));
        debug!(
            path = %path.display(),
            ?format,
            functions = functions.len(),
            cpp,
            "parsed binary"
        );

        Ok(GoblinView { path: path.to_path_buf(), format, functions, libraries, cpp })
    }
}

impl AnalysisEngine for GoblinEngine {
    fn load(&self, path: &Path) -> Result<Box<dyn BinaryView>, EngineError> {
        let bytes = Self::load_bytes(path)?;
        let view = Self::parse(path, &bytes)?;
        Ok(Box::new(view))
    }

    fn name(&self) -> &'static str {
        "goblin"
    }
}
