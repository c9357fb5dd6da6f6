#![cfg(feature = "goblin-engine")]

use std::path::{Path, PathBuf};

use juliet_core::engine::goblin::BinaryFormat as ViewFormat;
use juliet_core::engine::{
    default_engine_registry, AnalysisEngine, BinaryView, EngineError, GoblinEngine,
};
use juliet_core::ground_truth::ground_truth;
use juliet_core::model::FunctionRef;
use object::write::{Object, Symbol, SymbolSection};
use object::{
    Architecture, BinaryFormat, Endianness, SectionKind, SymbolFlags, SymbolKind, SymbolScope,
};

/// Write a relocatable x86_64 ELF with one `.text` section and the given
/// function symbols at the given section offsets.
fn write_elf(dir: &Path, file: &str, functions: &[(&str, u64)], imports: &[&str]) -> PathBuf {
    let mut obj = Object::new(BinaryFormat::Elf, Architecture::X86_64, Endianness::Little);
    let text_id = obj.add_section(Vec::new(), b".text".to_vec(), SectionKind::Text);
    obj.section_mut(text_id).append_data(&[0xC3; 0x100], 16);

    for (name, offset) in functions {
        obj.add_symbol(Symbol {
            name: name.as_bytes().to_vec(),
            value: *offset,
            size: 1,
            kind: SymbolKind::Text,
            scope: SymbolScope::Linkage,
            weak: false,
            section: SymbolSection::Section(text_id),
            flags: SymbolFlags::None,
        });
    }
    for name in imports {
        obj.add_symbol(Symbol {
            name: name.as_bytes().to_vec(),
            value: 0,
            size: 0,
            kind: SymbolKind::Text,
            scope: SymbolScope::Linkage,
            weak: false,
            section: SymbolSection::Undefined,
            flags: SymbolFlags::None,
        });
    }

    let path = dir.join(file);
    std::fs::write(&path, obj.write().unwrap()).unwrap();
    path
}

#[test]
fn goblin_engine_lists_defined_functions_in_address_order() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_elf(
        temp.path(),
        "CWE121_01.out",
        &[("main", 0x40), ("CWE121_Stack__char_01_bad", 0x10), ("helper", 0x20)],
        &["memcpy"],
    );

    let view = GoblinEngine.load(&path).expect("load elf");
    let names: Vec<&str> = view.functions().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["CWE121_Stack__char_01_bad", "helper", "main"]);
    assert!(!view.is_cpp());
    assert_eq!(view.file_name(), "CWE121_01.out");
}

#[test]
fn goblin_view_reports_format_and_feeds_ground_truth() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_elf(
        temp.path(),
        "CWE690_52.out",
        &[("CWE690__52b_badSink", 0x10), ("CWE690__52c_badSink", 0x30), ("CWE690__52_bad", 0x50)],
        &[],
    );

    let bytes = std::fs::read(&path).unwrap();
    let view = GoblinEngine::parse(&path, &bytes).expect("parse elf");
    assert_eq!(view.format(), ViewFormat::Elf);
    assert!(view.libraries().is_empty());
    assert_eq!(ground_truth(&view), vec![FunctionRef::new("CWE690__52c_badSink", 0x30)]);
}

#[test]
fn mangled_symbols_mark_the_binary_as_cpp() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_elf(
        temp.path(),
        "CWE121_cpp.out",
        &[("main", 0x10), ("_ZN7CWE121_3badEv", 0x20)],
        &[],
    );

    let view = GoblinEngine.load(&path).expect("load elf");
    assert!(view.is_cpp());
}

#[test]
fn missing_file_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    let err = GoblinEngine.load(&temp.path().join("absent")).err().expect("error");
    assert!(matches!(err, EngineError::MissingBinary(_)));
}

#[test]
fn non_binary_file_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("notes.txt");
    std::fs::write(&path, b"this is plainly not an executable file at all").unwrap();
    let err = GoblinEngine.load(&path).err().expect("error");
    assert!(
        matches!(err, EngineError::Unsupported(_) | EngineError::Parse { .. }),
        "unexpected error: {err}"
    );
}

#[test]
fn default_registry_contains_goblin() {
    let registry = default_engine_registry();
    assert_eq!(registry.names(), vec!["goblin".to_string()]);
    assert!(registry.get("goblin").is_some());
}
