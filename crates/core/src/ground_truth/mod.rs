//! Ground-truth extraction from Juliet naming conventions.
//!
//! Juliet test cases name the flawed code path after the CWE, e.g.
//! `CWE121_Stack_Based_Buffer_Overflow__char_type_overrun_memcpy_54d_badSink`
//! or `CWE476_NULL_Pointer_Dereference__int_01_bad`. Each binary is assumed to
//! carry exactly one injected vulnerability; binaries with several
//! independent flaws are not supported.

use std::sync::OnceLock;

use regex::Regex;

use crate::engine::BinaryView;
use crate::model::FunctionRef;

fn cwe_bad_sink() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^_?CWE.*badSink").expect("valid regex"))
}

fn cwe_bad() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^_?CWE.*bad$").expect("valid regex"))
}

const PLAIN_BAD_SINK: &str = "badSink";

/// Ground-truth vulnerable functions for an analyzed binary.
pub fn ground_truth(view: &dyn BinaryView) -> Vec<FunctionRef> {
    ground_truth_from(view.functions())
}

/// Apply the naming heuristic to a function list.
///
/// Precedence, stopping at the first rule that matches anything:
/// 1. `^_?CWE.*badSink`; when several match, only the lexicographically
///    greatest name is kept (the last stage of a `54b -> 54c -> 54d` chain).
/// 2. functions named exactly `badSink`.
/// 3. `^_?CWE.*bad$`.
pub fn ground_truth_from(functions: &[FunctionRef]) -> Vec<FunctionRef> {
    let sinks: Vec<&FunctionRef> =
        functions.iter().filter(|f| cwe_bad_sink().is_match(&f.name)).collect();
    if sinks.len() > 1 {
        // max_by keeps the last of equal names.
        return sinks.into_iter().max_by(|a, b| a.name.cmp(&b.name)).cloned().into_iter().collect();
    }
    if !sinks.is_empty() {
        return sinks.into_iter().cloned().collect();
    }

    let plain: Vec<FunctionRef> =
        functions.iter().filter(|f| f.name == PLAIN_BAD_SINK).cloned().collect();
    if !plain.is_empty() {
        return plain;
    }

    functions.iter().filter(|f| cwe_bad().is_match(&f.name)).cloned().collect()
}
