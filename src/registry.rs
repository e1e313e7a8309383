//! Module signature registry built by pass 1.
//!
//! One entry per distinct module name across the whole run. Redefinitions of
//! a name are reconciled in place: the entry is never dropped, but once an
//! incompatible change is seen, positional bindings stop being trusted for
//! that module (`ignore_positional` latches on and never reverts).

use crate::group::{maybe_read_param_lparen, read_groups};
use crate::lexer::Lexer;
use crate::report::Report;
use crate::token::{Keyword, Token, TokenKind};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// One position in a module's parameter list. The name is absent when the
/// slot could not be parsed, or after reconciliation cleared it.
#[derive(Debug, Clone)]
pub struct ParamSlot {
    pub name: Option<String>,
}

/// Everything the checker needs to know about one module name.
#[derive(Debug)]
pub struct ModuleEntry {
    pub name: String,
    /// Declared parameter slots, positionally significant.
    pub params: Vec<ParamSlot>,
    /// Exactly the non-absent names in `params`; kept in sync on every
    /// mutation.
    pub param_names: HashSet<String>,
    /// First definition site; later redefinitions do not move it.
    pub def_file: PathBuf,
    pub def_line: u32,
    /// One incompatible-redefinition warning per module, ever.
    warned: bool,
    /// Latched when any redefinition changed the name set or the order.
    pub ignore_positional: bool,
}

#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, ModuleEntry>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ModuleEntry> {
        self.modules.get(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Pass 1: scan one file for `module` definitions and record or
    /// reconcile their parameter signatures.
    pub fn find_defs(&mut self, path: &Path, text: &str, report: &mut Report) {
        let mut lexer = Lexer::new(path, text);
        while let Some(token) = lexer.next_token(report) {
            if token.kind != TokenKind::Keyword(Keyword::Module) {
                continue;
            }
            let name_token = match lexer.next_token(report) {
                Some(t) => t,
                None => break,
            };
            let (name, def_line) = match &name_token.kind {
                TokenKind::Ident(s) => (s.clone(), name_token.line),
                // `module` not followed by a name; let the main scan see the
                // token again.
                _ => {
                    lexer.push_back(name_token);
                    continue;
                }
            };

            let mut slots = Vec::new();
            if maybe_read_param_lparen(&mut lexer, report) {
                let groups = read_groups(&mut lexer, report);
                for (index, group) in groups.iter().enumerate() {
                    let slot_name = parse_slot_name(group);
                    if slot_name.is_none() {
                        let line = group.first().map(|t| t.line).unwrap_or(def_line);
                        report.warn(
                            path,
                            line,
                            format!(
                                "failed to parse name of parameter {} of module '{}'",
                                index + 1,
                                name
                            ),
                        );
                    }
                    slots.push(ParamSlot { name: slot_name });
                }
            }

            match self.modules.get_mut(&name) {
                None => {
                    tracing::debug!(
                        module = %name,
                        params = slots.len(),
                        file = %path.display(),
                        "registered module definition"
                    );
                    let param_names = slots
                        .iter()
                        .filter_map(|s| s.name.clone())
                        .collect::<HashSet<_>>();
                    self.modules.insert(
                        name.clone(),
                        ModuleEntry {
                            name,
                            params: slots,
                            param_names,
                            def_file: path.to_path_buf(),
                            def_line,
                            warned: false,
                            ignore_positional: false,
                        },
                    );
                }
                Some(entry) => reconcile(entry, &slots, path, def_line, report),
            }
        }
    }
}

/// Parameter name of one definition group: skip leading type/qualifier
/// keywords, then take the first identifier. `None` when there is none.
fn parse_slot_name(group: &[Token]) -> Option<String> {
    group
        .iter()
        .skip_while(|t| matches!(t.kind, TokenKind::Keyword(_)))
        .find_map(|t| t.ident())
        .map(str::to_string)
}

/// Merge a redefinition of an already-known module into its entry.
///
/// Three kinds of incompatibility are detected: parameters that appear only
/// in the new list, parameters that vanished from it, and parameters that
/// kept their name but moved. Any of the three latches `ignore_positional`.
/// Vanished parameters have their slot made anonymous so later checks stop
/// reporting them; new parameters are not appended, the first definition's
/// shape stays authoritative for whatever names survive.
fn reconcile(
    entry: &mut ModuleEntry,
    new_slots: &[ParamSlot],
    path: &Path,
    line: u32,
    report: &mut Report,
) {
    let new_name_set: HashSet<&str> = new_slots
        .iter()
        .filter_map(|s| s.name.as_deref())
        .collect();

    let new_names: Vec<String> = new_slots
        .iter()
        .filter_map(|s| s.name.as_deref())
        .filter(|n| !entry.param_names.contains(*n))
        .map(str::to_string)
        .collect();

    let mut missing: Vec<String> = Vec::new();
    for slot in &mut entry.params {
        let vanished = slot
            .name
            .as_deref()
            .is_some_and(|n| !new_name_set.contains(n));
        if vanished {
            if let Some(name) = slot.name.take() {
                entry.param_names.remove(&name);
                missing.push(name);
            }
        }
    }

    let mut reordered = false;
    for (index, slot) in new_slots.iter().enumerate() {
        if let Some(name) = slot.name.as_deref() {
            if entry.param_names.contains(name) {
                let same_position = entry
                    .params
                    .get(index)
                    .is_some_and(|old| old.name.as_deref() == Some(name));
                if !same_position {
                    reordered = true;
                }
            }
        }
    }

    if new_names.is_empty() && missing.is_empty() && !reordered {
        return;
    }

    entry.ignore_positional = true;
    if entry.warned {
        return;
    }
    entry.warned = true;

    let mut parts = Vec::new();
    if !new_names.is_empty() {
        parts.push(format!("new parameters: {}", new_names.join(", ")));
    }
    if !missing.is_empty() {
        parts.push(format!("missing parameters: {}", missing.join(", ")));
    }
    let detail = if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join("; "))
    };
    report.warn(
        path,
        line,
        format!(
            "incompatible redefinition of module '{}'{}, previously defined at {}:{}",
            entry.name,
            detail,
            entry.def_file.display(),
            entry.def_line
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scan(registry: &mut ModuleRegistry, file: &str, src: &str) -> Report {
        let mut report = Report::new();
        registry.find_defs(&PathBuf::from(file), src, &mut report);
        report
    }

    fn param_names(entry: &ModuleEntry) -> Vec<Option<&str>> {
        entry.params.iter().map(|s| s.name.as_deref()).collect()
    }

    #[test]
    fn test_simple_definition() {
        let mut registry = ModuleRegistry::new();
        let report = scan(
            &mut registry,
            "fifo.v",
            "module fifo #(parameter WIDTH = 8, parameter integer DEPTH = 16) (input clk);",
        );
        assert!(report.diagnostics().is_empty());
        let entry = registry.get("fifo").unwrap();
        assert_eq!(param_names(entry), vec![Some("WIDTH"), Some("DEPTH")]);
        assert_eq!(entry.def_line, 1);
        assert!(!entry.ignore_positional);
    }

    #[test]
    fn test_definition_without_param_list() {
        let mut registry = ModuleRegistry::new();
        scan(&mut registry, "a.v", "module plain (input clk);\nendmodule");
        let entry = registry.get("plain").unwrap();
        assert!(entry.params.is_empty());
        assert!(entry.param_names.is_empty());
    }

    #[test]
    fn test_range_in_declaration_still_finds_name() {
        // Delimiter tokens are dropped by the group reader, so the first
        // identifier after the leading keywords is the name even with a
        // [3:0] range in front of it.
        let mut registry = ModuleRegistry::new();
        let report = scan(
            &mut registry,
            "a.v",
            "module m #(parameter logic [3:0] SEL = 0) ();",
        );
        assert!(report.diagnostics().is_empty());
        assert_eq!(param_names(registry.get("m").unwrap()), vec![Some("SEL")]);
    }

    #[test]
    fn test_unparseable_slot_is_anonymous_and_warned() {
        let mut registry = ModuleRegistry::new();
        let report = scan(&mut registry, "a.v", "module m #(parameter A = 1, 42) ();");
        let entry = registry.get("m").unwrap();
        assert_eq!(param_names(entry), vec![Some("A"), None]);
        assert_eq!(report.diagnostics().len(), 1);
        assert!(report.diagnostics()[0]
            .message
            .contains("parameter 2 of module 'm'"));
    }

    #[test]
    fn test_identical_redefinition_is_compatible() {
        let mut registry = ModuleRegistry::new();
        scan(&mut registry, "a.v", "module m #(parameter A = 1, parameter B = 2) ();");
        let report = scan(&mut registry, "b.v", "module m #(parameter A = 9, parameter B = 9) ();");
        assert!(report.diagnostics().is_empty());
        let entry = registry.get("m").unwrap();
        assert!(!entry.ignore_positional);
        assert_eq!(entry.def_file, PathBuf::from("a.v"));
    }

    #[test]
    fn test_removed_parameter_cleared_and_warned_once() {
        let mut registry = ModuleRegistry::new();
        scan(&mut registry, "a.v", "module m #(parameter A = 1, parameter B = 2) ();");
        let report = scan(&mut registry, "b.v", "module m #(parameter A = 1) ();");
        assert_eq!(report.diagnostics().len(), 1);
        assert!(report.diagnostics()[0]
            .message
            .contains("missing parameters: B"));
        assert!(report.diagnostics()[0]
            .message
            .contains("previously defined at a.v:1"));

        let entry = registry.get("m").unwrap();
        assert!(entry.ignore_positional);
        assert_eq!(param_names(entry), vec![Some("A"), None]);
        assert!(!entry.param_names.contains("B"));

        // Second incompatible redefinition stays silent.
        let report = scan(&mut registry, "c.v", "module m #(parameter Z = 1) ();");
        assert!(report.diagnostics().is_empty());
        assert!(registry.get("m").unwrap().ignore_positional);
    }

    #[test]
    fn test_renamed_parameter_reports_both_sets() {
        let mut registry = ModuleRegistry::new();
        scan(&mut registry, "a.v", "module m #(parameter A = 1, parameter B = 2) ();");
        let report = scan(&mut registry, "b.v", "module m #(parameter A = 1, parameter C = 3) ();");
        assert_eq!(report.diagnostics().len(), 1);
        let message = &report.diagnostics()[0].message;
        assert!(message.contains("new parameters: C"));
        assert!(message.contains("missing parameters: B"));

        // C is not adopted into the tracked signature.
        let entry = registry.get("m").unwrap();
        assert_eq!(param_names(entry), vec![Some("A"), None]);
        assert!(!entry.param_names.contains("C"));
    }

    #[test]
    fn test_reorder_sets_degraded_mode() {
        let mut registry = ModuleRegistry::new();
        scan(&mut registry, "a.v", "module m #(parameter A = 1, parameter B = 2) ();");
        let report = scan(&mut registry, "b.v", "module m #(parameter B = 2, parameter A = 1) ();");
        // Reordering warns without naming new/missing sets.
        assert_eq!(report.diagnostics().len(), 1);
        assert!(!report.diagnostics()[0].message.contains("new parameters"));
        let entry = registry.get("m").unwrap();
        assert!(entry.ignore_positional);
        assert_eq!(param_names(entry), vec![Some("A"), Some("B")]);
    }
}
