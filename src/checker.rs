//! Pass 2: match instantiations against the frozen registry.
//!
//! Instantiation detection is heuristic. An identifier only counts as a
//! candidate when the previous token could end a statement (`;`, `begin`,
//! `end`, `generate`, `endgenerate`); that one-token-of-context gate is what
//! keeps expression operands from being mistaken for instantiations, at the
//! cost of occasionally skipping a real one. Aggressive mode drops the gate
//! and checks every identifier that names a known module.

use crate::group::{maybe_read_param_lparen, read_groups};
use crate::lexer::Lexer;
use crate::registry::{ModuleEntry, ModuleRegistry};
use crate::report::{Finding, Report};
use crate::token::{Keyword, Punct, Token, TokenKind};
use std::collections::HashSet;
use std::path::Path;

pub struct BindingChecker<'a> {
    registry: &'a ModuleRegistry,
    aggressive: bool,
    verbose: bool,
}

impl<'a> BindingChecker<'a> {
    /// `verbose` suppresses the too-many-parameters and unknown-parameter
    /// warnings; it reduces output rather than adding to it.
    pub fn new(registry: &'a ModuleRegistry, aggressive: bool, verbose: bool) -> Self {
        Self {
            registry,
            aggressive,
            verbose,
        }
    }

    /// Scan one file for instantiations of known modules and report their
    /// unbound parameters.
    pub fn check_insts(&self, path: &Path, text: &str, report: &mut Report) {
        let mut lexer = Lexer::new(path, text);
        let mut expect_instantiation = true;
        while let Some(token) = lexer.next_token(report) {
            if let TokenKind::Ident(name) = &token.kind {
                if expect_instantiation || self.aggressive {
                    if let Some(entry) = self.registry.get(name) {
                        self.check_one(entry, token.line, &mut lexer, path, report);
                    }
                }
            }
            expect_instantiation = context_restoring(&token);
        }
    }

    /// Validate a single candidate instantiation. The module-name identifier
    /// has just been consumed; the parameter list, if any, follows.
    fn check_one(
        &self,
        entry: &ModuleEntry,
        line: u32,
        lexer: &mut Lexer<'_>,
        path: &Path,
        report: &mut Report,
    ) {
        // An absent `#(` list binds nothing; every named slot is unbound.
        // Note the failed lookahead has already advanced the stream.
        let groups = if maybe_read_param_lparen(lexer, report) {
            read_groups(lexer, report)
        } else {
            Vec::new()
        };

        let mut bound: HashSet<&str> = HashSet::new();
        let mut unknown_named: Vec<String> = Vec::new();
        let mut has_positional = false;
        let mut given = 0usize;
        for (position, group) in groups.iter().enumerate() {
            let first = match group.first() {
                Some(t) => t,
                None => continue,
            };
            given += 1;
            match &first.kind {
                TokenKind::Binding(name) => {
                    if entry.param_names.contains(name) {
                        bound.insert(name);
                    } else {
                        unknown_named.push(name.clone());
                    }
                }
                _ => {
                    has_positional = true;
                    if let Some(name) = entry.params.get(position).and_then(|s| s.name.as_deref())
                    {
                        bound.insert(name);
                    }
                }
            }
        }

        if given > entry.params.len() {
            if !self.verbose {
                report.warn(
                    path,
                    line,
                    format!(
                        "too many parameters in instantiation of module '{}' ({} given, {} declared)",
                        entry.name,
                        given,
                        entry.params.len()
                    ),
                );
            }
            return;
        }

        if !unknown_named.is_empty() {
            if !self.verbose {
                for name in &unknown_named {
                    report.warn(
                        path,
                        line,
                        format!(
                            "named parameter '{}' missing in module '{}' (defined at {}:{})",
                            name,
                            entry.name,
                            entry.def_file.display(),
                            entry.def_line
                        ),
                    );
                }
            }
            return;
        }

        // Positions cannot be trusted once the module has been redefined
        // incompatibly; silence beats false positives here.
        if has_positional && entry.ignore_positional {
            return;
        }

        for slot in &entry.params {
            if let Some(name) = slot.name.as_deref() {
                if !bound.contains(name) {
                    report.finding(Finding {
                        file: path.to_path_buf(),
                        line,
                        parameter: name.to_string(),
                        module: entry.name.clone(),
                        def_file: entry.def_file.clone(),
                        def_line: entry.def_line,
                    });
                }
            }
        }
    }
}

/// Could the next identifier start a statement? Recomputed from every token
/// the main scan consumes.
fn context_restoring(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Punct(Punct::Semi)
            | TokenKind::Keyword(
                Keyword::Begin | Keyword::End | Keyword::Generate | Keyword::Endgenerate
            )
    )
}
