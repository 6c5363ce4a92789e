//! Action resolution and outcome classification.
//!
//! The classification is the dispatcher's central invariant: bug-class errors
//! are never maskable, interrupts and operational errors are maskable only by
//! the backtrace flag, and normal returns never produce diagnostic output.
//! Index, assertion and conversion faults are panics in this program; nothing
//! here (or anywhere else in the crate) catches an unwind, so they reach the
//! operator with the defect intact.

use crate::error::ToolError;
use crate::tools::ActionModule;

/// Look up an action identifier in a registry table.
pub fn resolve<'a>(actions: &'a [ActionModule], name: &str) -> Option<&'a ActionModule> {
    actions.iter().find(|module| module.name == name)
}

/// What the process should do with a tool outcome.
#[derive(Debug)]
pub enum Disposition {
    /// Terminate normally with this code. Covers clean returns, explicit
    /// tool exit codes, and a masked interrupt (silent exit 1).
    Exit(u8),
    /// Masked operational failure: one diagnostic banner, then exit 1.
    Masked(ToolError),
    /// Unmasked fault: print the full chain and terminate abnormally.
    Propagate(ToolError),
}

/// Classify a tool outcome under the given backtrace setting.
pub fn classify(outcome: Result<Option<u8>, ToolError>, backtrace: bool) -> Disposition {
    match outcome {
        Ok(None) => Disposition::Exit(0),
        Ok(Some(code)) => Disposition::Exit(code),
        // Bug-class errors escape before the backtrace flag is consulted.
        Err(err @ ToolError::Bug { .. }) => Disposition::Propagate(err),
        Err(err) if backtrace => Disposition::Propagate(err),
        Err(ToolError::Interrupted) => Disposition::Exit(1),
        Err(err) => Disposition::Masked(err),
    }
}

/// Strip the longest common leading whitespace from every line.
///
/// Whitespace-only lines do not contribute to the margin and collapse to
/// empty lines in the result.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let mut out = String::with_capacity(text.len());
    for (idx, line) in text.lines().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        if !line.trim().is_empty() {
            out.extend(line.chars().skip(margin));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ACTIONS;

    #[test]
    fn test_every_registered_action_resolves() {
        for module in ACTIONS {
            let found = resolve(ACTIONS, module.name).unwrap();
            assert_eq!(found.name, module.name);
        }
    }

    #[test]
    fn test_unregistered_identifier_does_not_resolve() {
        assert!(resolve(ACTIONS, "frobnicate").is_none());
        assert!(resolve(ACTIONS, "").is_none());
    }

    fn stub_entry(argv: &[String]) -> crate::error::Result<Option<u8>> {
        assert_eq!(argv[0], "fluxctl");
        assert_eq!(argv[1], "stub");
        Ok(Some(7))
    }

    #[test]
    fn test_resolution_hands_argv_to_the_entry_point() {
        let table = [ActionModule {
            name: "stub",
            description: "stub action",
            entry: stub_entry,
        }];
        let argv: Vec<String> = ["fluxctl", "stub"].map(String::from).to_vec();
        let module = resolve(&table, "stub").unwrap();
        let outcome = (module.entry)(&argv);
        assert!(matches!(classify(outcome, false), Disposition::Exit(7)));
    }

    #[test]
    fn test_clean_return_is_exit_zero() {
        assert!(matches!(classify(Ok(None), false), Disposition::Exit(0)));
        assert!(matches!(classify(Ok(None), true), Disposition::Exit(0)));
    }

    #[test]
    fn test_explicit_code_is_passed_through() {
        assert!(matches!(classify(Ok(Some(3)), false), Disposition::Exit(3)));
    }

    #[test]
    fn test_bug_propagates_even_without_backtrace() {
        let outcome = classify(Err(ToolError::bug("short response")), false);
        assert!(matches!(outcome, Disposition::Propagate(ToolError::Bug { .. })));
    }

    #[test]
    fn test_interrupt_is_silent_exit_one_by_default() {
        assert!(matches!(
            classify(Err(ToolError::Interrupted), false),
            Disposition::Exit(1)
        ));
    }

    #[test]
    fn test_interrupt_propagates_with_backtrace() {
        assert!(matches!(
            classify(Err(ToolError::Interrupted), true),
            Disposition::Propagate(ToolError::Interrupted)
        ));
    }

    #[test]
    fn test_operational_error_is_masked_by_default() {
        let outcome = classify(Err(ToolError::operational("disk not found")), false);
        match outcome {
            Disposition::Masked(err) => assert_eq!(err.to_string(), "disk not found"),
            other => panic!("expected masked disposition, got {other:?}"),
        }
    }

    #[test]
    fn test_operational_error_propagates_with_backtrace() {
        let outcome = classify(Err(ToolError::operational("disk not found")), true);
        assert!(matches!(outcome, Disposition::Propagate(_)));
    }

    #[test]
    fn test_dedent_strips_common_margin() {
        assert_eq!(dedent("  one\n    two\n  three"), "one\n  two\nthree");
    }

    #[test]
    fn test_dedent_ignores_blank_lines() {
        assert_eq!(dedent("    a\n\n    b"), "a\n\nb");
    }

    #[test]
    fn test_dedent_leaves_flush_text_alone() {
        assert_eq!(dedent("disk not found"), "disk not found");
    }
}
