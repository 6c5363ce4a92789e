//! Action implementations and the registry binding them to the front end.
//!
//! Each tool module exposes a one-line `DESCRIPTION` and a `run` entry point
//! taking the argument list as left after global flag stripping (program name
//! at position 0, action name at position 1). Adding an action means adding a
//! module and one row to [`ACTIONS`].

pub mod bandwidth;
pub mod clean;
pub mod convert;
pub mod delays;
pub mod erase;
pub mod info;
pub mod pin;
pub mod read;
pub mod reset;
pub mod rpm;
pub mod seek;
pub mod update;
pub mod write;

use crate::error::Result;

/// A registered action: identifier, one-line description, entry point.
pub struct ActionModule {
    pub name: &'static str,
    pub description: &'static str,
    pub entry: fn(&[String]) -> Result<Option<u8>>,
}

/// The single source of truth for supported actions, in display order.
pub const ACTIONS: &[ActionModule] = &[
    ActionModule {
        name: "info",
        description: info::DESCRIPTION,
        entry: info::run,
    },
    ActionModule {
        name: "read",
        description: read::DESCRIPTION,
        entry: read::run,
    },
    ActionModule {
        name: "write",
        description: write::DESCRIPTION,
        entry: write::run,
    },
    ActionModule {
        name: "convert",
        description: convert::DESCRIPTION,
        entry: convert::run,
    },
    ActionModule {
        name: "erase",
        description: erase::DESCRIPTION,
        entry: erase::run,
    },
    ActionModule {
        name: "clean",
        description: clean::DESCRIPTION,
        entry: clean::run,
    },
    ActionModule {
        name: "seek",
        description: seek::DESCRIPTION,
        entry: seek::run,
    },
    ActionModule {
        name: "delays",
        description: delays::DESCRIPTION,
        entry: delays::run,
    },
    ActionModule {
        name: "update",
        description: update::DESCRIPTION,
        entry: update::run,
    },
    ActionModule {
        name: "pin",
        description: pin::DESCRIPTION,
        entry: pin::run,
    },
    ActionModule {
        name: "reset",
        description: reset::DESCRIPTION,
        entry: reset::run,
    },
    ActionModule {
        name: "bandwidth",
        description: bandwidth::DESCRIPTION,
        entry: bandwidth::run,
    },
    ActionModule {
        name: "rpm",
        description: rpm::DESCRIPTION,
        entry: rpm::run,
    },
];

/// Result of handing a tool's trailing arguments to clap.
pub(crate) enum Parsed<T> {
    Args(T),
    /// Help/version was printed, or the arguments were rejected; the tool
    /// should return this code without doing any work.
    Exit(u8),
}

/// Parse a tool's arguments without letting clap terminate the process.
///
/// The dispatcher owns exit codes, so clap's own `exit()` path is never
/// taken: errors are printed and surfaced as an explicit code instead.
pub(crate) fn parse_tool_args<T: clap::Parser>(argv: &[String]) -> Result<Parsed<T>> {
    // argv[0] is the program name; the action name at argv[1] doubles as the
    // tool's own program name so help output reads naturally.
    match T::try_parse_from(&argv[1..]) {
        Ok(args) => Ok(Parsed::Args(args)),
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print()
                .map_err(crate::error::ToolError::from)?;
            Ok(Parsed::Exit(code))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_are_unique() {
        for (idx, module) in ACTIONS.iter().enumerate() {
            assert!(
                !ACTIONS[..idx].iter().any(|m| m.name == module.name),
                "duplicate action {}",
                module.name
            );
        }
    }

    #[test]
    fn test_registry_descriptions_are_single_line() {
        for module in ACTIONS {
            assert!(!module.description.is_empty());
            assert!(!module.description.contains('\n'));
        }
    }

    #[test]
    fn test_registry_order_is_stable() {
        assert_eq!(ACTIONS.first().map(|m| m.name), Some("info"));
        assert_eq!(ACTIONS.last().map(|m| m.name), Some("rpm"));
        assert_eq!(ACTIONS.len(), 13);
    }
}
