//! Mode inheritance resolution.

use tracing::{debug, error};

use super::vocabulary::{ActionTable, Mode};

/// Resolve a requested mode into a table value.
///
/// A deferring mode adopts `context_default` when the table knows it. Any
/// mode the table cannot translate falls back to the table's inactive entry.
///
/// # Panics
/// If the table has no [`Mode::Inactive`] entry. Every action table must
/// define one, so this indicates a broken table rather than bad input.
pub fn resolve<V>(requested: Mode, context_default: Mode, table: &ActionTable<V>) -> &V {
    if requested.is_inherited()
        && let Some(value) = table.get(context_default)
    {
        debug!(
            table = table.name(),
            default_mode = %context_default,
            "Setting to top-level mode"
        );
        return value;
    }

    match table.get(requested) {
        Some(value) => value,
        None => {
            error!(
                table = table.name(),
                mode = %requested,
                default_mode = %context_default,
                "Given mode or top-level mode is invalid, falling back to inactive"
            );
            table.get(Mode::Inactive).unwrap_or_else(|| {
                panic!("action table '{}' has no inactive entry", table.name())
            })
        }
    }
}

/// Two-way inheritance used above the practice level, where no vocabulary
/// translation happens
pub fn inherit_mode(mode: Mode, default_mode: Mode) -> Mode {
    if mode.is_inherited() { default_mode } else { mode }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::vocabulary::{ANTI_BOT_ACTIONS, MODE_ACTIONS};

    const CONCRETE: [Mode; 5] = [
        Mode::Prevent,
        Mode::Detect,
        Mode::Inactive,
        Mode::PreventLearn,
        Mode::DetectLearn,
    ];

    const ALL: [Mode; 7] = [
        Mode::Prevent,
        Mode::Detect,
        Mode::Inactive,
        Mode::PreventLearn,
        Mode::DetectLearn,
        Mode::AsTopLevel,
        Mode::Inherited,
    ];

    #[test]
    fn concrete_mode_ignores_default() {
        for mode in CONCRETE {
            for default in ALL {
                assert_eq!(
                    resolve(mode, default, &MODE_ACTIONS),
                    MODE_ACTIONS.get(mode).expect("concrete mode in table")
                );
            }
        }
    }

    #[test]
    fn deferring_mode_adopts_default() {
        for mode in [Mode::AsTopLevel, Mode::Inherited] {
            for default in CONCRETE {
                assert_eq!(
                    resolve(mode, default, &MODE_ACTIONS),
                    MODE_ACTIONS.get(default).expect("default in table")
                );
            }
        }
        assert_eq!(*resolve(Mode::Inherited, Mode::Detect, &MODE_ACTIONS), "Detect");
        assert_eq!(
            *resolve(Mode::AsTopLevel, Mode::PreventLearn, &MODE_ACTIONS),
            "Prevent"
        );
    }

    #[test]
    fn deferring_default_falls_back_to_inactive() {
        assert_eq!(
            *resolve(Mode::Inherited, Mode::AsTopLevel, &MODE_ACTIONS),
            "Inactive"
        );
        assert_eq!(
            *resolve(Mode::AsTopLevel, Mode::Inherited, &ANTI_BOT_ACTIONS),
            "Disabled"
        );
    }

    #[test]
    fn unknown_key_falls_back_to_inactive() {
        static NARROW: ActionTable<u8> =
            ActionTable::new("narrow", &[(Mode::Prevent, 1), (Mode::Inactive, 0)]);
        assert_eq!(*resolve(Mode::Detect, Mode::Prevent, &NARROW), 0);
        assert_eq!(*resolve(Mode::DetectLearn, Mode::Inactive, &NARROW), 0);
        assert_eq!(*resolve(Mode::Prevent, Mode::Inactive, &NARROW), 1);
    }

    #[test]
    #[should_panic(expected = "has no inactive entry")]
    fn missing_inactive_entry_is_a_defect() {
        static BROKEN: ActionTable<&str> =
            ActionTable::new("broken", &[(Mode::Prevent, "Prevent")]);
        resolve(Mode::Detect, Mode::Detect, &BROKEN);
    }

    #[test]
    fn inherit_mode_is_two_way() {
        assert_eq!(inherit_mode(Mode::Inherited, Mode::Detect), Mode::Detect);
        assert_eq!(inherit_mode(Mode::AsTopLevel, Mode::Prevent), Mode::Prevent);
        assert_eq!(inherit_mode(Mode::DetectLearn, Mode::Prevent), Mode::DetectLearn);
    }
}
