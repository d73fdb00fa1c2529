//! Macros for the command table
//!
//! `paredit_commands!` turns one row per command into the [`CommandId`]
//! enum with its host name, console name and kind, so that the three stay in
//! step.
//!
//! [`CommandId`]: super::CommandId

/// Generate the command enum from `Variant("host.name", console) => kind;`
/// rows, where `console` is `"console-name"` or `-`
macro_rules! paredit_commands {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident($name:literal, $console:tt) => $kind:expr;
        )+
    ) => {
        /// Every command the engine exposes to a host
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum CommandId {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl CommandId {
            /// All commands in registration order
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Host command name, e.g. `paredit.slurpSexpForward`
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Name of the matching REPL console command, if there is one
            #[must_use]
            pub const fn console_name(self) -> Option<&'static str> {
                match self {
                    $(Self::$variant => paredit_commands!(@console $console),)+
                }
            }

            /// What the command does
            #[must_use]
            pub const fn kind(self) -> CommandKind {
                match self {
                    $(Self::$variant => $kind,)+
                }
            }
        }
    };

    (@console -) => {
        None
    };
    (@console $console:literal) => {
        Some($console)
    };
}
