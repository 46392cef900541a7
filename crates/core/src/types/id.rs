//! Newtype IDs for type-safe Slack references.
//!
//! Use the `define_slack_id!` macro to create type-safe ID wrappers that
//! prevent accidentally passing a user ID where a channel ID is expected.

/// Macro to define a type-safe Slack ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use herald_core::define_slack_id;
/// define_slack_id!(TeamId);
/// define_slack_id!(AppId);
///
/// let team = TeamId::new("T0001");
/// let app = AppId::new("A0001");
///
/// // These are different types, so this won't compile:
/// // let _: TeamId = app;
/// assert_eq!(team.as_str(), "T0001");
/// ```
#[macro_export]
macro_rules! define_slack_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Slack entity IDs
define_slack_id!(UserId);
define_slack_id!(ChannelId);

// Slack identifies a message within a channel by its timestamp.
define_slack_id!(MessageTs);
