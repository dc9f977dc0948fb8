//! Macro for implementing Display and FromStr for state enums
//!
//! Shift states and clock event types are persisted as lowercase text, so
//! every such enum needs the same pair of conversions.
//!
//! # Example
//!
//! ```rust
//! use shiftclock_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum BreakKind {
//!     Paid,
//!     Unpaid,
//! }
//!
//! impl_domain_status_conversions!(BreakKind {
//!     Paid => "paid",
//!     Unpaid => "unpaid",
//! });
//!
//! assert_eq!(BreakKind::Paid.to_string(), "paid");
//! assert_eq!("UNPAID".parse::<BreakKind>().unwrap(), BreakKind::Unpaid);
//! ```

/// Implements Display and FromStr traits for state enums
///
/// - Display writes the mapped string
/// - FromStr parses case-insensitively and reports the enum name on failure
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
