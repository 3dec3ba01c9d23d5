use std::env;

use once_cell::sync::Lazy;

#[doc(hidden)]
pub use nu_ansi_term::Color;

/// Set from `DEVUTILS_DEBUG` (`true` or `1`) the first time anything is logged
pub static DEBUG_ENABLED: Lazy<bool> = Lazy::new(|| {
    env::var("DEVUTILS_DEBUG").map_or(false, |value| {
        value.eq_ignore_ascii_case("true") || value == "1"
    })
});

/// Logs a debug message to stderr with optional formatted arguments.
///
/// Output is produced only when `DEVUTILS_DEBUG` is set to `true` or `1`,
/// tagged `[devutils]`.
///
/// # Examples
///
/// ```
/// use devutils::debug;
///
/// debug!("Operation completed");
/// debug!("Ran {} over {} bytes", "base64-encode", 42);
/// ```
#[macro_export]
macro_rules! debug {
    ($fmt:expr) => {
        $crate::debug!("{}", $fmt)
    };
    ($fmt:expr, $($arg:tt)*) => {
        if *$crate::log::DEBUG_ENABLED {
            eprintln!(
                "{} {}",
                $crate::log::Color::Yellow.paint("[devutils]"),
                format!($fmt, $($arg)*)
            );
        }
    };
}
