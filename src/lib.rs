pub mod config;
pub mod error;
pub mod host;
pub mod identity;
pub mod server;

// Debug printing helper: `eprintln!` in test and debug builds, nothing in release.
// Usage: tprintln!("session.reject err={}", err);
#[cfg(any(test, debug_assertions))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ( eprintln!($($arg)*) );
}

// In non-test builds, provide a no-op tprintln! so calls compile without effect.
#[cfg(not(any(test, debug_assertions)))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ({
        // Preserve formatting checks in release without producing code
        if false { let _ = format!($($arg)*); }
    });
}
