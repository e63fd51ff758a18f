// Shared session test module
#[cfg(test)]
mod session_tests;
