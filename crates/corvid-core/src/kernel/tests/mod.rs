// Kernel test module
#[cfg(test)]
mod bootstrap_tests;
