mod coordinator_tests;
mod debounce_tests;
mod error_tests;
mod keybinding_tests;
mod reorder_tests;
mod tracing_tests;
