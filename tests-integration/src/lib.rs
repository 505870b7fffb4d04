//! End-to-end tests for prompt-vault, driven through the command registry

#[cfg(test)]
mod commands;
