//! Shared utilities.
//!
//! Shell quoting and test helpers used across the crate.

#[cfg(test)]
pub mod testutil;

/// Quotes `arg` for a POSIX shell, leaving plain words untouched.
pub fn shell_quote(arg: &str) -> String {
  let plain = !arg.is_empty()
    && arg
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '-' | '_' | ':' | '=' | '+' | ','));

  if plain {
    arg.to_string()
  } else {
    format!("'{}'", arg.replace('\'', r"'\''"))
  }
}
