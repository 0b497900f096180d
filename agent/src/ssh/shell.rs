//! Shell command assembly
//!
//! Remote exec takes a single command line, so argument boundaries are
//! preserved by quoting every argument individually instead of splicing
//! raw strings together.

/// Wrap a value in single quotes, escaping any embedded single quote
pub fn escape_shell_value(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Assemble a command and its arguments into one shell-safe command line
pub fn assemble_command(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        return command.to_string();
    }
    let quoted: Vec<String> = args.iter().map(|arg| escape_shell_value(arg)).collect();
    format!("{} {}", command, quoted.join(" "))
}
