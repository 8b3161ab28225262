use owo_colors::OwoColorize;

/// Print a help hint for a diagnostic message, if one applies.
pub fn provide_error_suggestions(err_msg: &str) {
    // Scope-related errors
    if err_msg.contains("undefined or out-of-scope") {
        eprintln!("{}", "💡 Help: Declare the variable with 'int' before using it.".yellow());
        eprintln!("    {}", "Names declared inside { } are gone once the block closes.".bright_black());
        eprintln!("    {}", "Example: int y = 0; if (x > 5) { y = x + 1; } int z = y;".bright_black());
    }
    else if err_msg.contains("duplicate declaration") {
        eprintln!("{}", "💡 Help: A name can be declared only once per block.".yellow());
        eprintln!("    {}", "Use plain assignment to change it: x = 5;".bright_black());
    }

    // Lexical errors
    else if err_msg.contains("invalid character") {
        eprintln!("{}", "💡 Help: This character is not part of the language.".yellow());
        eprintln!("    {}", "Identifiers use letters, digits and '_' only".bright_black());
    }
    else if err_msg.contains("unterminated block comment") {
        eprintln!("{}", "💡 Help: Block comment is missing its closing */".yellow());
    }

    // Syntax errors
    else if err_msg.contains("cannot be chained") {
        eprintln!("{}", "💡 Help: Only one comparison is allowed per expression.".yellow());
        eprintln!("    {}", "Example: if (a < b) { if (b < c) { ... } }".bright_black());
    }
    else if err_msg.contains("nesting too deep") {
        eprintln!("{}", "💡 Help: Blocks and parentheses are nested too deeply.".yellow());
        eprintln!("    {}", "Split the expression or flatten the blocks".bright_black());
    }
    else if err_msg.contains("expected ';'") {
        eprintln!("{}", "💡 Help: Declarations and assignments end with ';'".yellow());
        eprintln!("    {}", "Example: int x = 10;".bright_black());
    }
    else if err_msg.contains("expected a statement") {
        eprintln!("{}", "💡 Help: Statements start with 'int', 'if', 'while', '{' or a variable name.".yellow());
    }
    else if err_msg.contains("end of input") {
        eprintln!("{}", "💡 Help: The file ended early.".yellow());
        eprintln!("    {}", "Check for a missing '}' or ')'".bright_black());
    }
    else if err_msg.contains("expected") {
        eprintln!("{}", "💡 Help: Missing required syntax element.".yellow());
        if err_msg.contains("'{'") {
            eprintln!("    {}", "'if' and 'while' bodies must be blocks: if (x) { ... }".bright_black());
        } else if err_msg.contains("'('") || err_msg.contains("')'") {
            eprintln!("    {}", "Check if parentheses are balanced".bright_black());
        } else if err_msg.contains("variable name") {
            eprintln!("    {}", "Expected a variable name".bright_black());
        }
    }

    // File-related errors
    else if err_msg.contains("Failed to read") {
        eprintln!("{}", "💡 Help: File operation failed.".yellow());
        eprintln!("    {}", "Check if the file exists and you have permission to read it".bright_black());
    }
}
