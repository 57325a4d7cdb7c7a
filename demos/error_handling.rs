//! Demonstrate error handling for invalid source input.

fn main() {
    // Lone `&`
    match ourjs::compile("demo.ojs", "let ok = a & b\n") {
        Ok(_) => println!("Compiled OK (unexpected)"),
        Err(ourjs::Error::Lex(e)) => {
            println!("Lex error: {e}");
            println!("  Kind: {:?}", e.kind);
            println!("  Location: line {}, column {}", e.start.line, e.start.column);
        }
        Err(ourjs::Error::Parse(e)) => {
            println!("Parse error: {e}");
        }
    }

    println!();

    // Unclosed block
    match ourjs::compile("demo.ojs", "if (a > 0) {\n  let x = 1\n") {
        Ok(_) => println!("Compiled OK (unexpected)"),
        Err(e @ ourjs::Error::Lex(_)) => {
            println!("Lex error: {e}");
        }
        Err(e @ ourjs::Error::Parse(_)) => {
            // The rendered form adds the source excerpt under the message.
            println!("{}", e.render());
        }
    }
}
