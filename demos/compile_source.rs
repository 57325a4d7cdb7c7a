//! Tokenize, parse, and lower a small program, printing each stage.

use ourjs::{format, lower, parse, tokenize};

const SOURCE: &str = "\
func square(n) { n * n }
let limit = 10
for (let i = 0, i < limit, i + 1) {
  square(i)
}
";

fn main() {
    let tokens = match tokenize("demo.ojs", SOURCE) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    println!("{} tokens", tokens.len());

    let root = match parse(&tokens) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    println!("tree: {}", format(&root));
    println!();
    print!("{}", lower(&root));
}
