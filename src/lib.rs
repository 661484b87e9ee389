/*!
# treerx

This crate provides a tree-regular-expression engine for HTML-like document
trees. Patterns generalize flat regular expressions to hierarchical node
lists: a symbol may carry a child-pattern, an attribute-restriction list,
and/or a content regular expression. Compiling a pattern yields an NFA over
symbol tokens; matching runs the NFA against the sibling sequences of a
document tree, descending recursively whenever a symbol binds a child
pattern.

```rust
use treerx::document::tree::{document, element, text};
use treerx::{parse_pattern, Config};

// <p>abbbbbc</p>
let doc = document(vec![element(
    "p",
    &[],
    vec![text("abbbbbc")],
)]);

let machine = parse_pattern(r#"p -> text:"ab*c""#, &Config::default()).unwrap();
let matches = treerx::document_process(&machine, &doc);
assert_eq!(matches.len(), 1);
assert_eq!(matches[0].captures[0].as_str(), "abbbbbc");
```

# Pattern language

```text
Expr   ::= Term ("|" Term)*
Term   ::= Factor+
Factor ::= Symbol Suffix?
         | "~"
         | "(" Expr ")" "*"?
Suffix ::= "*"
         | "->" Expr
         | ":" String
         | Attrs ( "->" Expr )?
Attrs  ::= "<" ( Symbol ( "=" String )? )* ">"
```

A bare symbol matches a node whose tag name equals it case-insensitively
(`.` matches any tag name); `~` matches the empty sibling list; `*` applies
Kleene closure; `-> Expr` additionally requires the node's children to
match `Expr`; `: "regex"` requires the node's text content to match the
(case-insensitive, extended) regex; `<name="regex">` requires an attribute
restriction.

# Non-goals

HTML/XML parsing, flat-regex compilation, and any foreign-language binding
surface are out of scope: this crate defines [`document::Node`] as the tree
interface it consumes (see [`document::tree`] for a minimal in-memory
implementation used by the crate's own tests) and depends on the `regex`
crate for embedded flat regular expressions.
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
pub mod config;
pub mod document;
mod error;
mod machine;
mod matcher;
mod parser;
mod restrict;
mod sim;
pub mod template;
mod token;

pub use config::Config;
pub use document::{document_process, document_process_with_config, Match, Node, RegexMatch};
pub use error::ParseError;
pub use machine::Machine;
pub use parser::parse_pattern;
pub use template::{render_all, render_template};

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
