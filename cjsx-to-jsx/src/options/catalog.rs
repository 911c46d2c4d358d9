//! Built-in option tables for the pass-through stages.
//!
//! These mirror the flags of the downstream tools and drift with them, so
//! each set carries the version label of the tool it was written against.

use super::{OptionDecl, OptionSet, OptionValue};

/// Version label for the decaffeinate table.
pub const DECAFFEINATE_VERSION: &str = "decaffeinate 4";

/// Version label for the prettier table.
pub const PRETTIER_VERSION: &str = "prettier 1";

/// Choices accepted by `--trailing-comma`.
pub const TRAILING_COMMA_CHOICES: &[&str] = &["none", "es5", "all"];

/// Choices accepted by `--parser`.
pub const PARSER_CHOICES: &[&str] = &[
    "flow",
    "babylon",
    "babel",
    "typescript",
    "css",
    "less",
    "scss",
    "json",
    "graphql",
    "markdown",
];

const DECAFFEINATE_TOGGLES: &[(&str, &str)] = &[
    ("--keep-commonjs", "Do not convert require and module.exports to import and export."),
    ("--prefer-const", "Use \"const\" when possible in output code."),
    ("--loose", "Enable all --loose... options."),
    ("--loose-default-params", "Convert CS default params to JS default params."),
    ("--loose-for-expressions", "Do not wrap expression loop targets in Array.from."),
    ("--loose-for-of", "Do not wrap JS for...of loop targets in Array.from."),
    ("--loose-includes", "Do not wrap in Array.from when converting in to includes."),
    ("--loose-comparison-negation", "Allow unsafe simplifications like !(a > b) to a <= b."),
    (
        "--allow-invalid-constructors",
        "Don't error when constructors use this before super or omit the super call in a subclass.",
    ),
    (
        "--disallow-invalid-constructors",
        "Give an error when constructors use this before super or omit the super call in a subclass.",
    ),
    (
        "--enable-babel-constructor-workaround",
        "Use a hacky babel-specific workaround to allow this before super in constructors.",
    ),
    (
        "--disable-babel-constructor-workaround",
        "Never include the Babel/TypeScript workaround code to allow this before super in constructors.",
    ),
    ("--literate", "Treat the input file as Literate CoffeeScript."),
    (
        "--modernize-js",
        "Treat the input as JavaScript and only run the JavaScript-to-JavaScript transforms.",
    ),
    (
        "--disable-suggestion-comment",
        "Do not include a comment with followup suggestions at the top of the output file.",
    ),
    ("--use-optional-chaining", "Use the upcoming optional chaining syntax for operators like ?.."),
    ("--no-array-includes", "Do not use Array.prototype.includes in generated code."),
    ("--prefer-let", "Use let instead of const for most variables in output code."),
];

const PRETTIER_TOGGLES: &[(&str, &str)] = &[
    ("--use-tabs", "Indent with tabs instead of spaces."),
    ("--single-quote", "Use single quotes instead of double quotes."),
    ("--bracket-spacing", "Print spaces between brackets."),
    ("--no-bracket-spacing", "Do not print spaces between brackets."),
    ("--jsx-bracket-same-line", "Put > on the last line instead of at a new line."),
    ("--no-prose-wrap", "Do not wrap prose. (markdown)"),
    ("--no-semi", "Do not print semicolons, except at the beginning of lines which may need them."),
];

/// The decaffeinate (dialect-convert) option set.
///
/// decaffeinate spells its module flags `useJSModules` and `looseJSModules`,
/// so those two declarations carry a key override.
#[must_use]
pub fn decaffeinate_options() -> OptionSet {
    let mut decls: Vec<OptionDecl> = DECAFFEINATE_TOGGLES
        .iter()
        .map(|(flag, help)| OptionDecl::toggle(*flag, *help))
        .collect();

    decls.push(
        OptionDecl::toggle("--use-js-modules", "Convert require and module.exports to import and export.")
            .with_key_override("useJSModules"),
    );
    decls.push(
        OptionDecl::toggle("--loose-js-modules", "Allow named exports when converting to JS modules.")
            .with_key_override("looseJSModules"),
    );
    decls.push(OptionDecl::text(
        "--safe-import-function-identifiers",
        "Comma-separated list of function names that may safely be in the import/require section of the file.",
    ));

    OptionSet::builtin("decaffeinate", DECAFFEINATE_VERSION, decls)
}

/// The prettier (format) option set.
#[must_use]
pub fn prettier_options() -> OptionSet {
    let mut decls = vec![
        OptionDecl::int("--print-width", "The line length where Prettier will try wrap.")
            .with_default(OptionValue::Int(80)),
        OptionDecl::int("--tab-width", "Number of spaces per indentation level.")
            .with_default(OptionValue::Int(2)),
        OptionDecl::choice(
            "--trailing-comma",
            TRAILING_COMMA_CHOICES,
            "Print trailing commas wherever possible when multi-line.",
        )
        .with_default(OptionValue::Text("none".to_string()))
        .with_bool_aliases("es5", "none"),
        OptionDecl::choice("--parser", PARSER_CHOICES, "Which parser to use.")
            .with_default(OptionValue::Text("babylon".to_string())),
    ];

    decls.extend(
        PRETTIER_TOGGLES
            .iter()
            .map(|(flag, help)| OptionDecl::toggle(*flag, *help)),
    );

    OptionSet::builtin("prettier", PRETTIER_VERSION, decls)
}

/// The option sets of both pass-through stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCatalog {
    /// Options forwarded to the dialect-convert stage.
    pub dialect: OptionSet,
    /// Options forwarded to the format stage.
    pub format: OptionSet,
}

impl Default for OptionCatalog {
    fn default() -> Self {
        Self {
            dialect: decaffeinate_options(),
            format: prettier_options(),
        }
    }
}

impl OptionCatalog {
    /// Iterates over every declaration in both sets.
    pub fn all_decls(&self) -> impl Iterator<Item = &OptionDecl> {
        self.dialect.iter().chain(self.format.iter())
    }
}
