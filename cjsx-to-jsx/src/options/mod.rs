//! Pass-through option declarations and their translation.
//!
//! Each transformer stage owns an [`OptionSet`]. Callers configure a single
//! [`FlatConfig`]; [`translate`] picks out the keys each stage declares,
//! validates their types, and renames the irregular ones.

mod catalog;
mod declaration;
mod resolved;
mod translator;

pub use catalog::{
    decaffeinate_options, prettier_options, OptionCatalog, DECAFFEINATE_VERSION, PARSER_CHOICES,
    PRETTIER_VERSION, TRAILING_COMMA_CHOICES,
};
pub use declaration::{camel_key, BoolAliases, OptionDecl, OptionSet, ValueKind};
pub use resolved::{FlatConfig, OptionValue, ResolvedOption, ResolvedOptions};
pub use translator::{translate, StageOptions};
