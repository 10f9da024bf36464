pub mod ast;
pub mod error;
pub mod flatten;
pub mod parser;
pub mod path;
pub mod reference;
pub mod types;


pub use ast::{Token, TokenContext, TokenGroup, TokenNode, TokenSource, TokenTree};
pub use error::{FlattenError, TokenParseError, TokenParseResult};
pub use flatten::{
    flatten_context, flatten_trees, FlattenedToken, FlattenedTokens, GroupMeta, NormalizedTokens,
    PathIndex,
};
pub use parser::{parse_token_document, parse_token_value};
pub use path::{css_variable_name, to_kebab_case, KebabCache};
pub use reference::{collect_references, is_reference, Reference};
pub use types::{font_weight_keyword, TokenType};
