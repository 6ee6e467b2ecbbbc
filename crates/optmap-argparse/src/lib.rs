//! Minimal option parsing keyed by canonical long name.
//!
//! A caller registers option definitions into a [`schema::Schema`], hands the schema
//! and the raw argv tokens to [`resolve::parse`] (or a [`resolve::Parser`]), and then
//! queries the resulting [`args::ResultMap`] by long name, no matter which alias the
//! user typed.
//!
//! Unknown tokens and value options without a value never abort parsing. They are
//! collected as [`diagnostics::Diagnostic`]s next to the values.

pub mod schema {
    use std::collections::HashMap;

    use thiserror::Error;

    /// One declared option.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
    pub struct OptionDef {
        /// Short alias, e.g. `-n`.
        pub short: String,
        /// Long alias, e.g. `--name`. Results are always stored under this name.
        pub long: String,
        /// Whether the option consumes the next token as its value.
        #[cfg_attr(feature = "serde", serde(default))]
        pub takes_value: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        pub help: String,
    }

    impl OptionDef {
        pub fn matches(&self, token: &str) -> bool {
            self.short == token || self.long == token
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum SchemaError {
        #[error("option definition has an empty {which} name (long: '{long}')")]
        EmptyName { which: &'static str, long: String },
        #[error("alias '{alias}' is already registered for '{existing}'")]
        DuplicateAlias { alias: String, existing: String },
    }

    /// Ordered option definitions.
    ///
    /// Registration order is help-listing order and match priority.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Schema {
        defs: Vec<OptionDef>,
    }

    impl Schema {
        /// Create an empty schema.
        pub fn new() -> Self {
            Self::default()
        }

        /// Append a definition without any validation.
        ///
        /// Empty and duplicate names are accepted; for duplicate aliases the earliest
        /// registered definition wins during parsing.
        pub fn register(
            &mut self,
            short: impl Into<String>,
            long: impl Into<String>,
            takes_value: bool,
            help: impl Into<String>,
        ) -> &mut Self {
            self.defs.push(OptionDef {
                short: short.into(),
                long: long.into(),
                takes_value,
                help: help.into(),
            });
            self
        }

        /// Append a definition, rejecting empty names and aliases already in use.
        ///
        /// On error the schema is left unchanged.
        pub fn try_register(
            &mut self,
            short: impl Into<String>,
            long: impl Into<String>,
            takes_value: bool,
            help: impl Into<String>,
        ) -> Result<&mut Self, SchemaError> {
            let def = OptionDef {
                short: short.into(),
                long: long.into(),
                takes_value,
                help: help.into(),
            };

            if def.short.is_empty() {
                return Err(SchemaError::EmptyName {
                    which: "short",
                    long: def.long,
                });
            }
            if def.long.is_empty() {
                return Err(SchemaError::EmptyName {
                    which: "long",
                    long: def.long,
                });
            }
            if def.short == def.long {
                return Err(SchemaError::DuplicateAlias {
                    alias: def.short,
                    existing: def.long,
                });
            }
            for alias in [&def.short, &def.long] {
                if let Some(prev) = self.find(alias) {
                    return Err(SchemaError::DuplicateAlias {
                        alias: alias.clone(),
                        existing: prev.long.clone(),
                    });
                }
            }

            self.defs.push(def);
            Ok(self)
        }

        /// First definition, in registration order, with `token` as short or long name.
        pub fn find(&self, token: &str) -> Option<&OptionDef> {
            self.defs.iter().find(|d| d.matches(token))
        }

        /// Build the alias index used by the resolver.
        pub fn lookup(&self) -> AliasTable {
            AliasTable::build(&self.defs)
        }

        pub fn iter(&self) -> std::slice::Iter<'_, OptionDef> {
            self.defs.iter()
        }

        pub fn get(&self, index: usize) -> Option<&OptionDef> {
            self.defs.get(index)
        }

        pub fn len(&self) -> usize {
            self.defs.len()
        }

        pub fn is_empty(&self) -> bool {
            self.defs.is_empty()
        }
    }

    impl<'s> IntoIterator for &'s Schema {
        type Item = &'s OptionDef;
        type IntoIter = std::slice::Iter<'s, OptionDef>;

        fn into_iter(self) -> Self::IntoIter {
            self.defs.iter()
        }
    }

    /// Alias to definition index, built once after registration closes.
    ///
    /// Resolves exactly like [`Schema::find`]: on collisions the lowest definition
    /// index wins.
    #[derive(Debug, Clone, Default)]
    pub struct AliasTable {
        by_alias: HashMap<String, usize>,
    }

    impl AliasTable {
        fn build(defs: &[OptionDef]) -> Self {
            let mut by_alias: HashMap<String, usize> = HashMap::new();
            for (idx, def) in defs.iter().enumerate() {
                by_alias.entry(def.short.clone()).or_insert(idx);
                by_alias.entry(def.long.clone()).or_insert(idx);
            }
            Self { by_alias }
        }

        pub fn get(&self, token: &str) -> Option<usize> {
            self.by_alias.get(token).copied()
        }
    }
}

pub mod args {
    use std::borrow::Cow;

    use indexmap::IndexMap;

    /// Value stored for a matched switch.
    pub const SWITCH_VALUE: &str = "true";

    /// Resolved values keyed by canonical long name.
    ///
    /// A key exists iff its option was matched at least once. Later occurrences
    /// overwrite the value but keep the key's original position.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ResultMap<'a> {
        values: IndexMap<String, Cow<'a, str>>,
    }

    impl<'a> ResultMap<'a> {
        /// Value for `long`, or `""` when the option was not matched.
        ///
        /// An option given an empty value reads the same as an absent one; use
        /// [`ResultMap::has_flag`] or [`ResultMap::get`] to tell them apart.
        pub fn get_string(&self, long: &str) -> &str {
            self.get(long).unwrap_or("")
        }

        /// Whether `long` was matched, for switches and value options alike.
        pub fn has_flag(&self, long: &str) -> bool {
            self.values.contains_key(long)
        }

        pub fn get(&self, long: &str) -> Option<&str> {
            self.values.get(long).map(|v| v.as_ref())
        }

        /// Entries in first-match order.
        pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
            self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
        }

        pub fn len(&self) -> usize {
            self.values.len()
        }

        pub fn is_empty(&self) -> bool {
            self.values.is_empty()
        }

        /// Detach from the token slice.
        pub fn into_owned(self) -> ResultMap<'static> {
            ResultMap {
                values: self
                    .values
                    .into_iter()
                    .map(|(k, v)| (k, Cow::Owned(v.into_owned())))
                    .collect(),
            }
        }
    }

    impl<'a> ResultMap<'a> {
        pub(crate) fn insert_value(&mut self, long: &str, value: &'a str) {
            self.values.insert(long.to_string(), Cow::Borrowed(value));
        }

        pub(crate) fn insert_switch(&mut self, long: &str) {
            self.values
                .insert(long.to_string(), Cow::Borrowed(SWITCH_VALUE));
        }
    }
}

pub mod diagnostics {
    use thiserror::Error;

    /// Non-fatal problem found while scanning tokens.
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum Diagnostic {
        /// Token matches no registered short or long name. The token is skipped.
        #[error("unknown argument {token}")]
        UnknownArgument { token: String },
        /// Value option was the last token. Nothing is stored for it.
        #[error("missing value for {token}")]
        MissingValue { token: String },
    }

    impl Diagnostic {
        /// The token as the user typed it.
        pub fn token(&self) -> &str {
            match self {
                Self::UnknownArgument { token } | Self::MissingValue { token } => token,
            }
        }
    }
}

pub mod resolve {
    use crate::args::ResultMap;
    use crate::diagnostics::Diagnostic;
    use crate::help;
    use crate::schema::{AliasTable, Schema};

    /// Outcome of one parse pass.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct Parsed<'a> {
        pub values: ResultMap<'a>,
        /// In token order.
        pub diagnostics: Vec<Diagnostic>,
    }

    impl<'a> Parsed<'a> {
        pub fn get_string(&self, long: &str) -> &str {
            self.values.get_string(long)
        }

        pub fn has_flag(&self, long: &str) -> bool {
            self.values.has_flag(long)
        }

        pub fn is_clean(&self) -> bool {
            self.diagnostics.is_empty()
        }
    }

    /// Scan `tokens` (program name excluded) against `schema`.
    ///
    /// - a switch stores `"true"` under its long name
    /// - a value option stores the next token verbatim and skips it
    /// - unknown tokens and a trailing value option produce diagnostics and
    ///   scanning continues
    pub fn parse<'a, S: AsRef<str>>(schema: &Schema, tokens: &'a [S]) -> Parsed<'a> {
        resolve_with(schema, &schema.lookup(), tokens)
    }

    fn resolve_with<'a, S: AsRef<str>>(
        schema: &Schema,
        table: &AliasTable,
        tokens: &'a [S],
    ) -> Parsed<'a> {
        let mut out = Parsed::default();

        let mut i = 0usize;
        while i < tokens.len() {
            let current = tokens[i].as_ref();

            let Some(def) = table.get(current).and_then(|idx| schema.get(idx)) else {
                tracing::warn!(token = current, "unknown argument");
                out.diagnostics.push(Diagnostic::UnknownArgument {
                    token: current.to_string(),
                });
                i += 1;
                continue;
            };

            if !def.takes_value {
                tracing::debug!(token = current, option = %def.long, "matched switch");
                out.values.insert_switch(&def.long);
                i += 1;
                continue;
            }

            match tokens.get(i + 1) {
                Some(value) => {
                    let value = value.as_ref();
                    tracing::debug!(token = current, option = %def.long, value, "matched option");
                    out.values.insert_value(&def.long, value);
                    i += 2;
                }
                None => {
                    tracing::warn!(token = current, "missing value");
                    out.diagnostics.push(Diagnostic::MissingValue {
                        token: current.to_string(),
                    });
                    i += 1;
                }
            }
        }

        out
    }

    /// A schema bundled with its alias index.
    #[derive(Debug, Clone)]
    pub struct Parser {
        schema: Schema,
        table: AliasTable,
    }

    impl Parser {
        pub fn new(schema: Schema) -> Self {
            let table = schema.lookup();
            Self { schema, table }
        }

        pub fn schema(&self) -> &Schema {
            &self.schema
        }

        pub fn parse<'a, S: AsRef<str>>(&self, tokens: &'a [S]) -> Parsed<'a> {
            resolve_with(&self.schema, &self.table, tokens)
        }

        pub fn help(&self) -> String {
            help::render(&self.schema)
        }
    }
}

pub mod help {
    use crate::schema::Schema;

    pub const HELP_HEADER: &str = "Available Options:";

    /// Render the option listing: a header, then `  short, long<TAB>help` per
    /// definition in registration order.
    pub fn render(schema: &Schema) -> String {
        let mut out = String::new();
        out.push_str(HELP_HEADER);
        out.push('\n');
        for def in schema {
            out.push_str(&format!("  {}, {}\t{}\n", def.short, def.long, def.help));
        }
        out
    }
}

pub use args::ResultMap;
pub use diagnostics::Diagnostic;
pub use resolve::{Parsed, Parser, parse};
pub use schema::{OptionDef, Schema, SchemaError};
