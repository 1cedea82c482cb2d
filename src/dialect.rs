//! SQL dialect configuration.
//!
//! A [`Dialect`] carries every dialect-specific piece of text the renderer
//! emits: identifier quoting, the placeholder token, JSON templates, the
//! LIKE wildcard, and the [`PathCodec`] that spells JSON paths. One tree
//! renders against any dialect.
//!
//! Templates mark their slots with `%s`, filled left to right.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded},
};
use serde::Deserialize;

use crate::error::{SqlError, SqlResult};
use crate::field::PathSegment;

/// Slot marker inside dialect templates.
pub const SLOT: &str = "%s";

/// Environment variable pointing at a dialect TOML file.
pub const CONFIG_ENV: &str = "RELSQL_DIALECT";

/// Encodes JSON paths into a dialect's path syntax and back.
pub trait PathCodec: fmt::Debug + Send + Sync {
    /// Encode segments into a path expression.
    fn walk(&self, path: &[PathSegment]) -> String;

    /// Decode a path expression into segments.
    fn decode(&self, text: &str) -> SqlResult<Vec<PathSegment>>;
}

/// SQL/JSON path syntax: `$."a"[0][-1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPath;

impl PathCodec for JsonPath {
    fn walk(&self, path: &[PathSegment]) -> String {
        let mut text = String::from("$");
        for segment in path {
            match segment {
                PathSegment::Index(index) => text.push_str(&format!("[{index}]")),
                PathSegment::Key(key) => {
                    let key = key.replace('\\', "\\\\").replace('"', "\\\"");
                    text.push_str(&format!(".\"{key}\""));
                }
            }
        }
        text
    }

    fn decode(&self, text: &str) -> SqlResult<Vec<PathSegment>> {
        finish(text, all_consuming(preceded(char('$'), many0(json_segment)))(text))
    }
}

/// Parse one `."key"` or `[n]` step.
fn json_segment(input: &str) -> IResult<&str, PathSegment> {
    alt((
        map(preceded(char('.'), quoted), PathSegment::Key),
        map(delimited(char('['), signed, char(']')), PathSegment::Index),
    ))(input)
}

/// PostgreSQL text-array paths for `#>>`: `{a,0,-1}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextArrayPath;

impl PathCodec for TextArrayPath {
    fn walk(&self, path: &[PathSegment]) -> String {
        let items: Vec<String> = path
            .iter()
            .map(|segment| match segment {
                PathSegment::Index(index) => index.to_string(),
                PathSegment::Key(key) if needs_quotes(key) => {
                    format!("\"{}\"", key.replace('\\', "\\\\").replace('"', "\\\""))
                }
                PathSegment::Key(key) => key.clone(),
            })
            .collect();
        format!("{{{}}}", items.join(","))
    }

    /// Numeric elements come back as indexes, since text arrays cannot
    /// tell `"2"` from `2`.
    fn decode(&self, text: &str) -> SqlResult<Vec<PathSegment>> {
        let element = alt((
            map(quoted, PathSegment::Key),
            map(is_not(",}"), |bare: &str| match bare.parse::<i64>() {
                Ok(index) => PathSegment::Index(index),
                Err(_) => PathSegment::Key(bare.to_string()),
            }),
        ));
        finish(
            text,
            all_consuming(delimited(
                char('{'),
                separated_list0(char(','), element),
                char('}'),
            ))(text),
        )
    }
}

fn needs_quotes(key: &str) -> bool {
    key.is_empty()
        || key.parse::<i64>().is_ok()
        || key
            .chars()
            .any(|c| matches!(c, ',' | '{' | '}' | '"' | '\\') || c.is_whitespace())
}

/// Parse a double-quoted string with `\"` and `\\` escapes.
fn quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                is_not("\\\""),
                '\\',
                alt((value("\\", tag("\\")), value("\"", tag("\"")))),
            )),
            Option::unwrap_or_default,
        ),
        char('"'),
    )(input)
}

/// Parse an optionally negative integer.
fn signed(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |digits: &str| {
        digits.parse::<i64>()
    })(input)
}

fn finish(
    text: &str,
    result: IResult<&str, Vec<PathSegment>>,
) -> SqlResult<Vec<PathSegment>> {
    match result {
        Ok((_, path)) => Ok(path),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(SqlError::path(
            text.len() - e.input.len(),
            format!("unexpected '{}' in {text}", e.input),
        )),
        Err(nom::Err::Incomplete(_)) => Err(SqlError::path(text.len(), "incomplete path")),
    }
}

/// Fill `%s` slots in a template, left to right.
///
/// Slots without a value are left as they are.
pub fn fill(template: &str, values: &[&str]) -> String {
    let mut parts = template.split(SLOT);
    let mut out = parts.next().unwrap_or_default().to_string();
    let mut values = values.iter();
    for part in parts {
        match values.next() {
            Some(value) => out.push_str(value),
            None => out.push_str(SLOT),
        }
        out.push_str(part);
    }
    out
}

/// Render-time dialect settings.
#[derive(Debug, Clone)]
pub struct Dialect {
    /// Identifier quote; `None` leaves identifiers bare.
    pub quote: Option<String>,
    /// String literal quote, used for diagnostic interpolation.
    pub str_quote: String,
    /// Joins schema, table and column.
    pub separator: String,
    /// Bound parameter placeholder.
    pub placeholder: String,
    /// Casts one value to JSON.
    pub json: String,
    /// Extracts a path from a JSON column: column, then path.
    pub path: String,
    /// Set containment: column, then candidate.
    pub contains: String,
    /// Set cardinality equality: column, then candidate.
    pub lengths: String,
    /// LIKE wildcard.
    pub wildcard: String,
    /// Path syntax strategy.
    pub codec: Arc<dyn PathCodec>,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            quote: Some("`".to_string()),
            str_quote: "'".to_string(),
            separator: ".".to_string(),
            placeholder: SLOT.to_string(),
            json: "JSON(%s)".to_string(),
            path: "%s#>>%s".to_string(),
            contains: "CONTAINS(%s,%s)".to_string(),
            lengths: "LENGTHS(%s,%s)".to_string(),
            wildcard: "%".to_string(),
            codec: Arc::new(JsonPath),
        }
    }
}

impl Dialect {
    /// MySQL: backticks, `->>` extraction and JSON_CONTAINS.
    pub fn mysql() -> Self {
        Self {
            json: "CAST(%s AS JSON)".to_string(),
            path: "%s->>%s".to_string(),
            contains: "JSON_CONTAINS(%s,%s)".to_string(),
            lengths: "JSON_LENGTH(%s)=JSON_LENGTH(%s)".to_string(),
            ..Self::default()
        }
    }

    /// PostgreSQL: double quotes, JSONB and text-array paths.
    pub fn postgres() -> Self {
        Self {
            quote: Some("\"".to_string()),
            json: "%s::JSONB".to_string(),
            path: "%s#>>%s".to_string(),
            contains: "%s @> %s".to_string(),
            lengths: "jsonb_array_length(%s)=jsonb_array_length(%s)".to_string(),
            codec: Arc::new(TextArrayPath),
            ..Self::default()
        }
    }

    /// Quote an identifier, doubling any embedded quote.
    pub fn quote(&self, name: &str) -> String {
        match &self.quote {
            Some(quote) => format!("{quote}{}{quote}", name.replace(quote, &quote.repeat(2))),
            None => name.to_string(),
        }
    }

    /// Quote a string literal.
    pub fn literal(&self, text: &str) -> String {
        let quote = &self.str_quote;
        format!("{quote}{}{quote}", text.replace(quote, &quote.repeat(2)))
    }

    /// Cast rendered SQL to JSON.
    pub fn json_cast(&self, sql: &str) -> String {
        fill(&self.json, &[sql])
    }

    /// Extract a path from rendered column SQL; the path binds to the placeholder.
    pub fn extract(&self, sql: &str) -> String {
        fill(&self.path, &[sql, &self.placeholder])
    }

    /// Encode a JSON path.
    pub fn walk(&self, path: &[PathSegment]) -> String {
        self.codec.walk(path)
    }

    /// Decode a JSON path.
    pub fn decode(&self, text: &str) -> SqlResult<Vec<PathSegment>> {
        self.codec.decode(text)
    }

    /// Build a dialect from parsed configuration.
    pub fn from_config(config: DialectConfig) -> SqlResult<Self> {
        let mut dialect = match config.preset {
            Preset::Generic => Self::default(),
            Preset::Mysql => Self::mysql(),
            Preset::Postgres => Self::postgres(),
        };

        if let Some(quote) = config.quote {
            dialect.quote = (!quote.is_empty()).then_some(quote);
        }
        if let Some(str_quote) = config.str_quote {
            dialect.str_quote = str_quote;
        }
        if let Some(separator) = config.separator {
            dialect.separator = separator;
        }
        if let Some(placeholder) = config.placeholder {
            dialect.placeholder = placeholder;
        }
        if let Some(wildcard) = config.wildcard {
            dialect.wildcard = wildcard;
        }
        if let Some(json) = config.json {
            dialect.json = slots("json", json, 1)?;
        }
        if let Some(path) = config.path {
            dialect.path = slots("path", path, 2)?;
        }
        if let Some(contains) = config.contains {
            dialect.contains = slots("contains", contains, 2)?;
        }
        if let Some(lengths) = config.lengths {
            dialect.lengths = slots("lengths", lengths, 2)?;
        }
        match config.path_syntax {
            Some(PathSyntax::Json) => dialect.codec = Arc::new(JsonPath),
            Some(PathSyntax::TextArray) => dialect.codec = Arc::new(TextArrayPath),
            None => {}
        }

        Ok(dialect)
    }

    /// Parse a dialect from TOML text.
    pub fn from_toml(text: &str) -> SqlResult<Self> {
        Self::from_config(toml::from_str(text)?)
    }

    /// Read a dialect from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> SqlResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded dialect config from {}", path.display());
        Self::from_toml(&text)
    }

    /// Load the user's dialect, or the default when none is configured.
    ///
    /// `$RELSQL_DIALECT` must name a readable file when set; the per-user
    /// config file is optional.
    pub fn load() -> SqlResult<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }
        match Self::user_config_path() {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/relsql/dialect.toml`, when the platform has one.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("relsql").join("dialect.toml"))
    }
}

fn slots(name: &str, template: String, expected: usize) -> SqlResult<String> {
    let found = template.matches(SLOT).count();
    if found != expected {
        return Err(SqlError::Config(format!(
            "{name} template '{template}' needs {expected} {SLOT} slots, found {found}"
        )));
    }
    Ok(template)
}

/// Base settings a configuration file starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Generic,
    Mysql,
    Postgres,
}

/// Path codec selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSyntax {
    Json,
    TextArray,
}

/// Dialect overrides as read from TOML.
///
/// ```toml
/// preset = "postgres"
/// placeholder = "?"
/// path_syntax = "json"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialectConfig {
    pub preset: Preset,
    /// Empty disables identifier quoting.
    pub quote: Option<String>,
    pub str_quote: Option<String>,
    pub separator: Option<String>,
    pub placeholder: Option<String>,
    pub json: Option<String>,
    pub path: Option<String>,
    pub contains: Option<String>,
    pub lengths: Option<String>,
    pub wildcard: Option<String>,
    pub path_syntax: Option<PathSyntax>,
}
