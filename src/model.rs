//! Data model for extracted documentation — format-agnostic.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A `/** ... */` block together with the code fragment that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    /// Raw comment text including delimiters
    pub comment: String,
    /// Code up to and including the first `;`, `)` or `{`
    pub code: String,
}

/// What kind of construct a code fragment declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Class,
    Function,
    Variable,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Class => "class",
            Kind::Function => "function",
            Kind::Variable => "variable",
        }
    }
}

/// Secondary classification; meaning depends on [`Kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Subtype {
    Constructor,
    Method,
    Variable,
    Property,
}

/// Visibility of a documented construct.
///
/// `@access`/`@api` accept free text, which lands in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Private,
    Protected,
    Other(String),
}

impl Access {
    pub fn parse(value: &str) -> Self {
        match value {
            "public" => Access::Public,
            "private" => Access::Private,
            "protected" => Access::Protected,
            other => Access::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Access::Public => "public",
            Access::Private => "private",
            Access::Protected => "protected",
            Access::Other(s) => s,
        }
    }
}

impl Serialize for Access {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A literal value recovered from a default expression or a `[name=value]` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Literal>),
    /// Keys in source order
    Object(Vec<(String, Literal)>),
}

impl Literal {
    /// Runtime type name used for documentation.
    ///
    /// `undefined` has no type; everything else is capitalized except `null`.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Literal::Undefined => None,
            Literal::Null => Some("null"),
            Literal::Bool(_) => Some("Boolean"),
            Literal::Number(_) => Some("Number"),
            Literal::String(_) => Some("String"),
            Literal::Array(_) => Some("Array"),
            Literal::Object(_) => Some("Object"),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Literal::Undefined)
    }
}

impl From<serde_json::Value> for Literal {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Literal::Null,
            serde_json::Value::Bool(b) => Literal::Bool(b),
            serde_json::Value::Number(n) => Literal::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Literal::String(s),
            serde_json::Value::Array(items) => {
                Literal::Array(items.into_iter().map(Literal::from).collect())
            }
            serde_json::Value::Object(map) => {
                Literal::Object(map.into_iter().map(|(k, v)| (k, Literal::from(v))).collect())
            }
        }
    }
}

/// Largest integer an f64 holds exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // undefined has no JSON form; arrays keep the slot as null like JSON.stringify
            Literal::Undefined | Literal::Null => serializer.serialize_none(),
            Literal::Bool(b) => serializer.serialize_bool(*b),
            Literal::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
                    serializer.serialize_i64(*n as i64)
                } else if n.is_finite() {
                    serializer.serialize_f64(*n)
                } else {
                    serializer.serialize_none()
                }
            }
            Literal::String(s) => serializer.serialize_str(s),
            Literal::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Literal::Object(entries) => {
                let defined: Vec<_> = entries.iter().filter(|(_, v)| !v.is_undefined()).collect();
                let mut map = serializer.serialize_map(Some(defined.len()))?;
                for (key, value) in defined {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// One recovered or declared argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    /// Free-form type name or `Type|Type` union
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Literal>,
    /// Sub-fields declared with `@property`; one level deep only
    pub properties: Vec<Parameter>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            declared_type: None,
            description: String::new(),
            required: true,
            default_value: None,
            properties: Vec::new(),
        }
    }
}

/// The classifier's structural guess about a code fragment.
///
/// `Default` is the unclassified context.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureContext {
    pub kind: Option<Kind>,
    pub subtype: Option<Subtype>,
    /// Identifier, possibly dotted (`this.max`, `a.b`); empty if anonymous
    pub name: String,
    pub is_async: Option<bool>,
    pub is_static: Option<bool>,
    /// Raw text between the parentheses; empty for non-callables
    pub args_string: String,
    pub parameters: Option<Vec<Parameter>>,
    /// True only when `name` is an assignable path
    pub attachable: bool,
}

/// `{Type} description` payload of `@returns` and `@throws`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypedTag {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub description: String,
    pub properties: Vec<Parameter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExampleKind {
    /// Body of an `@example` tag
    Javadoc,
    /// Fenced code block in the description
    Gfm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Example {
    pub language: String,
    pub description: String,
    pub kind: ExampleKind,
    pub text: String,
}

/// Unrecognized `@tag value` directive, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomTag {
    pub tag: String,
    pub value: String,
}

/// Normalized description of one documented construct.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionRecord {
    pub name: String,
    pub kind: Option<Kind>,
    pub subtype: Option<Subtype>,
    pub description: String,
    pub access: Access,
    pub chainable: Option<bool>,
    pub deprecated: Option<bool>,
    pub version: Option<String>,
    pub since: Option<String>,
    pub todos: Vec<String>,
    pub see_also: Vec<String>,
    #[serde(rename = "throws")]
    pub throws_list: Vec<TypedTag>,
    pub examples: Vec<Example>,
    pub parameters: Vec<Parameter>,
    pub returns: TypedTag,
    pub custom_tags: Vec<CustomTag>,
    pub ignore: bool,
    pub is_async: Option<bool>,
    pub is_static: Option<bool>,
    /// `[async ]name(args) ⇒ {Type}`; functions only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub can_attach: bool,
}
