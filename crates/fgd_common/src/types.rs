use serde_json::{Map, Value};

use crate::FgdError;

/// Classes that never inherit anything and carry all of their data inline.
pub const STANDALONE_CLASSES: &[&str] = &["worldspawn", "infodecal"];

/// Universal base every other class implicitly inherits from.
pub const MANDATORY_CLASS: &str = "Mandatory";

/// Base inserted into the point variant of a solid class.
pub const HULLS_CLASS: &str = "hulls";

/// Bases after which `hulls` may be inserted, in order of preference.
pub const HULLS_PREFERENCE: &[&str] =
    &["Angles", "Targetx", "Target", "Master", "Global", "Mandatory"];

/// Keyvalue name rendered as a bitfield block.
pub const SPAWNFLAGS: &str = "spawnflags";

/// Fields that mark a json object as a class record rather than a container of records.
pub const RECORD_FIELDS: &[&str] = &[
    "Class", "base", "data", "point", "size", "color", "studio", "sprite",
    "flags", "iconsprite", "offset", "title", "description",
];

/// Kind of class definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Base,
    Point,
    Solid,
}

impl ClassKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Base => "Base",
            ClassKind::Point => "Point",
            ClassKind::Solid => "Solid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Base" => Some(ClassKind::Base),
            "Point" => Some(ClassKind::Point),
            "Solid" => Some(ClassKind::Solid),
            _ => None,
        }
    }

    /// Point and solid classes can be placed in a map.
    pub fn is_concrete(&self) -> bool {
        matches!(self, ClassKind::Point | ClassKind::Solid)
    }
}

/// The `Class` value a record declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassDecl {
    Kind(ClassKind),
    /// A value outside of the three known kinds. Kept so references resolve, never rendered.
    Unsupported(String),
}

impl ClassDecl {
    pub fn kind(&self) -> Option<ClassKind> {
        match self {
            ClassDecl::Kind(kind) => Some(*kind),
            ClassDecl::Unsupported(_) => None,
        }
    }
}

/// Three components of a vector directive, kept as their source text.
pub type Vec3 = [String; 3];

/// Model or sprite reference of a `studio`/`sprite` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    Path(String),
    /// `true` in the source: the editor picks the asset from the `model` keyvalue.
    FromKeyvalue,
}

/// Header directive of a class, rendered in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Size { min: Vec3, max: Vec3 },
    Color(Vec3),
    Studio(AssetRef),
    Sprite(AssetRef),
    Flags(String),
    IconSprite(String),
    Offset(Vec3),
}

/// One literal of a choices keyvalue, or one bit of `spawnflags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A named, typed field of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyvalue {
    pub name: String,
    pub variable: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub value: Option<String>,
    pub choices: Option<Vec<Choice>>,
}

impl Keyvalue {
    pub fn new(name: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variable: Some(variable.into()),
            title: None,
            description: None,
            value: None,
            choices: None,
        }
    }

    pub fn is_spawnflags(&self) -> bool {
        self.name == SPAWNFLAGS
    }

    fn from_json(class: &str, name: &str, object: &Map<String, Value>) -> Self {
        let choices = object.get("choices").and_then(|choices| match choices {
            Value::Object(entries) => Some(
                entries
                    .iter()
                    .filter_map(|(value, entry)| {
                        let entry = entry.as_object()?;
                        Some(Choice {
                            value: value.clone(),
                            title: text_field(entry, "title"),
                            description: text_field(entry, "description"),
                        })
                    })
                    .collect(),
            ),
            _ => {
                tracing::warn!(class, keyvalue = name, "\"choices\" is not an object, ignoring");
                None
            }
        });

        Self {
            name: name.to_string(),
            variable: text_field(object, "variable"),
            title: text_field(object, "title"),
            description: text_field(object, "description"),
            value: text_field(object, "value"),
            choices,
        }
    }
}

/// One entity or base-class definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    pub name: String,
    pub class: ClassDecl,
    pub bases: Vec<String>,
    pub directives: Vec<Directive>,
    /// Solid classes flagged here are emitted a second time as a point class.
    pub point: bool,
    /// `None` when the source had no `data` block at all.
    pub keyvalues: Option<Vec<Keyvalue>>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            class: ClassDecl::Kind(kind),
            bases: Vec::new(),
            directives: Vec::new(),
            point: false,
            keyvalues: None,
            title: None,
            description: None,
        }
    }

    pub fn kind(&self) -> Option<ClassKind> {
        self.class.kind()
    }

    pub fn is_concrete(&self) -> bool {
        self.kind().is_some_and(|kind| kind.is_concrete())
    }

    pub fn has_keyvalues(&self) -> bool {
        self.keyvalues.as_ref().is_some_and(|kv| !kv.is_empty())
    }

    /// Parse a record from its json object. Malformed fields fall back to
    /// defaults and are reported through tracing.
    pub fn from_json(name: &str, object: &Map<String, Value>) -> Self {
        let class = match object.get("Class") {
            None | Some(Value::Null) => {
                tracing::warn!("{}", FgdError::MissingClass { class: name.to_string() });
                ClassDecl::Kind(ClassKind::Base)
            }
            Some(value) => {
                let raw = scalar_text(value).unwrap_or_default();
                match ClassKind::parse(&raw) {
                    Some(kind) => ClassDecl::Kind(kind),
                    None => ClassDecl::Unsupported(raw),
                }
            }
        };

        let bases = match object.get("base") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(base) => Some(base.clone()),
                    other => {
                        tracing::warn!(
                            class = name,
                            base = %other,
                            "Ignoring non-string BaseClass"
                        );
                        None
                    }
                })
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                tracing::warn!(class = name, base = %other, "\"base\" is not an array, ignoring");
                Vec::new()
            }
        };

        let mut directives = Vec::new();
        for (key, value) in object {
            if let Some(directive) = parse_directive(name, key, value) {
                directives.push(directive);
            }
        }

        let keyvalues = match object.get("data") {
            Some(Value::Object(entries)) => Some(
                entries
                    .iter()
                    .filter_map(|(key, entry)| match entry {
                        Value::Object(def) => Some(Keyvalue::from_json(name, key, def)),
                        _ => {
                            tracing::warn!(
                                class = name,
                                keyvalue = %key,
                                "Keyvalue definition is not an object, ignoring"
                            );
                            None
                        }
                    })
                    .collect(),
            ),
            Some(Value::Null) | None => None,
            Some(_) => {
                tracing::warn!(class = name, "\"data\" is not an object, ignoring");
                None
            }
        };

        Self {
            name: name.to_string(),
            class,
            bases,
            directives,
            point: object.get("point").and_then(Value::as_bool).unwrap_or(false),
            keyvalues,
            title: text_field(object, "title"),
            description: text_field(object, "description"),
        }
    }
}

fn parse_directive(class: &str, key: &str, value: &Value) -> Option<Directive> {
    match key {
        "size" => {
            let bounds = value.as_array()?;
            if bounds.is_empty() {
                return None;
            }
            let Some(min) = bounds[0].as_array() else {
                tracing::warn!(class, "\"size\" must be a list of vectors, ignoring");
                return None;
            };
            let max = match bounds.get(1) {
                Some(Value::Array(max)) if bounds.len() == 2 => max.as_slice(),
                _ => &[],
            };
            Some(Directive::Size {
                min: pad_vector(class, "size min", min, "0"),
                max: pad_vector(class, "size max", max, "0"),
            })
        }
        "color" => Some(Directive::Color(pad_vector(class, "color", value.as_array()?, "255"))),
        "offset" => Some(Directive::Offset(pad_vector(class, "offset", value.as_array()?, "0"))),
        "studio" => asset_ref(value).map(Directive::Studio),
        "sprite" => asset_ref(value).map(Directive::Sprite),
        "flags" => scalar_text(value).map(Directive::Flags),
        "iconsprite" => scalar_text(value).map(Directive::IconSprite),
        _ => None,
    }
}

fn asset_ref(value: &Value) -> Option<AssetRef> {
    match value {
        Value::String(path) => Some(AssetRef::Path(path.clone())),
        Value::Bool(true) => Some(AssetRef::FromKeyvalue),
        _ => None,
    }
}

/// Take the first three components, padding missing ones with `fill`.
fn pad_vector(class: &str, directive: &str, components: &[Value], fill: &str) -> Vec3 {
    let mut out: Vec<String> = components
        .iter()
        .take(3)
        .map(|c| scalar_text(c).unwrap_or_else(|| fill.to_string()))
        .collect();

    while out.len() < 3 {
        out.push(fill.to_string());
        tracing::warn!(
            class,
            directive,
            index = out.len(),
            "Unset \"{}\" component, setting to {}",
            directive,
            fill
        );
    }

    [out[0].clone(), out[1].clone(), out[2].clone()]
}

/// Text of a json scalar as the editors expect it: integral floats lose
/// their fraction (`1.0` is `1`) and booleans are capitalized.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Number(n) => Some(number_text(n)),
        other => Some(other.to_string()),
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            return f.to_string();
        }
    }
    n.to_string()
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(scalar_text)
}
