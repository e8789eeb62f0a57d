//! Renders class records into FGD text.

use fgd_common::{
    AssetRef, ClassDecl, ClassRecord, Directive, FgdError, Keyvalue, SentenceResolver, Vec3,
    MANDATORY_CLASS,
};

use crate::dialect::{remap_for_dialect, Dialect};

/// Default state written for every spawnflag bit. No source data carries a
/// per-bit default, so all bits start cleared.
pub const SPAWNFLAG_DEFAULT: &str = "0";

/// Fixed comment block every generated file starts with.
pub fn header(dialect: Dialect) -> String {
    format!(
        "//================================================================================================
//============ Copyright 1996-2005, Valve Corporation, All rights reserved. ===============================
//
// Purpose: Half-Life: Unified SDK game definition file (.fgd) for {}
//
// This file has been generated by fgd_generator from the json class definitions
//
// DO NOT MODIFY THIS FILE, EDIT THE DEFINITIONS AND GENERATE IT AGAIN
//
//================================================================================================
//================================================================================================
",
        dialect.as_str().to_uppercase()
    )
}

/// Renders records for one (language, dialect) pass.
#[derive(Debug, Clone, Copy)]
pub struct ClassEmitter<'a> {
    dialect: Dialect,
    sentences: SentenceResolver<'a>,
}

impl<'a> ClassEmitter<'a> {
    pub fn new(dialect: Dialect, sentences: SentenceResolver<'a>) -> Self {
        Self { dialect, sentences }
    }

    /// Append one class block to `out`.
    ///
    /// `bases` is `None` for classes written without an inheritance clause;
    /// otherwise the clause lists `Mandatory` followed by `bases`. Returns
    /// `false` when the record declares an unsupported class and nothing was
    /// written.
    pub fn emit(&self, out: &mut String, record: &ClassRecord, bases: Option<&[String]>) -> bool {
        let Some(kind) = record.kind() else {
            if let ClassDecl::Unsupported(value) = &record.class {
                tracing::error!(
                    "{}",
                    FgdError::UnsupportedClass {
                        class: record.name.clone(),
                        value: value.clone(),
                    }
                );
            }
            return false;
        };

        out.push_str(&format!("\n@{}Class ", kind.as_str()));

        if record.name != MANDATORY_CLASS {
            if let Some(bases) = bases {
                out.push_str("base( ");
                out.push_str(MANDATORY_CLASS);
                for base in bases {
                    out.push_str(", ");
                    out.push_str(base);
                }
                out.push_str(" ) ");
            }
        }

        for directive in &record.directives {
            out.push_str(&render_directive(directive));
        }

        out.push_str(&format!("= {}", record.name));

        if kind.is_concrete() {
            out.push_str(&format!(
                " : \"{}\" : \"{}\"",
                self.sentences.title(record.title.as_deref()),
                self.sentences.description(record.description.as_deref())
            ));
        }

        match &record.keyvalues {
            Some(keyvalues) => {
                out.push_str("\n[");
                for keyvalue in keyvalues {
                    self.emit_keyvalue(out, &record.name, keyvalue);
                }
                out.push_str("\n]\n");
            }
            None => out.push_str(" []"),
        }

        true
    }

    fn emit_keyvalue(&self, out: &mut String, class: &str, keyvalue: &Keyvalue) {
        if keyvalue.is_spawnflags() {
            let Some(bits) = &keyvalue.choices else {
                tracing::warn!(class, "\"spawnflags\" has no \"choices\", skipping");
                return;
            };

            out.push_str("\n\tspawnflags(flags) =\n\t[");
            for bit in bits {
                out.push_str(&format!(
                    "\n\t\t{} : \"{}\" : {} : \"{}\"",
                    bit.value,
                    self.sentences.title(bit.title.as_deref()),
                    SPAWNFLAG_DEFAULT,
                    self.sentences.description(bit.description.as_deref())
                ));
            }
            out.push_str("\n\t]\n");
            return;
        }

        let declared = keyvalue.variable.as_deref().unwrap_or_default();
        let variable = remap_for_dialect(declared, self.dialect);
        let title = self.sentences.title(keyvalue.title.as_deref());
        let description = self.sentences.description(keyvalue.description.as_deref());

        out.push_str(&format!("\n\t{}({}) : \"{}\" : ", keyvalue.name, variable, title));

        if variable == "choices" {
            out.push_str(&format!(
                "\"{}\" : \"{}\" = \n\t[",
                keyvalue.value.as_deref().unwrap_or_default(),
                description
            ));
            for choice in keyvalue.choices.iter().flatten() {
                out.push_str(&format!(
                    "\n\t\t\"{}\" : \"{}\" : \"{}\"",
                    choice.value,
                    self.sentences.title(choice.title.as_deref()),
                    self.sentences.description(choice.description.as_deref())
                ));
            }
            out.push_str("\n\t]");
            return;
        }

        let value = default_value(declared, keyvalue.value.as_deref());
        if is_numeric(variable) {
            out.push_str(&value);
        } else {
            out.push_str(&format!("\"{}\"", value));
        }
        out.push_str(&format!(" : \"{}\"", description));
    }
}

fn is_numeric(variable: &str) -> bool {
    matches!(variable, "integer" | "float")
}

/// Default of a keyvalue; numeric types get a zero when none is declared.
fn default_value(declared: &str, value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => match declared {
            "integer" => "0".to_string(),
            "float" => "0.0".to_string(),
            _ => String::new(),
        },
    }
}

fn render_directive(directive: &Directive) -> String {
    match directive {
        Directive::Size { min, max } => format!("size( {}, {} ) ", join(min), join(max)),
        Directive::Color(rgb) => format!("color( {} ) ", join(rgb)),
        Directive::Offset(xyz) => format!("offset( {} ) ", join(xyz)),
        Directive::Studio(asset) => format!("studio({}) ", render_asset(asset)),
        Directive::Sprite(asset) => format!("sprite({}) ", render_asset(asset)),
        Directive::Flags(flags) => format!("flags( \"{}\" ) ", flags),
        Directive::IconSprite(path) => format!("iconsprite( \"{}\" ) ", path),
    }
}

fn render_asset(asset: &AssetRef) -> String {
    match asset {
        AssetRef::Path(path) => format!(" \"{}\" ", path),
        AssetRef::FromKeyvalue => String::new(),
    }
}

fn join(v: &Vec3) -> String {
    v.join(" ")
}
