//! # Class Resolver
//!
//! Emits classes in dependency order: every base a class lists is written
//! before the class itself, and every class is written at most once per pass.
//!
//! Resolution is destructive. Each record is taken out of the pass's working
//! table as soon as it is visited, so a name that is no longer in the table
//! is either already written or was never defined. A small stack of classes
//! currently being resolved turns base cycles into a logged error instead of
//! unbounded recursion.

use std::collections::HashSet;

use fgd_common::{
    ClassDecl, ClassKind, ClassRecord, FgdError, RecordStore, HULLS_CLASS, HULLS_PREFERENCE,
    STANDALONE_CLASSES,
};

use crate::classifier::Classification;
use crate::emitter::ClassEmitter;

/// All mutable state of one (language, dialect) pass.
#[derive(Debug)]
pub struct PassContext {
    working: RecordStore,
    resolved: HashSet<String>,
    in_progress: Vec<String>,
    blocks: Vec<String>,
    buffer: String,
}

impl PassContext {
    /// Start a pass on a private copy of `master`, with `header` already in the buffer.
    pub fn new(master: &RecordStore, header: String) -> Self {
        Self {
            working: master.clone(),
            resolved: HashSet::new(),
            in_progress: Vec::new(),
            blocks: Vec::new(),
            buffer: header,
        }
    }

    /// Records not yet visited by this pass.
    pub fn working(&self) -> &RecordStore {
        &self.working
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.resolved.contains(name)
    }

    /// Names of the class blocks written so far, in output order.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn finish(self) -> PassOutput {
        PassOutput {
            text: self.buffer,
            blocks: self.blocks,
            leftovers: self.working.names().map(String::from).collect(),
        }
    }
}

/// Result of a finished pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutput {
    pub text: String,
    /// Class block names in output order. A point variant shows up twice.
    pub blocks: Vec<String>,
    /// Records no top-level class reached.
    pub leftovers: Vec<String>,
}

pub struct ClassResolver<'a> {
    classification: &'a Classification,
    emitter: ClassEmitter<'a>,
}

impl<'a> ClassResolver<'a> {
    pub fn new(classification: &'a Classification, emitter: ClassEmitter<'a>) -> Self {
        Self { classification, emitter }
    }

    /// Resolve `name` and everything it inherits from. Names already
    /// visited in this pass are a no-op.
    pub fn resolve(&self, name: &str, ctx: &mut PassContext) {
        let Some(mut record) = ctx.working.remove(name) else {
            return;
        };

        if STANDALONE_CLASSES.contains(&name) {
            self.write(ctx, &record, None);
            ctx.resolved.insert(record.name);
            return;
        }

        ctx.in_progress.push(record.name.clone());

        let mut bases = Vec::with_capacity(record.bases.len() + 1);
        for base in std::mem::take(&mut record.bases) {
            self.resolve_base(&record.name, &base, ctx);
            bases.push(base);
        }

        // Entity's own keyvalues go in a private base so editors list them first.
        if self.classification.contains(&record.name) && record.has_keyvalues() {
            let mut own = ClassRecord::new(format!("base_{}", record.name), ClassKind::Base);
            own.keyvalues = record.keyvalues.take();
            self.write(ctx, &own, None);
            bases.insert(0, own.name.clone());
            ctx.resolved.insert(own.name);
        }

        let written = self.write(ctx, &record, Some(bases.as_slice()));

        ctx.in_progress.pop();
        ctx.resolved.insert(record.name.clone());

        if written && record.kind() == Some(ClassKind::Solid) && record.point {
            self.write_point_variant(record, bases, ctx);
        }
    }

    fn resolve_base(&self, class: &str, base: &str, ctx: &mut PassContext) {
        if ctx.in_progress.iter().any(|name| name == base) {
            tracing::error!(
                "{}",
                FgdError::CircularBase {
                    class: class.to_string(),
                    base: base.to_string(),
                }
            );
        } else if ctx.working.contains(base) {
            self.resolve(base, ctx);
        } else if !ctx.resolved.contains(base) {
            tracing::warn!(
                "{}",
                FgdError::UnresolvedBase {
                    class: class.to_string(),
                    base: base.to_string(),
                }
            );
        }
    }

    /// Emit `record` a second time as a point class with `hulls` mixed in.
    fn write_point_variant(
        &self,
        mut record: ClassRecord,
        mut bases: Vec<String>,
        ctx: &mut PassContext,
    ) {
        record.class = ClassDecl::Kind(ClassKind::Point);
        record.point = false;

        insert_hulls(&mut bases);
        if bases.iter().any(|base| base == HULLS_CLASS) {
            ctx.in_progress.push(record.name.clone());
            self.resolve_base(&record.name, HULLS_CLASS, ctx);
            ctx.in_progress.pop();
        }

        self.write(ctx, &record, Some(bases.as_slice()));
    }

    fn write(&self, ctx: &mut PassContext, record: &ClassRecord, bases: Option<&[String]>) -> bool {
        let written = self.emitter.emit(&mut ctx.buffer, record, bases);
        if written {
            ctx.blocks.push(record.name.clone());
        }
        written
    }
}

/// Insert `hulls` right after the first base found in [`HULLS_PREFERENCE`].
/// Nothing changes when `hulls` is already listed or no preferred base is.
pub fn insert_hulls(bases: &mut Vec<String>) {
    if bases.iter().any(|base| base == HULLS_CLASS) {
        return;
    }

    for preferred in HULLS_PREFERENCE {
        if let Some(index) = bases.iter().position(|base| base == preferred) {
            bases.insert(index + 1, HULLS_CLASS.to_string());
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fgd_common::{Keyvalue, SentenceTable};

    use crate::dialect::Dialect;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run(store: &RecordStore, roots: &[&str]) -> PassOutput {
        let sentences = SentenceTable::new();
        let classification = Classification::classify(store);
        let resolver = ClassResolver::new(
            &classification,
            ClassEmitter::new(Dialect::Jack, sentences.resolver("english")),
        );
        let mut ctx = PassContext::new(store, String::new());
        for root in roots {
            resolver.resolve(root, &mut ctx);
        }
        ctx.finish()
    }

    fn record(name: &str, kind: ClassKind, bases: &[&str]) -> ClassRecord {
        let mut record = ClassRecord::new(name, kind);
        record.bases = names(bases);
        record
    }

    #[test]
    fn test_insert_hulls_preference() {
        let mut bases = names(&["base_m", "Master", "Targetx"]);
        insert_hulls(&mut bases);
        assert_eq!(bases, names(&["base_m", "Master", "Targetx", "hulls"]));

        let mut bases = names(&["Global", "Angles"]);
        insert_hulls(&mut bases);
        assert_eq!(bases, names(&["Global", "Angles", "hulls"]));

        let mut bases = names(&["hulls", "Angles"]);
        insert_hulls(&mut bases);
        assert_eq!(bases, names(&["hulls", "Angles"]));

        let mut bases = names(&["Other"]);
        insert_hulls(&mut bases);
        assert_eq!(bases, names(&["Other"]));

        let mut bases = names(&["Other", "Mandatory"]);
        insert_hulls(&mut bases);
        assert_eq!(bases, names(&["Other", "Mandatory", "hulls"]));
    }

    #[test]
    fn test_bases_first_and_shared_bases_once() {
        let store: RecordStore = [
            record("Targetx", ClassKind::Base, &[]),
            record("Monster", ClassKind::Base, &["Targetx"]),
            record("monster_a", ClassKind::Point, &["Monster", "Targetx"]),
            record("monster_b", ClassKind::Point, &["Monster"]),
        ]
        .into_iter()
        .collect();

        let output = run(&store, &["monster_a", "monster_b"]);
        assert_eq!(
            output.blocks,
            names(&["Targetx", "Monster", "monster_a", "monster_b"])
        );
        assert!(output.leftovers.is_empty());
        assert!(output.text.contains(
            "@PointClass base( Mandatory, Monster, Targetx ) = monster_a"
        ));
    }

    #[test]
    fn test_unresolved_base_is_still_listed() {
        let store: RecordStore = [record("monster_a", ClassKind::Point, &["Ghost"])]
            .into_iter()
            .collect();
        let output = run(&store, &["monster_a"]);
        assert_eq!(output.blocks, names(&["monster_a"]));
        assert!(output.text.contains("base( Mandatory, Ghost ) = monster_a"));
    }

    #[test]
    fn test_standalone_classes_skip_inheritance() {
        let mut world = record("worldspawn", ClassKind::Solid, &["Targetx"]);
        world.keyvalues = Some(vec![Keyvalue::new("skyname", "string")]);
        let store: RecordStore = [world, record("Targetx", ClassKind::Base, &[])]
            .into_iter()
            .collect();

        let output = run(&store, &["worldspawn"]);
        assert_eq!(output.blocks, names(&["worldspawn"]));
        assert_eq!(output.leftovers, names(&["Targetx"]));
        assert!(output.text.starts_with(
            "\n@SolidClass = worldspawn : \"\" : \"\"\n[\n\tskyname(string)"
        ));
    }

    #[test]
    fn test_entity_keyvalues_move_to_private_base() {
        let mut entity = record("monster_a", ClassKind::Point, &["Targetx"]);
        entity.keyvalues = Some(vec![Keyvalue::new("health", "integer")]);
        let store: RecordStore = [entity, record("Targetx", ClassKind::Base, &[])]
            .into_iter()
            .collect();

        let output = run(&store, &["monster_a"]);
        assert_eq!(output.blocks, names(&["Targetx", "base_monster_a", "monster_a"]));
        assert!(output.text.contains(
            "\n@BaseClass = base_monster_a\n[\n\thealth(integer) : \"\" : 0 : \"\"\n]\n"
        ));
        assert!(output.text.ends_with(
            "@PointClass base( Mandatory, base_monster_a, Targetx ) = monster_a : \"\" : \"\" []"
        ));
    }

    #[test]
    fn test_base_keyvalues_stay_inline() {
        let mut base = record("Targetx", ClassKind::Base, &[]);
        base.keyvalues = Some(vec![Keyvalue::new("target", "target_destination")]);
        let store: RecordStore = [base, record("monster_a", ClassKind::Point, &["Targetx"])]
            .into_iter()
            .collect();

        let output = run(&store, &["monster_a"]);
        assert_eq!(output.blocks, names(&["Targetx", "monster_a"]));
        assert!(output.text.starts_with(
            "\n@BaseClass base( Mandatory ) = Targetx\n[\n\ttarget(target_destination)"
        ));
    }

    #[test]
    fn test_point_variant_split() {
        let mut entity = record("m", ClassKind::Solid, &["Targetx"]);
        entity.point = true;
        entity.keyvalues = Some(vec![Keyvalue::new("speed", "integer")]);
        let store: RecordStore = [
            entity,
            record("Targetx", ClassKind::Base, &[]),
            record("hulls", ClassKind::Base, &[]),
        ]
        .into_iter()
        .collect();

        let output = run(&store, &["m"]);
        assert_eq!(output.blocks, names(&["Targetx", "base_m", "m", "hulls", "m"]));
        assert!(output.text.contains(
            "@SolidClass base( Mandatory, base_m, Targetx ) = m : \"\" : \"\" []"
        ));
        assert!(output.text.ends_with(
            "@PointClass base( Mandatory, base_m, Targetx, hulls ) = m : \"\" : \"\" []"
        ));
    }

    #[test]
    fn test_entity_reached_as_base_is_written_once() {
        let mut b = record("b", ClassKind::Solid, &["Angles"]);
        b.point = true;
        b.keyvalues = Some(vec![Keyvalue::new("speed", "integer")]);
        let mut a = record("a", ClassKind::Point, &["b"]);
        a.keyvalues = Some(vec![Keyvalue::new("health", "integer")]);
        let store: RecordStore = [
            a,
            b,
            record("Angles", ClassKind::Base, &[]),
            record("hulls", ClassKind::Base, &[]),
        ]
        .into_iter()
        .collect();

        let output = run(&store, &["a", "b"]);
        assert_eq!(
            output.blocks,
            names(&["Angles", "base_b", "b", "hulls", "b", "base_a", "a"])
        );
        assert!(output.leftovers.is_empty());
        assert!(output.text.contains("@PointClass base( Mandatory, base_b, Angles, hulls ) = b"));
        assert!(output.text.contains("@PointClass base( Mandatory, base_a, b ) = a"));
    }

    #[test]
    fn test_hulls_follows_listed_mandatory() {
        let mut w = record("w", ClassKind::Solid, &["Mandatory"]);
        w.point = true;
        let store: RecordStore = [
            w,
            record("Mandatory", ClassKind::Base, &[]),
            record("hulls", ClassKind::Base, &[]),
        ]
        .into_iter()
        .collect();

        let output = run(&store, &["Mandatory", "w"]);
        assert_eq!(output.blocks, names(&["Mandatory", "w", "hulls", "w"]));
        assert!(output.text.ends_with(
            "@PointClass base( Mandatory, Mandatory, hulls ) = w : \"\" : \"\" []"
        ));
    }

    #[test]
    fn test_base_cycle_is_broken() {
        let store: RecordStore = [
            record("A", ClassKind::Base, &["B"]),
            record("B", ClassKind::Base, &["A"]),
            record("monster_a", ClassKind::Point, &["A"]),
        ]
        .into_iter()
        .collect();

        let output = run(&store, &["monster_a"]);
        assert_eq!(output.blocks, names(&["B", "A", "monster_a"]));
        assert!(output.text.contains("base( Mandatory, A ) = B"));
    }

    #[test]
    fn test_unsupported_class_is_consumed_but_not_written() {
        let mut odd = record("Odd", ClassKind::Base, &[]);
        odd.class = ClassDecl::Unsupported("Move".into());
        let store: RecordStore = [odd, record("monster_a", ClassKind::Point, &["Odd"])]
            .into_iter()
            .collect();

        let output = run(&store, &["monster_a"]);
        assert_eq!(output.blocks, names(&["monster_a"]));
        assert!(output.leftovers.is_empty());
        assert!(output.text.contains("base( Mandatory, Odd ) = monster_a"));
    }

    #[test]
    fn test_master_is_untouched() {
        let store: RecordStore = [
            record("Targetx", ClassKind::Base, &[]),
            record("monster_a", ClassKind::Point, &["Targetx"]),
        ]
        .into_iter()
        .collect();
        let before = store.clone();

        let _ = run(&store, &["monster_a"]);
        assert_eq!(store, before);
    }

    #[test]
    fn test_context_tracks_progress() {
        let store: RecordStore = [
            record("Targetx", ClassKind::Base, &[]),
            record("monster_a", ClassKind::Point, &["Targetx"]),
            record("unused", ClassKind::Base, &[]),
        ]
        .into_iter()
        .collect();
        let sentences = SentenceTable::new();
        let classification = Classification::classify(&store);
        let resolver = ClassResolver::new(
            &classification,
            ClassEmitter::new(Dialect::Hammer, sentences.resolver("english")),
        );

        let mut ctx = PassContext::new(&store, "// header\n".to_string());
        resolver.resolve("monster_a", &mut ctx);

        assert!(ctx.is_resolved("Targetx"));
        assert!(ctx.is_resolved("monster_a"));
        assert!(!ctx.is_resolved("unused"));
        assert_eq!(ctx.working().len(), 1);
        assert_eq!(ctx.blocks(), ["Targetx", "monster_a"]);
        assert!(ctx.buffer().starts_with("// header\n\n@BaseClass"));

        // A second request for an emitted class is a no-op.
        resolver.resolve("monster_a", &mut ctx);
        assert_eq!(ctx.blocks().len(), 2);
    }
}
